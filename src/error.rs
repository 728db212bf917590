use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Validation error: {0}")]
    ValidatorError(#[from] validator::ValidationErrors),
}

// 便利函数，用于创建常见错误
impl ClientError {
    pub fn not_found(resource: &str) -> Self {
        Self::NotFound(format!("{} not found", resource))
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self::Auth(msg.to_string())
    }

    pub fn validation(msg: &str) -> Self {
        Self::Validation(msg.to_string())
    }

    pub fn session(msg: &str) -> Self {
        Self::Session(msg.to_string())
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// True when this error was produced by a 401 response and the
    /// session has already been torn down by the transport layer.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Auth(_)) || matches!(self, Self::Api { status: 401, .. })
    }

    /// Message suitable for direct user display. API errors surface the
    /// server-supplied text verbatim; transport failures get a generic line.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "A network error occurred. Please try again.".to_string(),
            Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<anyhow::Error> for ClientError {
    fn from(err: anyhow::Error) -> Self {
        ClientError::Session(err.to_string())
    }
}
