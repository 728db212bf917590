use crate::{
    config::Config,
    error::{ClientError, Result},
};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};

/// Session lifecycle notifications published by the transport layer.
/// The auth service subscribes and performs the actual teardown; the
/// transport never reaches into session storage itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Expired,
}

/// Thin typed wrapper around the Shamstagram JSON API. Attaches the bearer
/// token when one is held and normalizes failures into `ClientError`s whose
/// messages are suitable for direct user display.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    token: Arc<RwLock<Option<String>>>,
    invalidation: broadcast::Sender<SessionEvent>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let (invalidation, _) = broadcast::channel(8);

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            http,
            token: Arc::new(RwLock::new(None)),
            invalidation,
        })
    }

    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Stream of session invalidation events (401 responses).
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.invalidation.subscribe()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::GET, path, None::<&()>).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// POST without a request body (e.g. the like toggle).
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::POST, path, None::<&()>).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// DELETE, discarding any response body.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self.send(Method::DELETE, path, None::<&()>).await?;
        self.check_status(response).await?;
        Ok(())
    }

    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let response = self.send(method, path, body).await?;
        let response = self.check_status(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut builder = self.http.request(method, &url);
        if let Some(token) = self.token.read().await.as_deref() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        Ok(builder.send().await?)
    }

    /// Passes 2xx responses through; everything else becomes an error. A 401
    /// additionally tears the held token down and notifies subscribers,
    /// independent of which call triggered it.
    async fn check_status(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!("401 response, invalidating session");
            self.clear_token().await;
            // No subscribers is fine; send only fails then.
            let _ = self.invalidation.send(SessionEvent::Expired);
            return Err(ClientError::Auth("Session expired".to_string()));
        }

        let message = extract_error_message(response).await;
        match status {
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(message)),
            _ => Err(ClientError::api(status.as_u16(), message)),
        }
    }
}

/// Error bodies are JSON with a single `error` string field. Absent or
/// malformed bodies fall back to a generic message.
async fn extract_error_message(response: Response) -> String {
    let status = response.status();
    let fallback = || {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    };

    match response.bytes().await {
        Ok(bytes) => serde_json::from_slice::<serde_json::Value>(&bytes)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(fallback),
        Err(_) => fallback(),
    }
}
