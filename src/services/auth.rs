use crate::{
    error::{ClientError, Result},
    models::user::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, User},
    models::invitation::VerifyInvitationResponse,
    services::api::{ApiClient, SessionEvent},
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use validator::Validate;

/// Persisted session payload: the bearer token plus the cached user it
/// belongs to, stored together so a restart can show the user immediately
/// before revalidation completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Durable client-local session storage. The browser frontend this replaces
/// kept the same two values under fixed localStorage keys.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<Option<Session>>;
    async fn save(&self, session: &Session) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

/// JSON file-backed store.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // A corrupt session file is treated as logged out, not as a hard
        // error, the same way unparsable localStorage was.
        match serde_json::from_slice::<Session>(&bytes) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!("Discarding unreadable session file: {}", e);
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(session)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and throwaway sessions.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: RwLock<Option<Session>>,
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        *self.inner.write().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.inner.write().await = None;
        Ok(())
    }
}

/// Holds the current authenticated user and token. Persisted session data is
/// a read-through cache: shown optimistically on restore, then revalidated
/// against the server.
#[derive(Clone)]
pub struct AuthService {
    api: Arc<ApiClient>,
    store: Arc<dyn SessionStore>,
    current: Arc<RwLock<Option<User>>>,
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>, store: Arc<dyn SessionStore>) -> Self {
        let service = Self {
            api,
            store,
            current: Arc::new(RwLock::new(None)),
        };
        service.spawn_invalidation_listener();
        service
    }

    /// Consumes transport-level session invalidations (401 responses) and
    /// purges the cached user and the persisted session. The task exits on
    /// its own once the client is dropped and the channel closes.
    fn spawn_invalidation_listener(&self) {
        let mut rx = self.api.subscribe();
        let current = self.current.clone();
        let store = self.store.clone();

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(SessionEvent::Expired) => {
                        info!("Session expired, purging local session state");
                        *current.write().await = None;
                        if let Err(e) = store.clear().await {
                            warn!("Failed to clear persisted session: {}", e);
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    /// Restores a persisted session at startup. The cached user is installed
    /// optimistically, then revalidated with `GET /users/me`; any
    /// revalidation failure purges the session and reports logged-out.
    pub async fn restore(&self) -> Result<Option<User>> {
        let Some(session) = self.store.load().await? else {
            return Ok(None);
        };

        self.api.set_token(&session.token).await;
        *self.current.write().await = Some(session.user.clone());
        debug!("Restored cached session for {}", session.user.email);

        match self.refresh_current_user().await {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!("Session revalidation failed: {}", e);
                self.logout().await?;
                Ok(None)
            }
        }
    }

    /// Installs a fresh authentication: sets the bearer token, caches the
    /// user, and persists the session.
    async fn install(&self, auth: &AuthResponse) -> Result<()> {
        self.api.set_token(&auth.token).await;
        *self.current.write().await = Some(auth.user.clone());
        self.store
            .save(&Session {
                token: auth.token.clone(),
                user: auth.user.clone(),
            })
            .await
    }

    pub async fn login(&self, request: LoginRequest) -> Result<User> {
        request.validate()?;

        let auth: AuthResponse = self.api.post("/auth/login", &request).await?;
        self.install(&auth).await?;
        info!("Logged in as {}", auth.user.nickname);
        Ok(auth.user)
    }

    /// Registers a new account, consuming the single-use invitation token.
    /// On failure the server message propagates verbatim and no session is
    /// created.
    pub async fn register(&self, request: RegisterRequest) -> Result<User> {
        request.validate()?;
        crate::utils::validation::validate_email_enhanced(&request.email)?;

        let auth: AuthResponse = self.api.post("/auth/register", &request).await?;
        self.install(&auth).await?;
        info!("Registered new account {}", auth.user.nickname);
        Ok(auth.user)
    }

    pub async fn verify_invitation(&self, token: &str) -> Result<VerifyInvitationResponse> {
        if token.trim().is_empty() {
            return Err(ClientError::validation("Invitation token is required"));
        }
        self.api
            .post("/auth/verify-invitation", &json!({ "token": token }))
            .await
    }

    pub async fn logout(&self) -> Result<()> {
        self.api.clear_token().await;
        *self.current.write().await = None;
        self.store.clear().await
    }

    /// Cached user, if any. Does not hit the network.
    pub async fn current_user(&self) -> Option<User> {
        self.current.read().await.clone()
    }

    /// Fetches the authoritative user record and re-persists the session.
    pub async fn refresh_current_user(&self) -> Result<User> {
        let token = self
            .api
            .token()
            .await
            .ok_or_else(|| ClientError::unauthorized("Not logged in"))?;

        let user: User = self.api.get("/users/me").await?;
        *self.current.write().await = Some(user.clone());
        self.store
            .save(&Session {
                token,
                user: user.clone(),
            })
            .await?;
        Ok(user)
    }

    /// Cheap token liveness check. `Ok(false)` means the server rejected the
    /// token; transport failures propagate.
    pub async fn verify_token(&self) -> Result<bool> {
        match self.api.get::<serde_json::Value>("/auth/verify").await {
            Ok(_) => Ok(true),
            Err(e) if e.is_unauthorized() => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn update_profile(&self, request: UpdateProfileRequest) -> Result<User> {
        request.validate()?;

        let _: serde_json::Value = self.api.put("/users/me", &request).await?;
        self.refresh_current_user().await
    }

    /// Bearer header for consumers issuing requests outside this client.
    /// Empty when unauthenticated.
    pub async fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = self.api.token().await {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }
}
