use crate::{
    error::Result,
    models::post::{CreatePostRequest, LikeStatus, Post},
    models::user::UserStats,
    services::api::ApiClient,
    utils::validation::validate_post_text,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Post CRUD and feed listing.
#[derive(Clone)]
pub struct PostService {
    api: Arc<ApiClient>,
    max_post_length: usize,
}

impl PostService {
    pub fn new(api: Arc<ApiClient>, max_post_length: usize) -> Self {
        Self {
            api,
            max_post_length,
        }
    }

    pub async fn list_posts(&self, page: Option<u32>, limit: Option<u32>) -> Result<Vec<Post>> {
        let path = match (page, limit) {
            (Some(page), Some(limit)) => format!("/posts?page={}&limit={}", page, limit),
            (Some(page), None) => format!("/posts?page={}", page),
            _ => "/posts".to_string(),
        };
        self.api.get(&path).await
    }

    pub async fn get_post(&self, post_id: i64) -> Result<Post> {
        self.api.get(&format!("/posts/{}", post_id)).await
    }

    /// Submits the user's text; the server responds with the post carrying
    /// the AI-exaggerated rewrite.
    pub async fn create_post(&self, original_text: &str) -> Result<Post> {
        let original_text = original_text.trim();
        validate_post_text(original_text, self.max_post_length)?;

        let request = CreatePostRequest {
            original_text: original_text.to_string(),
        };
        let post: Post = self.api.post("/posts", &request).await?;
        info!("Created post {}", post.id);
        Ok(post)
    }

    pub async fn delete_post(&self, post_id: i64) -> Result<()> {
        self.api.delete(&format!("/posts/{}", post_id)).await
    }

    /// Posts authored by the current user.
    pub async fn my_posts(&self) -> Result<Vec<Post>> {
        self.api.get("/users/me/posts").await
    }

    pub async fn user_stats(&self) -> Result<UserStats> {
        self.api.get("/users/stats").await
    }
}

/// Per-post like toggle with immediate local feedback. The flag and counter
/// flip before the request resolves; the server response overwrites both
/// with authoritative values, and a failed request restores the pre-toggle
/// snapshot instead of leaving divergent state.
pub struct LikeState {
    api: Arc<ApiClient>,
    post_id: i64,
    state: RwLock<LikeStatus>,
}

impl LikeState {
    pub fn new(api: Arc<ApiClient>, post_id: i64) -> Self {
        Self {
            api,
            post_id,
            state: RwLock::new(LikeStatus::default()),
        }
    }

    /// Seeds local state from a post already fetched with the feed, avoiding
    /// a second round trip.
    pub fn from_post(api: Arc<ApiClient>, post: &Post) -> Self {
        Self {
            api,
            post_id: post.id,
            state: RwLock::new(LikeStatus {
                is_liked: post.is_liked.unwrap_or(false),
                like_count: post.like_count,
            }),
        }
    }

    pub fn post_id(&self) -> i64 {
        self.post_id
    }

    /// Fetches the authoritative like state. Callers gate this on an
    /// authenticated session being present.
    pub async fn load(&self) -> Result<LikeStatus> {
        let status: LikeStatus = self
            .api
            .get(&format!("/posts/{}/likes", self.post_id))
            .await?;
        *self.state.write().await = status;
        Ok(status)
    }

    /// Optimistic toggle: flips flag and counter locally, then issues the
    /// request. Server values win on success; the snapshot is restored on
    /// failure.
    pub async fn toggle(&self) -> Result<LikeStatus> {
        let snapshot = {
            let mut state = self.state.write().await;
            let snapshot = *state;
            state.is_liked = !snapshot.is_liked;
            state.like_count += if snapshot.is_liked { -1 } else { 1 };
            snapshot
        };

        match self
            .api
            .post_empty::<LikeStatus>(&format!("/posts/{}/like", self.post_id))
            .await
        {
            Ok(status) => {
                debug!(
                    "Like toggle on post {} confirmed: liked={} count={}",
                    self.post_id, status.is_liked, status.like_count
                );
                *self.state.write().await = status;
                Ok(status)
            }
            Err(e) => {
                *self.state.write().await = snapshot;
                Err(e)
            }
        }
    }

    pub async fn status(&self) -> LikeStatus {
        *self.state.read().await
    }
}
