use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostAuthor {
    pub id: i64,
    pub nickname: String,
    pub avatar: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub author: PostAuthor,
    /// Text as the user wrote it.
    pub original_text: String,
    /// The AI-exaggerated rewrite shown in the feed.
    pub ai_text: String,
    pub like_count: i64,
    /// Present only for authenticated requests.
    #[serde(default)]
    pub is_liked: Option<bool>,
    #[serde(default)]
    pub is_owner: Option<bool>,
    #[serde(default)]
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 500))]
    pub original_text: String,
}

/// Like membership plus the denormalized counter. The server value is
/// authoritative; the client copy is only an optimistic approximation
/// while a toggle request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LikeStatus {
    pub is_liked: bool,
    pub like_count: i64,
}

impl Default for LikeStatus {
    fn default() -> Self {
        LikeStatus {
            is_liked: false,
            like_count: 0,
        }
    }
}
