use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub id: i64,
    pub nickname: String,
    pub avatar: u8,
}

/// A node in a post's comment tree. Invariants: every element of `replies`
/// has `parent_id == Some(self.id)`; `author` is absent exactly when the
/// comment was written by a bot persona, in which case `bot_name` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    /// `None` for top-level comments.
    pub parent_id: Option<i64>,
    pub content: String,
    #[serde(default)]
    pub author: Option<CommentAuthor>,
    #[serde(default)]
    pub bot_name: Option<String>,
    #[serde(default)]
    pub is_bot: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub replies: Vec<Comment>,
}

impl Comment {
    /// Display name: the bot persona for bot comments, the author nickname
    /// otherwise.
    pub fn display_name(&self) -> &str {
        if self.is_bot {
            self.bot_name.as_deref().unwrap_or("bot")
        } else {
            self.author
                .as_ref()
                .map(|a| a.nickname.as_str())
                .unwrap_or("unknown")
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentList {
    pub comments: Vec<Comment>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 500))]
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 500))]
    pub content: String,
}

/// Wrapper shape returned by the create/update comment endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub comment: Comment,
}
