use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    /// Avatar sprite index, 1 through 5.
    pub avatar: u8,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 2, max = 20))]
    pub nickname: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(range(min = 1, max = 5))]
    pub avatar: u8,
    #[validate(length(min = 1))]
    pub invitation_token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 20))]
    pub nickname: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub avatar: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub total_users: i64,
    pub total_posts: i64,
    pub total_comments: i64,
    #[serde(default)]
    pub top_users: Vec<TopUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopUser {
    pub nickname: String,
    pub avatar: u8,
    pub post_count: i64,
}
