use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    pub id: i64,
    pub email: String,
    /// Opaque single-use registration credential.
    pub token: String,
    pub is_used: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub used_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub used_by: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateInvitationRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedInvitation {
    pub invitation: Invitation,
    /// Shareable landing-page URL embedding the token.
    pub invitation_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyInvitationResponse {
    pub valid: bool,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationStats {
    pub total: i64,
    pub used: i64,
    pub pending: i64,
}
