use crate::{
    error::Result,
    models::invitation::{
        CreateInvitationRequest, CreatedInvitation, Invitation, InvitationStats,
    },
    services::api::ApiClient,
    utils::validation::validate_email_format,
};
use std::sync::Arc;
use tracing::info;

/// Invitation management: every account is created off a single-use,
/// email-bound token issued by an existing user.
#[derive(Clone)]
pub struct InvitationService {
    api: Arc<ApiClient>,
}

impl InvitationService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Invitation>> {
        self.api.get("/invitations").await
    }

    /// Creates an invitation for `email` and returns it together with the
    /// shareable landing-page URL.
    pub async fn create(&self, email: &str) -> Result<CreatedInvitation> {
        let email = email.trim();
        validate_email_format(email)?;

        let request = CreateInvitationRequest {
            email: email.to_string(),
        };
        let created: CreatedInvitation = self.api.post("/invitations", &request).await?;
        info!("Created invitation for {}", created.invitation.email);
        Ok(created)
    }

    pub async fn get(&self, invitation_id: i64) -> Result<Invitation> {
        self.api
            .get(&format!("/invitations/{}", invitation_id))
            .await
    }

    pub async fn delete(&self, invitation_id: i64) -> Result<()> {
        self.api
            .delete(&format!("/invitations/{}", invitation_id))
            .await
    }

    pub async fn stats(&self) -> Result<InvitationStats> {
        self.api.get("/invitations/stats").await
    }
}
