use async_trait::async_trait;
use thiserror::Error;

use crate::domain::email::Email;

/// Port trait for email sending service
#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
        html: bool,
    ) -> Result<(), String>;
}

#[derive(Debug, Clone, Error)]
pub enum IdentityProviderError {
    #[error("Invalid identity token")]
    InvalidIdToken,
    #[error("Identity provider error: {0}")]
    Unreachable(String),
}

impl PartialEq for IdentityProviderError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidIdToken, Self::InvalidIdToken) => true,
            (Self::Unreachable(_), Self::Unreachable(_)) => true,
            _ => false,
        }
    }
}

/// Identity asserted by an external login provider.
#[derive(Debug, Clone)]
pub struct FederatedIdentity {
    pub subject: String,
    pub email: Email,
    pub email_verified: bool,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
}

/// Port trait for federated login providers. Implementations must check the
/// token audience against the configured client id.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify_id_token(
        &self,
        id_token: &str,
    ) -> Result<FederatedIdentity, IdentityProviderError>;
}
