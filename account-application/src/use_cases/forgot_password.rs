use account_core::{AccountStore, AccountStoreError, Email, EmailClient};
use secrecy::ExposeSecret;

use crate::policies::ResetPolicy;

/// Error types for forgot password use case
#[derive(Debug, thiserror::Error)]
pub enum ForgotPasswordError {
    #[error("Account store error: {0}")]
    AccountStoreError(#[from] AccountStoreError),
}

/// Forgot password use case - emails a reset token when the account exists.
///
/// The outcome is identical whether or not the email is registered, so the
/// endpoint cannot be used to enumerate accounts. Only store failures
/// surface as errors.
pub struct ForgotPasswordUseCase<S, E>
where
    S: AccountStore,
    E: EmailClient,
{
    account_store: S,
    email_client: E,
    reset_policy: ResetPolicy,
}

impl<S, E> ForgotPasswordUseCase<S, E>
where
    S: AccountStore,
    E: EmailClient,
{
    pub fn new(account_store: S, email_client: E, reset_policy: ResetPolicy) -> Self {
        Self {
            account_store,
            email_client,
            reset_policy,
        }
    }

    #[tracing::instrument(name = "ForgotPasswordUseCase::execute", skip(self))]
    pub async fn execute(&self, email: Email) -> Result<(), ForgotPasswordError> {
        let Some(account) = self.account_store.find_by_email(&email).await? else {
            return Ok(());
        };

        if account.is_deleted() {
            return Ok(());
        }

        let token = self
            .account_store
            .create_password_reset_token(&account.id(), self.reset_policy.token_ttl)
            .await?;

        let content = format!(
            "Your token is {}. The token will expire in {} minutes.",
            token.as_ref().expose_secret(),
            self.reset_policy.ttl_minutes()
        );

        if let Err(e) = self
            .email_client
            .send_email(account.email(), "Reset your Password", &content, true)
            .await
        {
            tracing::warn!("Failed to send password reset email: {}", e);
        }

        Ok(())
    }
}
