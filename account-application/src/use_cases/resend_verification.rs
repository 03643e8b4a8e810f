use account_core::{Account, AccountId, AccountStore, AccountStoreError, Email, EmailClient};
use chrono::Utc;

use crate::policies::VerificationPolicy;

#[derive(Debug, PartialEq, Eq)]
pub enum ResendOutcome {
    Sent,
    /// The address is already confirmed; nothing was sent.
    AlreadyVerified,
}

/// Error types for resend verification use case
#[derive(Debug, thiserror::Error)]
pub enum ResendVerificationError {
    #[error("User not found")]
    NotFound,
    #[error("Cannot resend Verification Email")]
    Forbidden,
    #[error("Account store error: {0}")]
    AccountStoreError(#[from] AccountStoreError),
}

/// Resend verification use case - reissues the code for an unverified address.
///
/// The target account resolves from an explicit email, the authenticated
/// caller, or both; when both are given they must name the same account.
pub struct ResendVerificationUseCase<S, E>
where
    S: AccountStore,
    E: EmailClient,
{
    account_store: S,
    email_client: E,
    verification_policy: VerificationPolicy,
}

impl<S, E> ResendVerificationUseCase<S, E>
where
    S: AccountStore,
    E: EmailClient,
{
    pub fn new(account_store: S, email_client: E, verification_policy: VerificationPolicy) -> Self {
        Self {
            account_store,
            email_client,
            verification_policy,
        }
    }

    #[tracing::instrument(name = "ResendVerificationUseCase::execute", skip(self))]
    pub async fn execute(
        &self,
        email: Option<Email>,
        caller: Option<AccountId>,
    ) -> Result<ResendOutcome, ResendVerificationError> {
        let now = Utc::now();

        let mut account = self.resolve_target(email, caller).await?;

        if account.email_confirmed() {
            return Ok(ResendOutcome::AlreadyVerified);
        }

        let verification = self.verification_policy.issue(now);
        account.begin_verification(verification.clone(), now);
        self.account_store.update_account(&account).await?;

        let content = format!(
            "Your verification code is {}. The code will expire in {} minutes.",
            verification.code().as_str(),
            self.verification_policy.ttl_minutes()
        );

        if let Err(e) = self
            .email_client
            .send_email(account.email(), "Verify your Email", &content, true)
            .await
        {
            tracing::warn!("Failed to send verification email: {}", e);
        }

        Ok(ResendOutcome::Sent)
    }

    async fn resolve_target(
        &self,
        email: Option<Email>,
        caller: Option<AccountId>,
    ) -> Result<Account, ResendVerificationError> {
        match (email, caller) {
            (None, None) => Err(ResendVerificationError::NotFound),
            (Some(email), None) => self
                .account_store
                .find_by_email(&email)
                .await?
                .ok_or(ResendVerificationError::NotFound),
            (None, Some(caller)) => self
                .account_store
                .find_by_id(&caller)
                .await?
                .ok_or(ResendVerificationError::NotFound),
            (Some(email), Some(caller)) => {
                let account = self.account_store.find_by_email(&email).await?;

                match account {
                    Some(account) if account.id() == caller => Ok(account),
                    _ => Err(ResendVerificationError::Forbidden),
                }
            }
        }
    }
}
