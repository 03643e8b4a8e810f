use account_core::{AccountStore, AccountStoreError, Email, VerificationCode};
use chrono::Utc;

/// Error types for verify email use case
#[derive(Debug, thiserror::Error)]
pub enum VerifyEmailError {
    #[error("User not found")]
    NotFound,
    #[error("The code is expired")]
    CodeExpired,
    #[error("Cannot verify Email")]
    CodeMismatch,
    #[error("Account store error: {0}")]
    AccountStoreError(#[from] AccountStoreError),
}

/// Verify email use case - checks the pending code and confirms the address.
///
/// Expiry is checked before the code itself, so an expired-but-matching code
/// reports `CodeExpired`, never success.
pub struct VerifyEmailUseCase<S>
where
    S: AccountStore,
{
    account_store: S,
}

impl<S> VerifyEmailUseCase<S>
where
    S: AccountStore,
{
    pub fn new(account_store: S) -> Self {
        Self { account_store }
    }

    #[tracing::instrument(name = "VerifyEmailUseCase::execute", skip(self, code))]
    pub async fn execute(&self, email: Email, code: VerificationCode) -> Result<(), VerifyEmailError> {
        let now = Utc::now();

        let mut account = self
            .account_store
            .find_by_email(&email)
            .await?
            .ok_or(VerifyEmailError::NotFound)?;

        let pending = account
            .verification()
            .ok_or(VerifyEmailError::CodeMismatch)?;

        if pending.is_expired(now) {
            return Err(VerifyEmailError::CodeExpired);
        }
        if pending.code() != &code {
            return Err(VerifyEmailError::CodeMismatch);
        }

        account.confirm_email(now);
        self.account_store.update_account(&account).await?;

        Ok(())
    }
}
