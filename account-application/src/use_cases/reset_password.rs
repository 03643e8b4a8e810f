use account_core::{AccountStore, AccountStoreError, Email, Password, PasswordResetToken};

/// Error types for reset password use case
#[derive(Debug, thiserror::Error)]
pub enum ResetPasswordError {
    #[error("User not found")]
    NotFound,
    #[error("Invalid or expired reset token")]
    InvalidToken,
    #[error("Account store error: {0}")]
    AccountStoreError(#[from] AccountStoreError),
}

/// Reset password use case - consumes an emailed reset token.
pub struct ResetPasswordUseCase<S>
where
    S: AccountStore,
{
    account_store: S,
}

impl<S> ResetPasswordUseCase<S>
where
    S: AccountStore,
{
    pub fn new(account_store: S) -> Self {
        Self { account_store }
    }

    #[tracing::instrument(name = "ResetPasswordUseCase::execute", skip(self, token, new_password))]
    pub async fn execute(
        &self,
        email: Email,
        token: PasswordResetToken,
        new_password: Password,
    ) -> Result<(), ResetPasswordError> {
        let account = self
            .account_store
            .find_by_email(&email)
            .await?
            .ok_or(ResetPasswordError::NotFound)?;

        self.account_store
            .reset_password(&account.id(), &token, new_password)
            .await
            .map_err(|e| match e {
                AccountStoreError::InvalidResetToken => ResetPasswordError::InvalidToken,
                AccountStoreError::AccountNotFound => ResetPasswordError::NotFound,
                other => ResetPasswordError::AccountStoreError(other),
            })?;

        Ok(())
    }
}
