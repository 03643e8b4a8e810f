use account_core::{AccountId, AccountStore, AccountStoreError, Password};

/// Error types for change password use case
#[derive(Debug, thiserror::Error)]
pub enum ChangePasswordError {
    #[error("User not found")]
    NotFound,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Account store error: {0}")]
    AccountStoreError(#[from] AccountStoreError),
}

/// Change password use case - verifies the old password before installing the
/// new one. The caller id comes from the authenticated request context.
pub struct ChangePasswordUseCase<S>
where
    S: AccountStore,
{
    account_store: S,
}

impl<S> ChangePasswordUseCase<S>
where
    S: AccountStore,
{
    pub fn new(account_store: S) -> Self {
        Self { account_store }
    }

    #[tracing::instrument(
        name = "ChangePasswordUseCase::execute",
        skip(self, old_password, new_password)
    )]
    pub async fn execute(
        &self,
        caller: AccountId,
        old_password: Password,
        new_password: Password,
    ) -> Result<(), ChangePasswordError> {
        self.account_store
            .find_by_id(&caller)
            .await?
            .ok_or(ChangePasswordError::NotFound)?;

        self.account_store
            .check_password(&caller, &old_password)
            .await
            .map_err(|e| match e {
                AccountStoreError::IncorrectPassword => ChangePasswordError::InvalidCredentials,
                AccountStoreError::AccountNotFound => ChangePasswordError::NotFound,
                other => ChangePasswordError::AccountStoreError(other),
            })?;

        self.account_store
            .set_new_password(&caller, new_password)
            .await?;

        Ok(())
    }
}
