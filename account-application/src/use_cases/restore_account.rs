use account_core::{AccountId, AccountStore, AccountStoreError};
use chrono::Utc;

/// Error types for restore account use case
#[derive(Debug, thiserror::Error)]
pub enum RestoreAccountError {
    #[error("Account not found")]
    NotFound,
    #[error("Account store error: {0}")]
    AccountStoreError(#[from] AccountStoreError),
}

/// Restore account use case - reverses a soft delete. The account comes back
/// with whatever email-confirmation state it had before deletion; no refresh
/// session is recreated.
pub struct RestoreAccountUseCase<S>
where
    S: AccountStore,
{
    account_store: S,
}

impl<S> RestoreAccountUseCase<S>
where
    S: AccountStore,
{
    pub fn new(account_store: S) -> Self {
        Self { account_store }
    }

    #[tracing::instrument(name = "RestoreAccountUseCase::execute", skip(self))]
    pub async fn execute(
        &self,
        target: AccountId,
        restored_by: Option<AccountId>,
    ) -> Result<(), RestoreAccountError> {
        let account = self
            .account_store
            .find_by_id(&target)
            .await?
            .ok_or(RestoreAccountError::NotFound)?;

        if !account.is_deleted() {
            return Ok(());
        }

        self.account_store
            .restore(&target, restored_by.as_ref(), Utc::now())
            .await?;

        Ok(())
    }
}
