use account_core::{AccountId, AccountStore, AccountStoreError};
use chrono::Utc;

/// Error types for delete account use case
#[derive(Debug, thiserror::Error)]
pub enum DeleteAccountError {
    #[error("Account not found")]
    NotFound,
    #[error("Account store error: {0}")]
    AccountStoreError(#[from] AccountStoreError),
}

/// Delete account use case - soft-deletes and invalidates the refresh session
/// in the same transition. Deleting an already-deleted account is a no-op.
pub struct DeleteAccountUseCase<S>
where
    S: AccountStore,
{
    account_store: S,
}

impl<S> DeleteAccountUseCase<S>
where
    S: AccountStore,
{
    pub fn new(account_store: S) -> Self {
        Self { account_store }
    }

    #[tracing::instrument(name = "DeleteAccountUseCase::execute", skip(self))]
    pub async fn execute(
        &self,
        target: AccountId,
        deleted_by: Option<AccountId>,
    ) -> Result<(), DeleteAccountError> {
        let account = self
            .account_store
            .find_by_id(&target)
            .await?
            .ok_or(DeleteAccountError::NotFound)?;

        if account.is_deleted() {
            return Ok(());
        }

        self.account_store
            .mark_deleted(&target, deleted_by.as_ref(), Utc::now())
            .await?;

        Ok(())
    }
}
