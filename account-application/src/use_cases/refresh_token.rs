use account_core::{AccountId, AccountStore, AccountStoreError, RefreshSession, RefreshTokenSecret};
use chrono::Utc;

use crate::policies::RefreshPolicy;

/// Error types for refresh token use case
#[derive(Debug, thiserror::Error)]
pub enum RefreshTokenError {
    /// Uniform rejection for unknown account, mismatched secret, expired
    /// session, deleted account or a lost rotation race.
    #[error("Invalid Access Token or Refresh Token")]
    InvalidToken,
    #[error("Account store error: {0}")]
    AccountStoreError(#[from] AccountStoreError),
}

/// Refresh token use case - exchanges the current refresh token for a new one.
///
/// Unlike login, refresh rotates unconditionally: every successful call
/// invalidates the presented secret. The rotation is a compare-and-swap on
/// the presented value, so two concurrent calls with the same token cannot
/// both succeed.
pub struct RefreshTokenUseCase<S>
where
    S: AccountStore,
{
    account_store: S,
    refresh_policy: RefreshPolicy,
}

impl<S> RefreshTokenUseCase<S>
where
    S: AccountStore,
{
    pub fn new(account_store: S, refresh_policy: RefreshPolicy) -> Self {
        Self {
            account_store,
            refresh_policy,
        }
    }

    #[tracing::instrument(name = "RefreshTokenUseCase::execute", skip(self, presented))]
    pub async fn execute(
        &self,
        account_id: AccountId,
        presented: RefreshTokenSecret,
    ) -> Result<RefreshSession, RefreshTokenError> {
        let now = Utc::now();

        let account = self
            .account_store
            .find_by_id(&account_id)
            .await?
            .ok_or(RefreshTokenError::InvalidToken)?;

        if account.is_deleted() {
            self.account_store
                .clear_refresh_session(&account_id)
                .await?;
            return Err(RefreshTokenError::InvalidToken);
        }

        let session = account
            .refresh_session()
            .ok_or(RefreshTokenError::InvalidToken)?;

        if !session.matches(&presented) || session.is_expired(now) {
            return Err(RefreshTokenError::InvalidToken);
        }

        let fresh = self.refresh_policy.issue(now);

        self.account_store
            .rotate_refresh_session(&account_id, Some(&presented), fresh.clone())
            .await
            .map_err(|e| match e {
                // The losing side of a concurrent rotation holds a secret
                // that is no longer current.
                AccountStoreError::RefreshSessionConflict
                | AccountStoreError::AccountNotFound => RefreshTokenError::InvalidToken,
                other => RefreshTokenError::AccountStoreError(other),
            })?;

        Ok(fresh)
    }
}
