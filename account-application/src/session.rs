use account_core::{Account, AccountStore, AccountStoreError, RefreshSession};
use chrono::{DateTime, Utc};

use crate::policies::RefreshPolicy;

/// Returns the account's live refresh session, rotating in a new one only
/// when the stored session is missing or expired.
///
/// Rotation is a conditional update keyed on the previously observed secret.
/// When another login wins the race, the winner's session is adopted instead
/// of rotating again, so parallel logins converge on a single live token.
pub async fn ensure_refresh_session<S: AccountStore>(
    store: &S,
    account: &Account,
    policy: RefreshPolicy,
    now: DateTime<Utc>,
) -> Result<RefreshSession, AccountStoreError> {
    if let Some(session) = account.refresh_session() {
        if !session.is_expired(now) {
            return Ok(session.clone());
        }
    }

    let fresh = policy.issue(now);
    let expected = account.refresh_session().map(|session| session.secret());

    match store
        .rotate_refresh_session(&account.id(), expected, fresh.clone())
        .await
    {
        Ok(()) => Ok(fresh),
        Err(AccountStoreError::RefreshSessionConflict) => {
            let current = store
                .find_by_id(&account.id())
                .await?
                .ok_or(AccountStoreError::AccountNotFound)?;

            match current.refresh_session() {
                Some(session) if !session.is_expired(now) => Ok(session.clone()),
                _ => Err(AccountStoreError::RefreshSessionConflict),
            }
        }
        Err(e) => Err(e),
    }
}
