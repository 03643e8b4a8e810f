use account_core::{
    Account, AccountStore, AccountStoreError, Email, Password, RefreshSession, Role,
};
use chrono::Utc;

use crate::{policies::RefreshPolicy, session::ensure_refresh_session};

/// Successful authentication outcome: everything the boundary needs to mint
/// an access token and hand out the refresh token.
#[derive(Debug)]
pub struct AuthenticatedAccount {
    pub account: Account,
    pub roles: Vec<Role>,
    pub refresh_session: RefreshSession,
}

/// Error types for login use case
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// Covers unknown email, wrong password and soft-deleted accounts alike.
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Account store error: {0}")]
    AccountStoreError(#[from] AccountStoreError),
}

/// Login use case - verifies credentials and ensures a live refresh session.
///
/// An existing unexpired refresh session is reused, so repeated logins do not
/// invalidate each other's refresh tokens.
pub struct LoginUseCase<S>
where
    S: AccountStore,
{
    account_store: S,
    refresh_policy: RefreshPolicy,
}

impl<S> LoginUseCase<S>
where
    S: AccountStore,
{
    pub fn new(account_store: S, refresh_policy: RefreshPolicy) -> Self {
        Self {
            account_store,
            refresh_policy,
        }
    }

    #[tracing::instrument(name = "LoginUseCase::execute", skip(self, password))]
    pub async fn execute(
        &self,
        email: Email,
        password: Password,
    ) -> Result<AuthenticatedAccount, LoginError> {
        let now = Utc::now();

        let account = self
            .account_store
            .find_by_email(&email)
            .await?
            .ok_or(LoginError::InvalidCredentials)?;

        // A deleted account never authenticates, and any session it still
        // holds dies here.
        if account.is_deleted() {
            self.account_store
                .clear_refresh_session(&account.id())
                .await?;
            return Err(LoginError::InvalidCredentials);
        }

        self.account_store
            .check_password(&account.id(), &password)
            .await
            .map_err(|e| match e {
                AccountStoreError::IncorrectPassword | AccountStoreError::AccountNotFound => {
                    LoginError::InvalidCredentials
                }
                other => LoginError::AccountStoreError(other),
            })?;

        let refresh_session =
            ensure_refresh_session(&self.account_store, &account, self.refresh_policy, now).await?;

        let roles = self.account_store.roles_of(&account.id()).await?;

        Ok(AuthenticatedAccount {
            account,
            roles,
            refresh_session,
        })
    }
}
