use std::{collections::HashMap, sync::Arc};

use account_core::{
    Account, AccountId, AccountStore, AccountStoreError, Email, Password, PasswordResetToken,
    RefreshSession, RefreshTokenSecret, Role,
};
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

/// Account store backed by a shared in-process map. Carries the same
/// conditional-update semantics as the Postgres store, so the API test suite
/// exercises real rotation behavior without a database.
///
/// Passwords are kept as validated clear text; hashing is the Postgres
/// store's concern.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountStore {
    state: Arc<RwLock<HashMap<AccountId, StoredAccount>>>,
}

#[derive(Debug, Clone)]
struct StoredAccount {
    account: Account,
    password: Option<Password>,
    roles: Vec<Role>,
    reset_token: Option<(PasswordResetToken, DateTime<Utc>)>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn add_account(
        &self,
        account: Account,
        password: Option<Password>,
    ) -> Result<(), AccountStoreError> {
        let mut state = self.state.write().await;

        // Email uniqueness holds among live accounts; a soft-deleted account
        // does not block re-registration of its address
        let email_taken = state.values().any(|stored| {
            !stored.account.is_deleted() && stored.account.email() == account.email()
        });
        if email_taken || state.contains_key(&account.id()) {
            return Err(AccountStoreError::AccountAlreadyExists);
        }

        state.insert(
            account.id(),
            StoredAccount {
                account,
                password,
                roles: Vec::new(),
                reset_token: None,
            },
        );

        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AccountStoreError> {
        let state = self.state.read().await;

        Ok(state
            .values()
            .filter(|stored| stored.account.email() == email)
            .min_by_key(|stored| stored.account.is_deleted())
            .map(|stored| stored.account.clone()))
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountStoreError> {
        let state = self.state.read().await;

        Ok(state.get(id).map(|stored| stored.account.clone()))
    }

    async fn check_password(
        &self,
        id: &AccountId,
        candidate: &Password,
    ) -> Result<(), AccountStoreError> {
        let state = self.state.read().await;
        let stored = state.get(id).ok_or(AccountStoreError::AccountNotFound)?;

        match &stored.password {
            Some(password) if password == candidate => Ok(()),
            _ => Err(AccountStoreError::IncorrectPassword),
        }
    }

    async fn set_new_password(
        &self,
        id: &AccountId,
        new_password: Password,
    ) -> Result<(), AccountStoreError> {
        let mut state = self.state.write().await;
        let stored = state.get_mut(id).ok_or(AccountStoreError::AccountNotFound)?;

        stored.password = Some(new_password);

        Ok(())
    }

    async fn update_account(&self, account: &Account) -> Result<(), AccountStoreError> {
        let mut state = self.state.write().await;
        let stored = state
            .get_mut(&account.id())
            .ok_or(AccountStoreError::AccountNotFound)?;

        // The refresh session only changes through rotate/clear
        let mut account = account.clone();
        account.set_refresh_session(stored.account.refresh_session().cloned());
        stored.account = account;

        Ok(())
    }

    async fn rotate_refresh_session(
        &self,
        id: &AccountId,
        expected: Option<&RefreshTokenSecret>,
        new: RefreshSession,
    ) -> Result<(), AccountStoreError> {
        let mut state = self.state.write().await;
        let stored = state.get_mut(id).ok_or(AccountStoreError::AccountNotFound)?;

        let current = stored.account.refresh_session().map(|s| s.secret().clone());
        let matches = match (current.as_ref(), expected) {
            (None, None) => true,
            (Some(current), Some(expected)) => current == expected,
            _ => false,
        };
        if !matches {
            return Err(AccountStoreError::RefreshSessionConflict);
        }

        stored.account.set_refresh_session(Some(new));

        Ok(())
    }

    async fn clear_refresh_session(&self, id: &AccountId) -> Result<(), AccountStoreError> {
        let mut state = self.state.write().await;
        let stored = state.get_mut(id).ok_or(AccountStoreError::AccountNotFound)?;

        stored.account.set_refresh_session(None);

        Ok(())
    }

    async fn create_password_reset_token(
        &self,
        id: &AccountId,
        ttl: Duration,
    ) -> Result<PasswordResetToken, AccountStoreError> {
        let mut state = self.state.write().await;
        let stored = state.get_mut(id).ok_or(AccountStoreError::AccountNotFound)?;

        let token = PasswordResetToken::generate();
        stored.reset_token = Some((token.clone(), Utc::now() + ttl));

        Ok(token)
    }

    async fn reset_password(
        &self,
        id: &AccountId,
        token: &PasswordResetToken,
        new_password: Password,
    ) -> Result<(), AccountStoreError> {
        let mut state = self.state.write().await;
        let stored = state.get_mut(id).ok_or(AccountStoreError::AccountNotFound)?;

        // Single use: the token is consumed whether or not it matches
        match stored.reset_token.take() {
            Some((stored_token, expires_at))
                if &stored_token == token && expires_at > Utc::now() =>
            {
                stored.password = Some(new_password);
                Ok(())
            }
            _ => Err(AccountStoreError::InvalidResetToken),
        }
    }

    async fn mark_deleted(
        &self,
        id: &AccountId,
        deleted_by: Option<&AccountId>,
        at: DateTime<Utc>,
    ) -> Result<(), AccountStoreError> {
        let mut state = self.state.write().await;
        let stored = state.get_mut(id).ok_or(AccountStoreError::AccountNotFound)?;

        stored.account.mark_deleted(deleted_by.copied(), at);

        Ok(())
    }

    async fn restore(
        &self,
        id: &AccountId,
        restored_by: Option<&AccountId>,
        at: DateTime<Utc>,
    ) -> Result<(), AccountStoreError> {
        let mut state = self.state.write().await;
        let stored = state.get_mut(id).ok_or(AccountStoreError::AccountNotFound)?;

        stored.account.restore(restored_by.copied(), at);

        Ok(())
    }

    async fn roles_of(&self, id: &AccountId) -> Result<Vec<Role>, AccountStoreError> {
        let state = self.state.read().await;
        let stored = state.get(id).ok_or(AccountStoreError::AccountNotFound)?;

        Ok(stored.roles.clone())
    }

    async fn assign_role(&self, id: &AccountId, role: Role) -> Result<(), AccountStoreError> {
        let mut state = self.state.write().await;
        let stored = state.get_mut(id).ok_or(AccountStoreError::AccountNotFound)?;

        if !stored.roles.contains(&role) {
            stored.roles.push(role);
        }

        Ok(())
    }
}
