use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::domain::{
    account::{Account, AccountId},
    email::Email,
    password::Password,
    refresh_token::{RefreshSession, RefreshTokenSecret},
    reset_token::PasswordResetToken,
    role::Role,
};

// AccountStore port trait and errors
#[derive(Debug, Error)]
pub enum AccountStoreError {
    #[error("Account already exists")]
    AccountAlreadyExists,
    #[error("Account not found")]
    AccountNotFound,
    #[error("Incorrect password")]
    IncorrectPassword,
    #[error("Stored refresh session did not match the expected value")]
    RefreshSessionConflict,
    #[error("Invalid or expired password reset token")]
    InvalidResetToken,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl PartialEq for AccountStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::AccountAlreadyExists, Self::AccountAlreadyExists) => true,
            (Self::AccountNotFound, Self::AccountNotFound) => true,
            (Self::IncorrectPassword, Self::IncorrectPassword) => true,
            (Self::RefreshSessionConflict, Self::RefreshSessionConflict) => true,
            (Self::InvalidResetToken, Self::InvalidResetToken) => true,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

/// Source of truth for accounts, credentials and roles.
///
/// Password hashing belongs to implementations of this trait; clear-text
/// passwords never outlive the call they arrive in. Refresh-session writes go
/// exclusively through [`rotate_refresh_session`](AccountStore::rotate_refresh_session)
/// and [`clear_refresh_session`](AccountStore::clear_refresh_session) so that
/// rotation stays a conditional update; `update_account` must leave the stored
/// session untouched.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persists a new account. `password` is `None` for federated accounts.
    /// Email uniqueness is enforced here, not by the caller's pre-check.
    async fn add_account(
        &self,
        account: Account,
        password: Option<Password>,
    ) -> Result<(), AccountStoreError>;

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AccountStoreError>;

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountStoreError>;

    /// Verifies a candidate password against the stored hash.
    async fn check_password(
        &self,
        id: &AccountId,
        candidate: &Password,
    ) -> Result<(), AccountStoreError>;

    async fn set_new_password(
        &self,
        id: &AccountId,
        new_password: Password,
    ) -> Result<(), AccountStoreError>;

    /// Persists profile, email-confirmation and verification-code state.
    async fn update_account(&self, account: &Account) -> Result<(), AccountStoreError>;

    /// Conditionally replaces the refresh session: succeeds only when the
    /// stored secret equals `expected` (`None` meaning no session) at the
    /// moment of the write. Fails with `RefreshSessionConflict` otherwise.
    async fn rotate_refresh_session(
        &self,
        id: &AccountId,
        expected: Option<&RefreshTokenSecret>,
        new: RefreshSession,
    ) -> Result<(), AccountStoreError>;

    /// Unconditionally drops the stored refresh session.
    async fn clear_refresh_session(&self, id: &AccountId) -> Result<(), AccountStoreError>;

    /// Issues a single-use, time-bounded password-reset token.
    async fn create_password_reset_token(
        &self,
        id: &AccountId,
        ttl: Duration,
    ) -> Result<PasswordResetToken, AccountStoreError>;

    /// Consumes a reset token and installs the new password. Fails with
    /// `InvalidResetToken` when the token is wrong, expired or already used.
    async fn reset_password(
        &self,
        id: &AccountId,
        token: &PasswordResetToken,
        new_password: Password,
    ) -> Result<(), AccountStoreError>;

    /// Soft-deletes the account and clears its refresh session in one step.
    async fn mark_deleted(
        &self,
        id: &AccountId,
        deleted_by: Option<&AccountId>,
        at: DateTime<Utc>,
    ) -> Result<(), AccountStoreError>;

    async fn restore(
        &self,
        id: &AccountId,
        restored_by: Option<&AccountId>,
        at: DateTime<Utc>,
    ) -> Result<(), AccountStoreError>;

    async fn roles_of(&self, id: &AccountId) -> Result<Vec<Role>, AccountStoreError>;

    async fn assign_role(&self, id: &AccountId, role: Role) -> Result<(), AccountStoreError>;
}
