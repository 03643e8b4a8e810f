use account_core::{
    Account, AccountStore, AccountStoreError, Email, EmailClient, Password, Profile, Role,
};
use chrono::Utc;

use crate::policies::VerificationPolicy;

/// Validated registration data. Password confirmation is a transport-level
/// check and never reaches this layer.
#[derive(Debug)]
pub struct Registration {
    pub email: Email,
    pub profile: Profile,
    pub password: Password,
}

/// Error types for register use case
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("Email already exists")]
    DuplicateEmail,
    #[error("Account store error: {0}")]
    AccountStoreError(#[from] AccountStoreError),
}

/// Register use case - creates an unverified account and emails the
/// verification code.
pub struct RegisterUseCase<S, E>
where
    S: AccountStore,
    E: EmailClient,
{
    account_store: S,
    email_client: E,
    verification_policy: VerificationPolicy,
}

impl<S, E> RegisterUseCase<S, E>
where
    S: AccountStore,
    E: EmailClient,
{
    pub fn new(account_store: S, email_client: E, verification_policy: VerificationPolicy) -> Self {
        Self {
            account_store,
            email_client,
            verification_policy,
        }
    }

    /// Execute the register use case
    ///
    /// Creates the account in the unverified state with a fresh verification
    /// code, assigns the default role, and dispatches the verification email.
    /// Email delivery is best-effort; a failed send never fails registration.
    #[tracing::instrument(name = "RegisterUseCase::execute", skip(self, registration))]
    pub async fn execute(&self, registration: Registration) -> Result<(), RegisterError> {
        let now = Utc::now();

        // Pre-check for a friendly error; the store's uniqueness constraint
        // still closes the race between concurrent registrations.
        if self
            .account_store
            .find_by_email(&registration.email)
            .await?
            .is_some()
        {
            return Err(RegisterError::DuplicateEmail);
        }

        let verification = self.verification_policy.issue(now);
        let account = Account::local(
            registration.email,
            registration.profile,
            verification.clone(),
            now,
        );
        let account_id = account.id();
        let email = account.email().clone();

        self.account_store
            .add_account(account, Some(registration.password))
            .await
            .map_err(|e| match e {
                AccountStoreError::AccountAlreadyExists => RegisterError::DuplicateEmail,
                other => RegisterError::AccountStoreError(other),
            })?;

        self.account_store
            .assign_role(&account_id, Role::default())
            .await?;

        let content = format!(
            "Your verification code is {}. The code will expire in {} minutes.",
            verification.code().as_str(),
            self.verification_policy.ttl_minutes()
        );

        if let Err(e) = self
            .email_client
            .send_email(&email, "Verify your Email", &content, true)
            .await
        {
            tracing::warn!("Failed to send verification email: {}", e);
        }

        Ok(())
    }
}
