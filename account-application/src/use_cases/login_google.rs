use account_core::{
    Account, AccountStore, AccountStoreError, IdentityProvider, IdentityProviderError, PersonName,
    Profile, Role,
};
use chrono::Utc;

use crate::{
    policies::RefreshPolicy,
    session::ensure_refresh_session,
    use_cases::login::AuthenticatedAccount,
};

/// Error types for Google login use case
#[derive(Debug, thiserror::Error)]
pub enum LoginGoogleError {
    #[error("External authentication failed: {0}")]
    ExternalAuthError(#[from] IdentityProviderError),
    #[error("Account has been deleted")]
    AccountDeleted,
    #[error("Account store error: {0}")]
    AccountStoreError(#[from] AccountStoreError),
}

/// Google login use case - validates the provider's ID token and signs the
/// matching local account in, provisioning one on first contact.
///
/// Provisioned accounts have no password and take `email_confirmed` from the
/// provider's assertion: the provider is trusted for email ownership.
pub struct LoginGoogleUseCase<S, P>
where
    S: AccountStore,
    P: IdentityProvider,
{
    account_store: S,
    identity_provider: P,
    refresh_policy: RefreshPolicy,
}

impl<S, P> LoginGoogleUseCase<S, P>
where
    S: AccountStore,
    P: IdentityProvider,
{
    pub fn new(account_store: S, identity_provider: P, refresh_policy: RefreshPolicy) -> Self {
        Self {
            account_store,
            identity_provider,
            refresh_policy,
        }
    }

    #[tracing::instrument(name = "LoginGoogleUseCase::execute", skip(self, id_token))]
    pub async fn execute(&self, id_token: &str) -> Result<AuthenticatedAccount, LoginGoogleError> {
        let now = Utc::now();

        let identity = self.identity_provider.verify_id_token(id_token).await?;

        let account = match self.account_store.find_by_email(&identity.email).await? {
            Some(account) => account,
            None => {
                let profile = Profile {
                    first_name: identity
                        .given_name
                        .as_deref()
                        .and_then(|name| PersonName::parse(name).ok()),
                    last_name: identity
                        .family_name
                        .as_deref()
                        .and_then(|name| PersonName::parse(name).ok()),
                    picture: identity.picture.clone(),
                    ..Profile::default()
                };
                let account = Account::federated(
                    identity.email.clone(),
                    profile,
                    identity.email_verified,
                    now,
                );

                match self.account_store.add_account(account.clone(), None).await {
                    Ok(()) => {
                        self.account_store
                            .assign_role(&account.id(), Role::default())
                            .await?;
                        account
                    }
                    // A concurrent first login already provisioned it.
                    Err(AccountStoreError::AccountAlreadyExists) => self
                        .account_store
                        .find_by_email(&identity.email)
                        .await?
                        .ok_or(AccountStoreError::AccountNotFound)?,
                    Err(other) => return Err(other.into()),
                }
            }
        };

        if account.is_deleted() {
            return Err(LoginGoogleError::AccountDeleted);
        }

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
