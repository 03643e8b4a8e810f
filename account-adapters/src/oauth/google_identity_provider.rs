use account_core::{Email, FederatedIdentity, IdentityProvider, IdentityProviderError};
use reqwest::Client;
use secrecy::Secret;
use serde::Deserialize;

/// Validates Google ID tokens against the tokeninfo endpoint.
///
/// The endpoint checks signature and expiry; the audience check against our
/// own client id happens here, so a token minted for another application is
/// rejected even though Google vouches for it.
#[derive(Clone)]
pub struct GoogleIdentityProvider {
    http_client: Client,
    tokeninfo_url: String,
    client_id: String,
}

impl GoogleIdentityProvider {
    pub fn new(http_client: Client, tokeninfo_url: String, client_id: String) -> Self {
        Self {
            http_client,
            tokeninfo_url,
            client_id,
        }
    }
}

/// Claims reported by the tokeninfo endpoint. Everything arrives
/// string-encoded, booleans included.
#[derive(Debug, Deserialize)]
struct TokenInfoResponse {
    aud: String,
    sub: String,
    email: String,
    #[serde(default)]
    email_verified: Option<String>,
    #[serde(default)]
    given_name: Option<String>,
    #[serde(default)]
    family_name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

#[async_trait::async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    #[tracing::instrument(name = "Verifying Google ID token", skip_all)]
    async fn verify_id_token(
        &self,
        id_token: &str,
    ) -> Result<FederatedIdentity, IdentityProviderError> {
        let response = self
            .http_client
            .get(&self.tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| IdentityProviderError::Unreachable(e.to_string()))?;

        // The endpoint answers 4xx for malformed, expired or forged tokens
        if response.status().is_client_error() {
            return Err(IdentityProviderError::InvalidIdToken);
        }

        let info = response
            .error_for_status()
            .map_err(|e| IdentityProviderError::Unreachable(e.to_string()))?
            .json::<TokenInfoResponse>()
            .await
            .map_err(|e| IdentityProviderError::Unreachable(e.to_string()))?;

        if info.aud != self.client_id {
            return Err(IdentityProviderError::InvalidIdToken);
        }

        let email = Email::try_from(Secret::from(info.email))
            .map_err(|_| IdentityProviderError::InvalidIdToken)?;

        Ok(FederatedIdentity {
            subject: info.sub,
            email,
            email_verified: info.email_verified.as_deref() == Some("true"),
            given_name: info.given_name,
            family_name: info.family_name,
            picture: info.picture,
        })
    }
}
