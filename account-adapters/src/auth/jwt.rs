use account_core::{AccountId, Email, Role};
use axum::http::{HeaderMap, header};
use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Validation, decode, encode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize, ser::SerializeStruct};
use thiserror::Error;
use uuid::Uuid;

use crate::config::settings::JwtSetting;

#[derive(Debug, Error)]
pub enum TokenAuthError {
    #[error("Missing token")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token error: {0}")]
    TokenError(jsonwebtoken::errors::Error),
    #[error("Unexpected error")]
    UnexpectedError(String),
}

/// Claim set of an access token. `sub` is the account id, `jti` a random id
/// that survives refresh renewals unchanged.
#[derive(Debug, Deserialize, Clone)]
pub struct AccessTokenClaims {
    pub sub: String,
    pub email: Secret<String>,
    pub jti: String,
    pub roles: Vec<String>,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl AccessTokenClaims {
    pub fn account_id(&self) -> Result<AccountId, TokenAuthError> {
        self.sub.parse().map_err(|_| TokenAuthError::InvalidToken)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.iter().any(|claimed| claimed == role.as_str())
    }
}

impl Serialize for AccessTokenClaims {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AccessTokenClaims", 8)?;
        state.serialize_field("sub", &self.sub)?;
        state.serialize_field("email", &self.email.expose_secret())?;
        state.serialize_field("jti", &self.jti)?;
        state.serialize_field("roles", &self.roles)?;
        state.serialize_field("iss", &self.iss)?;
        state.serialize_field("aud", &self.aud)?;
        state.serialize_field("iat", &self.iat)?;
        state.serialize_field("exp", &self.exp)?;
        state.end()
    }
}

/// A freshly signed access token together with its expiry instant.
#[derive(Debug, Clone)]
pub struct IssuedAccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

// Mint a new access token for an authenticated account
pub fn generate_access_token(
    account_id: AccountId,
    email: &Email,
    roles: &[Role],
    config: &JwtSetting,
) -> Result<IssuedAccessToken, TokenAuthError> {
    let now = Utc::now();
    let expires_at = token_expiry(now, config.token_validity_minutes)?;

    let claims = AccessTokenClaims {
        sub: account_id.to_string(),
        email: Clone::clone(email.as_ref()),
        jti: Uuid::new_v4().to_string(),
        roles: roles.iter().map(|role| role.to_string()).collect(),
        iss: config.valid_issuer.clone(),
        aud: config.valid_audience.clone(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    let token = create_token(&claims, config.secret_bytes())?;

    Ok(IssuedAccessToken { token, expires_at })
}

// Re-mint a token recovered from an expired one. The identity claims carry
// over unchanged, only the validity window moves.
pub fn renew_access_token(
    claims: &AccessTokenClaims,
    config: &JwtSetting,
) -> Result<IssuedAccessToken, TokenAuthError> {
    let now = Utc::now();
    let expires_at = token_expiry(now, config.token_validity_minutes)?;

    let mut claims = claims.clone();
    claims.iat = now.timestamp();
    claims.exp = expires_at.timestamp();

    let token = create_token(&claims, config.secret_bytes())?;

    Ok(IssuedAccessToken { token, expires_at })
}

/// Full validation for protected routes: signature, algorithm, expiry,
/// issuer and audience all have to check out.
pub fn validate_access_token(
    token: &str,
    config: &JwtSetting,
) -> Result<AccessTokenClaims, TokenAuthError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[config.valid_issuer.as_str()]);
    validation.set_audience(&[config.valid_audience.as_str()]);

    decode::<AccessTokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(TokenAuthError::TokenError)
}

/// Recovers the claims of an access token during refresh. The signature and
/// the HS256 algorithm still have to check out; only the expiry is allowed to
/// have passed.
pub fn validate_expired_access_token(
    token: &str,
    config: &JwtSetting,
) -> Result<AccessTokenClaims, TokenAuthError> {
    let mut validation = Validation::default();
    validation.validate_exp = false;
    validation.validate_aud = false;

    decode::<AccessTokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(TokenAuthError::TokenError)
}

pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, TokenAuthError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or(TokenAuthError::MissingToken)?;

    header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(TokenAuthError::InvalidToken)
}

fn token_expiry(now: DateTime<Utc>, ttl_minutes: i64) -> Result<DateTime<Utc>, TokenAuthError> {
    let delta = chrono::Duration::try_minutes(ttl_minutes).ok_or(
        TokenAuthError::UnexpectedError("Failed to create access token duration".to_string()),
    )?;

    now.checked_add_signed(delta)
        .ok_or(TokenAuthError::UnexpectedError(
            "Duration out of range".to_string(),
        ))
}

// Sign the claims using the shared secret
fn create_token(claims: &AccessTokenClaims, secret: &[u8]) -> Result<String, TokenAuthError> {
    encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(TokenAuthError::TokenError)
}
