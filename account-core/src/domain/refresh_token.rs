use base64ct::{Base64, Encoding};
use chrono::{DateTime, Utc};
use rand::RngCore;
use secrecy::{ExposeSecret, Secret};

/// 64 random bytes gives 512 bits of entropy per secret.
const SECRET_BYTES: usize = 64;

/// Opaque refresh-token secret. Never derived from account data, compared
/// byte-for-byte against the stored value on refresh.
#[derive(Debug, Clone)]
pub struct RefreshTokenSecret(Secret<String>);

impl RefreshTokenSecret {
    pub fn generate() -> Self {
        let mut bytes = [0u8; SECRET_BYTES];
        rand::rng().fill_bytes(&mut bytes);

        Self(Secret::from(Base64::encode_string(&bytes)))
    }

    pub fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl From<Secret<String>> for RefreshTokenSecret {
    fn from(raw: Secret<String>) -> Self {
        Self(raw)
    }
}

impl PartialEq for RefreshTokenSecret {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Eq for RefreshTokenSecret {}

/// The single live refresh token of an account. Secret and expiry always
/// travel together; rotation replaces the whole session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSession {
    secret: RefreshTokenSecret,
    expires_at: DateTime<Utc>,
}

impl RefreshSession {
    pub fn new(secret: RefreshTokenSecret, expires_at: DateTime<Utc>) -> Self {
        Self { secret, expires_at }
    }

    pub fn secret(&self) -> &RefreshTokenSecret {
        &self.secret
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn matches(&self, candidate: &RefreshTokenSecret) -> bool {
        &self.secret == candidate
    }
}
