use chrono::{DateTime, Utc};
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerificationCodeError {
    #[error("Verification code must be numeric")]
    NotNumeric,
    #[error("Verification code is empty")]
    Empty,
}

/// Short-lived numeric code proving email ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationCode(String);

impl VerificationCode {
    pub const DEFAULT_LENGTH: usize = 6;

    /// Generates a code from the supplied randomness source.
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, length: usize) -> Self {
        let digits = (0..length)
            .map(|_| char::from(b'0' + rng.random_range(0u8..10)))
            .collect();

        Self(digits)
    }

    pub fn generate(length: usize) -> Self {
        Self::generate_with(&mut rand::rng(), length)
    }

    pub fn parse(raw: &str) -> Result<Self, VerificationCodeError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(VerificationCodeError::Empty);
        }
        if !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(VerificationCodeError::NotNumeric);
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Verification code plus its expiry. The two always travel together, so a
/// missing pair is simply `None` on the account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingVerification {
    code: VerificationCode,
    expires_at: DateTime<Utc>,
}

impl PendingVerification {
    pub fn new(code: VerificationCode, expires_at: DateTime<Utc>) -> Self {
        Self { code, expires_at }
    }

    pub fn code(&self) -> &VerificationCode {
        &self.code
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
