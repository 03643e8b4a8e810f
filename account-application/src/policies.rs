use account_core::{PendingVerification, RefreshSession, RefreshTokenSecret, VerificationCode};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// How verification codes are issued: digit count and validity window.
#[derive(Debug, Clone, Copy)]
pub struct VerificationPolicy {
    pub code_length: usize,
    pub code_ttl: Duration,
}

impl VerificationPolicy {
    pub fn new(code_length: usize, ttl_minutes: i64) -> Self {
        Self {
            code_length,
            code_ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn issue(&self, now: DateTime<Utc>) -> PendingVerification {
        PendingVerification::new(
            VerificationCode::generate(self.code_length),
            now + self.code_ttl,
        )
    }

    /// Issues a code from the supplied randomness source.
    pub fn issue_with<R: Rng + ?Sized>(&self, rng: &mut R, now: DateTime<Utc>) -> PendingVerification {
        PendingVerification::new(
            VerificationCode::generate_with(rng, self.code_length),
            now + self.code_ttl,
        )
    }

    pub fn ttl_minutes(&self) -> i64 {
        self.code_ttl.num_minutes()
    }
}

impl Default for VerificationPolicy {
    fn default() -> Self {
        Self::new(VerificationCode::DEFAULT_LENGTH, 15)
    }
}

/// Refresh-session lifetime.
#[derive(Debug, Clone, Copy)]
pub struct RefreshPolicy {
    pub ttl: Duration,
}

impl RefreshPolicy {
    pub fn new(ttl_days: i64) -> Self {
        Self {
            ttl: Duration::days(ttl_days),
        }
    }

    pub fn issue(&self, now: DateTime<Utc>) -> RefreshSession {
        RefreshSession::new(RefreshTokenSecret::generate(), now + self.ttl)
    }
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self::new(7)
    }
}

/// Password-reset token lifetime.
#[derive(Debug, Clone, Copy)]
pub struct ResetPolicy {
    pub token_ttl: Duration,
}

impl ResetPolicy {
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            token_ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn ttl_minutes(&self) -> i64 {
        self.token_ttl.num_minutes()
    }
}

impl Default for ResetPolicy {
    fn default() -> Self {
        Self::new(15)
    }
}
