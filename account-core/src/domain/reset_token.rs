use base64ct::{Base64, Encoding};
use rand::RngCore;
use secrecy::{ExposeSecret, Secret};

const TOKEN_BYTES: usize = 32;

/// Single-use password-reset token. Issued and consumed by the account store,
/// which enforces the expiry window.
#[derive(Debug, Clone)]
pub struct PasswordResetToken(Secret<String>);

impl PasswordResetToken {
    pub fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);

        Self(Secret::from(Base64::encode_string(&bytes)))
    }

    pub fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl From<Secret<String>> for PasswordResetToken {
    fn from(raw: Secret<String>) -> Self {
        Self(raw)
    }
}

impl PartialEq for PasswordResetToken {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Eq for PasswordResetToken {}
