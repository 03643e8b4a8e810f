use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static PHONE_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 ()-]*$").unwrap());

pub const MAX_PHONE_LENGTH: usize = 15;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhoneNumberError {
    #[error("Invalid phone format")]
    InvalidFormat,
    #[error("Phone number must be no more than 15 characters")]
    TooLong,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: &str) -> Result<Self, PhoneNumberError> {
        let trimmed = raw.trim();

        if trimmed.len() > MAX_PHONE_LENGTH {
            return Err(PhoneNumberError::TooLong);
        }
        if !PHONE_FORMAT.is_match(trimmed) {
            return Err(PhoneNumberError::InvalidFormat);
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
