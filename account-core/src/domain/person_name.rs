use thiserror::Error;

pub const MAX_NAME_LENGTH: usize = 50;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PersonNameError {
    #[error("Name is required")]
    Empty,
    #[error("Name must be no more than 50 characters")]
    TooLong,
}

/// First or last name, trimmed and length-bounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    pub fn parse(raw: &str) -> Result<Self, PersonNameError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(PersonNameError::Empty);
        }
        if trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(PersonNameError::TooLong);
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
