use std::fmt::Display;

use serde::Serialize;
use thiserror::Error;

use super::random_alphanumeric;

pub const SHORT_CODE_LENGTH: usize = 6;

/// Key of a shortened URL: exactly six ASCII alphanumeric characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ShortCode(String);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ShortCodeParseError {
    #[error("must be exactly {} characters", SHORT_CODE_LENGTH)]
    WrongLength,
    #[error("contains invalid characters")]
    InvalidCharacters,
}

impl ShortCode {
    pub fn parse(input: &str) -> Result<Self, ShortCodeParseError> {
        if input.len() != SHORT_CODE_LENGTH {
            return Err(ShortCodeParseError::WrongLength);
        }
        if !input.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ShortCodeParseError::InvalidCharacters);
        }
        Ok(Self(input.to_string()))
    }

    /// A fresh code drawn uniformly from the 62-symbol alphabet.
    pub fn random() -> Self {
        Self(random_alphanumeric(SHORT_CODE_LENGTH))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ShortCode {
    type Error = ShortCodeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
