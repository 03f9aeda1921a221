use std::fmt::Display;

use serde::Serialize;
use thiserror::Error;

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Login name of a user. Compared byte for byte: no case folding, no trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EmailParseError {
    #[error("email is empty")]
    Empty,
    #[error("email is too long")]
    TooLong,
    #[error("email is malformed")]
    Malformed,
}

impl Email {
    pub fn parse(input: &str) -> Result<Self, EmailParseError> {
        if input.is_empty() {
            return Err(EmailParseError::Empty);
        }
        if input.len() > MAX_EMAIL_LENGTH {
            return Err(EmailParseError::TooLong);
        }
        if input.contains(char::is_whitespace) {
            return Err(EmailParseError::Malformed);
        }
        match input.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(input.to_string()))
            }
            _ => Err(EmailParseError::Malformed),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Plaintext password as submitted by a client. Never logged, never stored.
pub struct Password(String);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PasswordParseError {
    #[error("password is empty")]
    Empty,
    #[error("password is too long")]
    TooLong,
}

impl Password {
    pub fn parse(input: &str) -> Result<Self, PasswordParseError> {
        if input.is_empty() {
            return Err(PasswordParseError::Empty);
        }
        if input.len() > MAX_PASSWORD_LENGTH {
            return Err(PasswordParseError::TooLong);
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}
