use anyhow::anyhow;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use rand_core::OsRng;
use thiserror::Error;

mod credentials;
mod registry;

pub use credentials::CredentialStore;
pub use registry::{CodeGenerator, MAX_CREATE_ATTEMPTS, RandomCodes, UrlRecord, UrlRegistry};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("email is already registered")]
    DuplicateEmail,
    #[error("invalid email or password")]
    AuthFailure,
    #[error("short code not found")]
    NotFound,
    #[error("short code is owned by another user")]
    Forbidden,
    #[error("no free short code after {} attempts", MAX_CREATE_ATTEMPTS)]
    GenerationExhausted,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Hash a password into a PHC string with a fresh random salt
pub(crate) fn hash_password(password: &str, hasher: &Argon2<'_>) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
