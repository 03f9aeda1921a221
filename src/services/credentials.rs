use anyhow::anyhow;
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use dashmap::{DashMap, mapref::entry::Entry};

use crate::{
    domain::{Email, Password, User, UserId},
    services::ServiceError,
};

use super::hash_password;

/// Registered users, indexed by id and by exact email.
pub struct CredentialStore {
    users: DashMap<UserId, User>,
    emails: DashMap<String, UserId>,
    hasher: Argon2<'static>,
}

impl CredentialStore {
    pub fn new(hasher: Argon2<'static>) -> Self {
        Self {
            users: DashMap::new(),
            emails: DashMap::new(),
            hasher,
        }
    }

    /// Register a new account and return its id
    ///
    /// Fails with `DuplicateEmail` if the exact email is taken; the store is left untouched.
    #[tracing::instrument(name = "services::register", skip_all)]
    pub fn register(&self, email: Email, password: &Password) -> Result<UserId, ServiceError> {
        // skip the expensive hash for the common duplicate case
        if self.emails.contains_key(email.as_str()) {
            return Err(ServiceError::DuplicateEmail);
        }

        let hash = hash_password(password.as_str(), &self.hasher)?;

        // Lock order is always emails -> users
        let slot = match self.emails.entry(email.as_str().to_string()) {
            Entry::Occupied(_) => return Err(ServiceError::DuplicateEmail),
            Entry::Vacant(slot) => slot,
        };

        let id = loop {
            let id = UserId::random();
            if let Entry::Vacant(user_slot) = self.users.entry(id.clone()) {
                user_slot.insert(User::new(id.clone(), email, hash));
                break id;
            }
        };
        slot.insert(id.clone());

        Ok(id)
    }

    #[tracing::instrument(name = "services::find_by_email", skip_all)]
    pub fn find_by_email(&self, email: &str) -> Option<User> {
        let id = self.emails.get(email)?.value().clone();
        self.find_by_id(&id)
    }

    pub fn find_by_id(&self, id: &UserId) -> Option<User> {
        self.users.get(id).map(|entry| entry.value().clone())
    }

    /// Check a login attempt
    ///
    /// Unknown email and wrong password both yield `AuthFailure`.
    #[tracing::instrument(name = "services::verify_user_password", skip_all)]
    pub fn verify(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        let Some(user) = self.find_by_email(email) else {
            // both failure paths cost one argon2 computation
            let _ = hash_password(password, &self.hasher);
            return Err(ServiceError::AuthFailure);
        };

        let hash = PasswordHash::new(user.password_hash())
            .map_err(|e| anyhow!("invalid password hash: {e}"))?;

        if self
            .hasher
            .verify_password(password.as_bytes(), &hash)
            .is_err()
        {
            return Err(ServiceError::AuthFailure);
        }

        Ok(user)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
