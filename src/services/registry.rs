use std::collections::BTreeMap;

use dashmap::{DashMap, mapref::entry::Entry};
use serde::Serialize;

use crate::{
    domain::{ShortCode, TargetUrl, UserId},
    services::ServiceError,
};

pub const MAX_CREATE_ATTEMPTS: usize = 10;

/// Source of candidate short codes. Candidates may collide; the registry retries.
pub trait CodeGenerator: Send + Sync + 'static {
    fn generate(&self) -> ShortCode;
}

/// Uniform random codes over `[A-Za-z0-9]{6}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodes;

impl CodeGenerator for RandomCodes {
    fn generate(&self) -> ShortCode {
        ShortCode::random()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlRecord {
    pub target_url: TargetUrl,
    pub owner_id: UserId,
}

/// Short code -> URL records, every mutation gated on ownership.
pub struct UrlRegistry {
    urls: DashMap<ShortCode, UrlRecord>,
    generator: Box<dyn CodeGenerator>,
}

impl UrlRegistry {
    pub fn new() -> Self {
        Self::with_generator(RandomCodes)
    }

    pub fn with_generator(generator: impl CodeGenerator) -> Self {
        Self {
            urls: DashMap::new(),
            generator: Box::new(generator),
        }
    }

    /// Store `target_url` under a fresh code owned by `owner_id`
    ///
    /// `owner_id` is trusted as-is: callers pass the id of an authenticated,
    /// registered user (the HTTP layer takes it from `RequireUser`).
    #[tracing::instrument(name = "services::create_url", skip(self))]
    pub fn create(
        &self,
        owner_id: &UserId,
        target_url: TargetUrl,
    ) -> Result<ShortCode, ServiceError> {
        for _ in 0..MAX_CREATE_ATTEMPTS {
            let code = self.generator.generate();

            if let Entry::Vacant(slot) = self.urls.entry(code.clone()) {
                slot.insert(UrlRecord {
                    target_url,
                    owner_id: owner_id.clone(),
                });
                return Ok(code);
            }
        }

        Err(ServiceError::GenerationExhausted)
    }

    /// Insert a record under a chosen code, if that code is free
    pub fn seed(&self, code: ShortCode, record: UrlRecord) -> bool {
        match self.urls.entry(code) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
        }
    }

    pub fn get(&self, code: &ShortCode) -> Option<UrlRecord> {
        self.urls.get(code).map(|entry| entry.value().clone())
    }

    #[tracing::instrument(name = "services::update_url", skip(self))]
    pub fn update(
        &self,
        code: &ShortCode,
        requester: &UserId,
        new_target: TargetUrl,
    ) -> Result<(), ServiceError> {
        let mut record = self.urls.get_mut(code).ok_or(ServiceError::NotFound)?;

        if record.owner_id != *requester {
            return Err(ServiceError::Forbidden);
        }
        record.target_url = new_target;

        Ok(())
    }

    #[tracing::instrument(name = "services::delete_url", skip(self))]
    pub fn delete(&self, code: &ShortCode, requester: &UserId) -> Result<(), ServiceError> {
        match self.urls.entry(code.clone()) {
            Entry::Vacant(_) => Err(ServiceError::NotFound),
            Entry::Occupied(entry) if entry.get().owner_id != *requester => {
                Err(ServiceError::Forbidden)
            }
            Entry::Occupied(entry) => {
                entry.remove();
                Ok(())
            }
        }
    }

    /// Snapshot of every record owned by `owner_id`
    #[tracing::instrument(name = "services::list_urls_by_owner", skip(self))]
    pub fn list_by_owner(&self, owner_id: &UserId) -> BTreeMap<ShortCode, UrlRecord> {
        self.urls
            .iter()
            .filter(|entry| entry.value().owner_id == *owner_id)
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl Default for UrlRegistry {
    fn default() -> Self {
        Self::new()
    }
}
