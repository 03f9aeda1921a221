use std::{sync::Arc, time::Duration};

use base64::Engine;
use dashmap::DashMap;
use rand_core::{OsRng, RngCore};
use time::OffsetDateTime;

use crate::domain::UserId;

/// Longest session lifetime; larger values are capped to it.
pub const MAX_SESSION_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Debug, PartialEq, Eq)]
pub enum SessionError {
    NotExists,
    Expired,
}

struct SessionData {
    user_id: UserId,
    expires_at: OffsetDateTime,
}

/// Live login sessions keyed by the opaque `sid` cookie value
#[derive(Clone)]
pub struct Sessions {
    inner: Arc<DashMap<String, SessionData>>,
    ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Sessions {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl: ttl.min(MAX_SESSION_TTL),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn new_session(&self, user_id: UserId) -> SessionId {
        use base64::engine::general_purpose::URL_SAFE_NO_PAD as Base64;

        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);

        let session_id = Base64.encode(bytes);
        let expires_at = OffsetDateTime::now_utc() + self.ttl;
        self.inner.insert(
            session_id.clone(),
            SessionData {
                user_id,
                expires_at,
            },
        );

        SessionId(session_id)
    }

    pub fn get_user_id(&self, session_id: &str) -> Result<UserId, SessionError> {
        let now = OffsetDateTime::now_utc();

        match self.inner.get(session_id) {
            None => return Err(SessionError::NotExists),
            Some(session) if session.expires_at > now => return Ok(session.user_id.clone()),
            Some(_) => {}
        }

        self.inner
            .remove_if(session_id, |_, session| session.expires_at <= now);
        Err(SessionError::Expired)
    }

    /// Forget a session; returns whether it existed
    pub fn end_session(&self, session_id: &str) -> bool {
        self.inner.remove(session_id).is_some()
    }

    /// Drop every expired session, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = OffsetDateTime::now_utc();
        let mut removed = 0;
        self.inner.retain(|_, session| {
            let live = session.expires_at > now;
            if !live {
                removed += 1;
            }
            live
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
