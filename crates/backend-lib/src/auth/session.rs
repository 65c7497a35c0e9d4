// ============================
// crates/backend-lib/src/auth/session.rs
// ============================
//! Session token handling and management.
use chrono::{DateTime, TimeDelta, Utc};
use metrics::counter;
use postboard_common::UserId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::token_generator::{generate_secure_token, is_well_formed};
use crate::error::AppError;
use crate::metrics::{SESSION_CREATED, SESSION_DESTROYED, SESSION_EXPIRED};
use crate::storage::SessionStore;

/// Session TTL (time to live) in seconds
pub const SESSION_TTL_SECS: i64 = 60 * 60 * 24; // 24 hours

/// Server-side session record
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Session {
    pub session_id: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Issues, resolves and destroys sessions held in a [`SessionStore`]
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    ttl: TimeDelta,
}

impl SessionManager {
    /// Create a session manager with the default TTL
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self::with_ttl(store, TimeDelta::seconds(SESSION_TTL_SECS))
    }

    pub fn with_ttl(store: Arc<dyn SessionStore>, ttl: TimeDelta) -> Self {
        Self { store, ttl }
    }

    /// Create a new session for `user_id`
    pub async fn create(&self, user_id: UserId) -> Result<Session, AppError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal(format!("session ttl {} overflows", self.ttl)))?;
        let session = Session {
            session_id: generate_secure_token(),
            user_id,
            created_at: now,
            expires_at,
        };

        self.store.put(&session).await?;

        counter!(SESSION_CREATED).increment(1);
        tracing::debug!(%user_id, "session created");

        Ok(session)
    }

    /// Resolve a session token to its user.
    ///
    /// Unknown, malformed and expired tokens all resolve to `None`.
    pub async fn resolve(&self, session_id: &str) -> Result<Option<UserId>, AppError> {
        if !is_well_formed(session_id) {
            return Ok(None);
        }

        let Some(session) = self.store.get(session_id).await? else {
            return Ok(None);
        };

        if session.is_expired_at(Utc::now()) {
            self.store.delete(session_id).await?;
            counter!(SESSION_EXPIRED).increment(1);
            return Ok(None);
        }

        Ok(Some(session.user_id))
    }

    /// Destroy a session. Destroying an unknown session succeeds.
    pub async fn destroy(&self, session_id: &str) -> Result<(), AppError> {
        if !is_well_formed(session_id) {
            return Ok(());
        }

        self.store.delete(session_id).await?;

        counter!(SESSION_DESTROYED).increment(1);
        tracing::debug!("session destroyed");

        Ok(())
    }
}
