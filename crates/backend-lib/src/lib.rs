// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the Postboard feed server.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod posts;
pub mod router;
pub mod storage;
pub mod validation;

use anyhow::anyhow;
use chrono::TimeDelta;
use std::sync::Arc;

use crate::auth::{AuthService, CookiePolicy, DefaultAuth, HashCost, PasswordPolicy, SessionManager};
use crate::config::Settings;
use crate::posts::PostService;
use crate::storage::Storage;

/// Application state shared across all handlers
pub struct AppState<S> {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Session manager
    pub sessions: SessionManager,
    /// Post service
    pub posts: PostService,
    /// Session cookie policy
    pub cookies: CookiePolicy,
    /// Configuration settings
    pub settings: Arc<Settings>,
    /// Storage backend
    pub storage: Arc<S>,
}

impl<S: Storage + 'static> AppState<S> {
    /// Create a new application state
    pub fn new(storage: S, config: &Settings) -> anyhow::Result<Self> {
        let storage = Arc::new(storage);

        let ttl_secs = i64::try_from(config.session.ttl_secs)?;
        let ttl = TimeDelta::try_seconds(ttl_secs)
            .ok_or_else(|| anyhow!("session ttl of {ttl_secs}s is out of range"))?;
        let sessions = SessionManager::with_ttl(storage.clone(), ttl);

        let policy = PasswordPolicy {
            min_length: config.password.min_length,
            cost: HashCost {
                log_n: config.password.hash_log_n,
            },
        };
        let auth = Arc::new(DefaultAuth::new(storage.clone(), sessions.clone(), policy)?);
        let posts = PostService::new(storage.clone(), storage.clone());

        Ok(Self {
            auth,
            sessions,
            posts,
            cookies: CookiePolicy::from_settings(config),
            settings: Arc::new(config.clone()),
            storage,
        })
    }
}
