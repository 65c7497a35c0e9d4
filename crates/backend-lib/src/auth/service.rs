// =============
// crates/backend-lib/src/auth/service.rs
// =============
//! This module defines the `AuthService` trait, which is used for authentication
use async_trait::async_trait;
use postboard_common::PublicUser;

use super::Session;
use crate::error::AppError;

/// A successful register or login: who the user is and the session issued to them
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub user: PublicUser,
    pub session: Session,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account and log it in
    async fn register(&self, email: &str, password: &str) -> Result<AuthOutcome, AppError>;

    /// Check credentials and open a session.
    ///
    /// Unknown email and wrong password fail identically with
    /// [`AppError::InvalidCredentials`].
    async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, AppError>;

    /// Destroy a session unconditionally
    async fn logout(&self, session_id: &str) -> Result<(), AppError>;

    /// Resolve a session to its user, or fail [`AppError::NotAuthenticated`]
    async fn current_user(&self, session_id: &str) -> Result<PublicUser, AppError>;
}
