// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the Postboard server.

pub mod auth;

pub use auth::{require_authenticated, AuthSession};
