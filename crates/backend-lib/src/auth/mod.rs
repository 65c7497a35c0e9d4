// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod cookie;
pub mod password;
pub mod session;
pub mod token_generator;
mod service;
mod service_impl;

pub use cookie::CookiePolicy;
pub use password::{hash_password, verify_password, HashCost, PasswordDigest};
pub use session::{Session, SessionManager, SESSION_TTL_SECS};
pub use service::{AuthOutcome, AuthService};
pub use service_impl::{DefaultAuth, PasswordPolicy};
