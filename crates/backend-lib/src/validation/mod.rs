// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request input validation.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Passwords shorter than this are rejected regardless of configuration
pub const MIN_PASSWORD_LENGTH: usize = 6;
const MAX_PASSWORD_LENGTH: usize = 128;
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email regex is valid")
});

/// Possible validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Email is required")]
    MissingEmail,

    #[error("Email must be a valid email address")]
    InvalidEmail,

    #[error("Password is required")]
    MissingPassword,

    #[error("Password must be at least {0} characters long")]
    PasswordTooShort(usize),

    #[error("Password cannot exceed {MAX_PASSWORD_LENGTH} characters")]
    PasswordTooLong,

    #[error("Post content cannot be empty")]
    EmptyContent,
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Normalize an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate an email address, returning its normalized form
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = normalize_email(email);

    if email.is_empty() {
        return Err(ValidationError::MissingEmail);
    }

    if email.len() > MAX_EMAIL_LENGTH || !EMAIL_REGEX.is_match(&email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(email)
}

/// Validate a password against a minimum length.
///
/// `min_length` is clamped to [`MIN_PASSWORD_LENGTH`].
pub fn validate_password(password: &str, min_length: usize) -> ValidationResult<&str> {
    if password.is_empty() {
        return Err(ValidationError::MissingPassword);
    }

    let min_length = min_length.max(MIN_PASSWORD_LENGTH);
    let len = password.chars().count();

    if len < min_length {
        return Err(ValidationError::PasswordTooShort(min_length));
    }

    if len > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooLong);
    }

    Ok(password)
}

/// Validate post content, returning it trimmed
pub fn validate_post_content(content: &str) -> ValidationResult<&str> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    Ok(content)
}
