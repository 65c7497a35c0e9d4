// ============================
// crates/backend-lib/src/auth/cookie.rs
// ============================
//! Session cookie encoding.
use axum::http::{header::COOKIE, HeaderMap, HeaderValue};

use crate::config::Settings;
use crate::error::AppError;

/// How the session cookie is named and scoped
#[derive(Debug, Clone)]
pub struct CookiePolicy {
    name: String,
    max_age_secs: u64,
    secure: bool,
}

impl CookiePolicy {
    pub fn new(name: impl Into<String>, max_age_secs: u64, secure: bool) -> Self {
        Self {
            name: name.into(),
            max_age_secs,
            secure,
        }
    }

    /// Production deployments serve the client from another site, which needs
    /// `Secure; SameSite=None`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.session.cookie_name.clone(),
            settings.session.ttl_secs,
            settings.environment.is_production(),
        )
    }

    fn attributes(&self, max_age_secs: u64) -> String {
        let same_site = if self.secure {
            "Secure; SameSite=None"
        } else {
            "SameSite=Lax"
        };
        format!("Path=/; HttpOnly; Max-Age={max_age_secs}; {same_site}")
    }

    /// `Set-Cookie` value handing `token` to the client
    pub fn issue(&self, token: &str) -> Result<HeaderValue, AppError> {
        let value = format!("{}={}; {}", self.name, token, self.attributes(self.max_age_secs));
        HeaderValue::from_str(&value)
            .map_err(|e| AppError::Internal(format!("invalid cookie header: {e}")))
    }

    /// `Set-Cookie` value telling the client to drop the cookie
    pub fn clear(&self) -> Result<HeaderValue, AppError> {
        let value = format!("{}=; {}", self.name, self.attributes(0));
        HeaderValue::from_str(&value)
            .map_err(|e| AppError::Internal(format!("invalid cookie header: {e}")))
    }

    /// Find the session token among the request's cookies
    pub fn extract<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.name)
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
    }
}
