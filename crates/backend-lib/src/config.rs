// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::{bail, Result};
use axum::http::HeaderValue;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::validation::MIN_PASSWORD_LENGTH;

/// Config file read when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "postboard.toml";

/// Prefix of environment variable overrides, e.g. `POSTBOARD_SESSION__TTL_SECS`
pub const ENV_PREFIX: &str = "POSTBOARD_";

/// Longest session lifetime accepted, ten years
pub const MAX_SESSION_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Deployment environment. Production switches cookies to `Secure; SameSite=None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Data directory path
    pub data_dir: PathBuf,
    /// Log level
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Deployment environment
    pub environment: Environment,
    /// Origin allowed by CORS (the web client)
    pub client_url: String,
    /// Session settings
    pub session: SessionSettings,
    /// Password settings
    pub password: PasswordSettings,
}

/// Session cookie and lifetime settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Session lifetime in seconds, also the cookie max-age
    pub ttl_secs: u64,
    /// Name of the session cookie
    pub cookie_name: String,
}

/// Password policy and hashing cost
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordSettings {
    /// Minimum password length
    pub min_length: usize,
    /// scrypt cost parameter (log2 of N)
    pub hash_log_n: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            log_json: false,
            environment: Environment::default(),
            client_url: "http://localhost:5173".to_string(),
            session: SessionSettings::default(),
            password: PasswordSettings::default(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl_secs: 60 * 60 * 24, // 24 hours
            cookie_name: "session".to_string(),
        }
    }
}

impl Default for PasswordSettings {
    fn default() -> Self {
        Self {
            min_length: MIN_PASSWORD_LENGTH,
            hash_log_n: 15,
        }
    }
}

impl Settings {
    /// Load settings: defaults, then the TOML file, then `POSTBOARD_*` env vars.
    ///
    /// A missing config file is not an error.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let file = config_file.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check the settings for values the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            bail!("invalid log level '{}'", self.log_level);
        }

        if self.session.ttl_secs == 0 {
            bail!("session.ttl_secs must be greater than zero");
        }

        if self.session.ttl_secs > MAX_SESSION_TTL_SECS {
            bail!("session.ttl_secs must be at most {MAX_SESSION_TTL_SECS}");
        }

        if self.session.cookie_name.is_empty()
            || !self
                .session
                .cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            bail!("session.cookie_name must be a non-empty token");
        }

        if self.password.min_length < MIN_PASSWORD_LENGTH {
            bail!("password.min_length must be at least {MIN_PASSWORD_LENGTH}");
        }

        if !(1..=20).contains(&self.password.hash_log_n) {
            bail!("password.hash_log_n must be between 1 and 20");
        }

        if HeaderValue::from_str(&self.client_url).is_err() {
            bail!("client_url '{}' is not a valid origin", self.client_url);
        }

        Ok(())
    }
}
