//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. A `.env` file in the working directory is read first by `main`.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use locker_core::validation::{validate_password, validate_username};

/// Locker API configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub db_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// Directory holding variant photos
    pub upload_dir: PathBuf,

    /// Base URL customers reach the server at, used to build form links
    pub public_url: String,

    /// Session lifetime in seconds
    pub session_ttl_secs: u64,

    /// Max photo upload size in bytes (default: 5MB)
    pub max_upload_bytes: usize,

    /// Account created when the user table is empty
    pub admin_username: String,

    /// Password for the bootstrap account
    pub admin_password: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            db_path: PathBuf::from("./locker.db"),
            db_max_connections: 5,
            upload_dir: PathBuf::from("./uploads"),
            public_url: "http://localhost:3000".to_string(),
            session_ttl_secs: 43_200, // 12 hours
            max_upload_bytes: 5 * 1024 * 1024,
            admin_username: "admin".to_string(),
            admin_password: "adminpass".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();

        let config = ServerConfig {
            host: lookup("LOCKER_HOST").unwrap_or(defaults.host),

            port: parse_or(&lookup, "LOCKER_PORT", defaults.port)?,

            db_path: lookup("LOCKER_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),

            db_max_connections: parse_or(
                &lookup,
                "LOCKER_DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            )?,

            upload_dir: lookup("LOCKER_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),

            public_url: lookup("LOCKER_PUBLIC_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.public_url),

            session_ttl_secs: parse_or(&lookup, "LOCKER_SESSION_TTL_SECS", defaults.session_ttl_secs)?,

            max_upload_bytes: parse_or(&lookup, "LOCKER_MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,

            admin_username: lookup("LOCKER_ADMIN_USERNAME").unwrap_or(defaults.admin_username),

            admin_password: lookup("LOCKER_ADMIN_PASSWORD").unwrap_or(defaults.admin_password),

            request_timeout_secs: parse_or(
                &lookup,
                "LOCKER_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("LOCKER_DB_MAX_CONNECTIONS".to_string()));
        }
        if config.session_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue("LOCKER_SESSION_TTL_SECS".to_string()));
        }
        if config.public_url.is_empty() {
            return Err(ConfigError::MissingRequired("LOCKER_PUBLIC_URL".to_string()));
        }
        validate_username(&config.admin_username)
            .map_err(|_| ConfigError::InvalidValue("LOCKER_ADMIN_USERNAME".to_string()))?;
        validate_password(&config.admin_password)
            .map_err(|_| ConfigError::InvalidValue("LOCKER_ADMIN_PASSWORD".to_string()))?;

        Ok(config)
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Customer-facing links for an out-of-stock variant.
    pub fn request_links(&self, variant_id: &str) -> RequestLinks {
        RequestLinks {
            contact_url: format!("{}/api/v1/public/contact/{}", self.public_url, variant_id),
            pre_order_url: format!("{}/api/v1/public/pre-order/{}", self.public_url, variant_id),
        }
    }

    /// Absolute URL of a stored photo.
    pub fn photo_url(&self, photo: &str) -> String {
        format!("{}/api/v1/assets/{}", self.public_url, photo)
    }
}

/// Where a customer can ask to be told about, or pre-order, a sold-out variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestLinks {
    pub contact_url: String,
    pub pre_order_url: String,
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
