//! Configuration module for Filedock.

use serde::Deserialize;
use std::path::Path;

use crate::{FiledockError, Result};

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/filedock.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Blob store configuration.
///
/// Filedock never stores file bytes itself; it only resolves display URLs
/// against the external blob store that holds them.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Public base URL of the blob store. Storage references are resolved
    /// relative to this. Leave empty to run without URL resolution (files
    /// are then listed with a null URL).
    #[serde(default)]
    pub public_base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            public_base_url: String::new(),
        }
    }
}

/// Purge sweep configuration.
///
/// The sweep permanently removes files that have been soft-deleted. Cadence
/// is deployment policy, not part of the lifecycle contract.
#[derive(Debug, Clone, Deserialize)]
pub struct SweepConfig {
    /// Whether the in-process sweep task runs at all. Disable when an
    /// external scheduler drives purging instead.
    #[serde(default = "default_sweep_enabled")]
    pub enabled: bool,
    /// Interval between sweep runs in seconds.
    #[serde(default = "default_sweep_interval")]
    pub interval_secs: u64,
}

fn default_sweep_enabled() -> bool {
    true
}

fn default_sweep_interval() -> u64 {
    86400 // daily
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: default_sweep_enabled(),
            interval_secs: default_sweep_interval(),
        }
    }
}

/// Web API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Host address to bind.
    #[serde(default = "default_web_host")]
    pub host: String,
    /// Port number for the Web API.
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// JWT secret key shared with the identity provider (must be set).
    #[serde(default)]
    pub jwt_secret: String,
    /// Rate limit for API endpoints (requests per minute, per IP).
    #[serde(default = "default_api_rate_limit")]
    pub api_rate_limit: u32,
}

fn default_web_host() -> String {
    "0.0.0.0".to_string()
}

fn default_web_port() -> u16 {
    8710
}

fn default_api_rate_limit() -> u32 {
    300
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
            cors_origins: vec![],
            jwt_secret: String::new(),
            api_rate_limit: default_api_rate_limit(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/filedock.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Blob store settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Purge sweep settings.
    #[serde(default)]
    pub sweep: SweepConfig,
    /// Web API settings.
    #[serde(default)]
    pub web: WebConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FiledockError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable
    /// overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FiledockError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `FILEDOCK_JWT_SECRET`: Override the JWT secret key
    pub fn apply_env_overrides(&mut self) {
        if let Ok(jwt_secret) = std::env::var("FILEDOCK_JWT_SECRET") {
            if !jwt_secret.is_empty() {
                self.web.jwt_secret = jwt_secret;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if the JWT secret is not set: every request is
    /// authenticated against the identity provider's tokens, so the server
    /// cannot run without it.
    pub fn validate(&self) -> Result<()> {
        if self.web.jwt_secret.is_empty() {
            return Err(FiledockError::Config(
                "jwt_secret is not set. Set it in filedock.toml or via the \
                 FILEDOCK_JWT_SECRET environment variable."
                    .to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database.path, "data/filedock.db");
        assert_eq!(config.web.host, "0.0.0.0");
        assert_eq!(config.web.port, 8710);
        assert!(config.web.cors_origins.is_empty());
        assert!(config.sweep.enabled);
        assert_eq!(config.sweep.interval_secs, 86400);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_empty() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.web.port, 8710);
        assert_eq!(config.storage.public_base_url, "");
    }

    #[test]
    fn test_parse_partial() {
        let config = Config::parse(
            r#"
[web]
port = 9000
jwt_secret = "secret"

[storage]
public_base_url = "https://blobs.example.com"

[sweep]
enabled = false
"#,
        )
        .unwrap();

        assert_eq!(config.web.port, 9000);
        assert_eq!(config.web.jwt_secret, "secret");
        assert_eq!(config.storage.public_base_url, "https://blobs.example.com");
        assert!(!config.sweep.enabled);
        // Untouched sections keep their defaults
        assert_eq!(config.database.path, "data/filedock.db");
        assert_eq!(config.sweep.interval_secs, 86400);
    }

    #[test]
    fn test_parse_invalid() {
        let result = Config::parse("this is not toml [");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_requires_jwt_secret() {
        let config = Config::default();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.web.jwt_secret = "secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_override_jwt_secret() {
        let mut config = Config::default();
        std::env::set_var("FILEDOCK_JWT_SECRET", "from-env");
        config.apply_env_overrides();
        std::env::remove_var("FILEDOCK_JWT_SECRET");
        assert_eq!(config.web.jwt_secret, "from-env");
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("does/not/exist.toml");
        assert!(result.is_err());
    }
}
