//! Configuration module for deptstock.

use serde::Deserialize;
use std::path::Path;

use crate::{DeptStockError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/inventory.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Session configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Absolute session lifetime in seconds.
    #[serde(default = "default_session_duration")]
    pub duration_secs: u64,
    /// Idle timeout in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    /// Failed logins allowed per username before lockout.
    #[serde(default = "default_max_login_attempts")]
    pub max_login_attempts: u32,
    /// Lockout duration in seconds.
    #[serde(default = "default_lockout")]
    pub lockout_secs: u64,
    /// Mark the session cookie `Secure` (requires HTTPS in front).
    #[serde(default)]
    pub secure_cookie: bool,
}

fn default_session_duration() -> u64 {
    24 * 60 * 60
}

fn default_idle_timeout() -> u64 {
    60 * 60
}

fn default_max_login_attempts() -> u32 {
    5
}

fn default_lockout() -> u64 {
    5 * 60
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_session_duration(),
            idle_timeout_secs: default_idle_timeout(),
            max_login_attempts: default_max_login_attempts(),
            lockout_secs: default_lockout(),
            secure_cookie: false,
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
    "logs/deptstock.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(DeptStockError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| DeptStockError::Config(format!("parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `DEPTSTOCK_DB_PATH`: database file path
    /// - `DEPTSTOCK_PORT`: listening port
    /// - `DEPTSTOCK_LOG_LEVEL`: log level
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("DEPTSTOCK_DB_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }
        if let Ok(port) = std::env::var("DEPTSTOCK_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid DEPTSTOCK_PORT"),
            }
        }
        if let Ok(level) = std::env::var("DEPTSTOCK_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.database.path.trim().is_empty() {
            return Err(DeptStockError::Config(
                "database.path must not be empty".to_string(),
            ));
        }
        if self.session.max_login_attempts == 0 {
            return Err(DeptStockError::Config(
                "session.max_login_attempts must be at least 1".to_string(),
            ));
        }
        if self.session.idle_timeout_secs == 0 || self.session.duration_secs == 0 {
            return Err(DeptStockError::Config(
                "session timeouts must be greater than zero".to_string(),
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

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.database.path, "data/inventory.db");
        assert_eq!(config.session.duration_secs, 86400);
        assert_eq!(config.session.idle_timeout_secs, 3600);
        assert_eq!(config.session.max_login_attempts, 5);
        assert!(!config.session.secure_cookie);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/deptstock.log");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 8080

[database]
path = "/var/lib/deptstock/inventory.db"

[session]
duration_secs = 7200
idle_timeout_secs = 600
max_login_attempts = 3
lockout_secs = 60
secure_cookie = true

[logging]
level = "debug"
file = "/var/log/deptstock.log"
"#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.path, "/var/lib/deptstock/inventory.db");
        assert_eq!(config.session.duration_secs, 7200);
        assert_eq!(config.session.idle_timeout_secs, 600);
        assert_eq!(config.session.max_login_attempts, 3);
        assert_eq!(config.session.lockout_secs, 60);
        assert!(config.session.secure_cookie);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[server]
port = 9000
"#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.database.path, "data/inventory.db");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("[server]\nport = \"not a number\"");
        assert!(matches!(result, Err(DeptStockError::Config(_))));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("/nonexistent/deptstock.toml");
        assert!(matches!(result, Err(DeptStockError::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[database]\npath = \"stock.db\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.database.path, "stock.db");
    }

    #[test]
    fn test_validate_default() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_login_attempts() {
        let mut config = Config::default();
        config.session.max_login_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_db_path() {
        let mut config = Config::default();
        config.database.path = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
