//! Configuration module for Filebox.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::{FileboxError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins (empty allows any origin).
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Maximum request body size in megabytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size_mb: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_size() -> u64 {
    16
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            max_body_size_mb: default_max_body_size(),
        }
    }
}

impl ServerConfig {
    /// Maximum request body size in bytes.
    pub fn max_body_size_bytes(&self) -> usize {
        (self.max_body_size_mb as usize).saturating_mul(1024 * 1024)
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
    "data/filebox.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Blob storage configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilesConfig {
    /// Directory uploaded blobs are written into.
    ///
    /// When unset, the system temporary directory is used.
    #[serde(default)]
    pub storage_path: Option<String>,
}

impl FilesConfig {
    /// Resolve the directory blobs are written into.
    pub fn resolved_storage_path(&self) -> PathBuf {
        match self.storage_path {
            Some(ref path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => std::env::temp_dir(),
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
    "logs/filebox.log".to_string()
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
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Blob storage configuration.
    #[serde(default)]
    pub files: FilesConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            FileboxError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FileboxError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `FILEBOX_DATABASE_PATH`: Override the database file path
    /// - `FILEBOX_STORAGE_PATH`: Override the blob storage directory
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("FILEBOX_DATABASE_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }

        if let Ok(path) = std::env::var("FILEBOX_STORAGE_PATH") {
            if !path.is_empty() {
                self.files.storage_path = Some(path);
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - The database path is empty
    /// - The request body limit is zero
    pub fn validate(&self) -> Result<()> {
        if self.database.path.trim().is_empty() {
            return Err(FileboxError::Config(
                "database.path must not be empty".to_string(),
            ));
        }
        if self.server.max_body_size_mb == 0 {
            return Err(FileboxError::Config(
                "server.max_body_size_mb must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
