//! Repository configuration file support.
//!
//! This module provides utilities for reading repository configuration from
//! TOML configuration files, plus the SQLite connection settings.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::RepositoryError;

/// Name of the configuration file looked up by [`RepositoryConfig::load`].
pub const CONFIG_FILE_NAME: &str = "blog.toml";

/// Configuration for opening the SQLite store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteConfig {
    /// Path of the database file; created if missing
    pub database_path: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Connection checkout timeout in seconds
    pub connection_timeout_sec: u64,
    /// SQLite busy timeout in milliseconds
    pub busy_timeout_ms: u64,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            max_pool_size: default_max_connections(),
            connection_timeout_sec: default_connect_timeout(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl SqliteConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `DATABASE_PATH`: SQLite file path (default: `blog.db`)
    /// - `SQLITE_POOL_MAX`: Maximum pool size (default: 8)
    /// - `SQLITE_CONN_TIMEOUT_SEC`: Connection checkout timeout in seconds (default: 30)
    /// - `SQLITE_BUSY_TIMEOUT_MS`: How long a writer waits on a locked database (default: 5000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let database_path = std::env::var("DATABASE_PATH").unwrap_or(defaults.database_path);

        let max_pool_size = env_parsed("SQLITE_POOL_MAX").unwrap_or(defaults.max_pool_size);
        let connection_timeout_sec =
            env_parsed("SQLITE_CONN_TIMEOUT_SEC").unwrap_or(defaults.connection_timeout_sec);
        let busy_timeout_ms =
            env_parsed("SQLITE_BUSY_TIMEOUT_MS").unwrap_or(defaults.busy_timeout_ms);

        Self {
            database_path,
            max_pool_size,
            connection_timeout_sec,
            busy_timeout_ms,
        }
    }

    /// Create a new configuration for a database file.
    pub fn with_path(database_path: impl Into<String>) -> Self {
        Self {
            database_path: database_path.into(),
            ..Default::default()
        }
    }
}

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub sqlite: SqliteSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// SQLite connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteSettings {
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            repository: RepositorySettings {
                repo_type: "sqlite".to_string(),
            },
            sqlite: SqliteSettings::default(),
        }
    }
}

impl Default for SqliteSettings {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            max_connections: default_max_connections(),
            connect_timeout: default_connect_timeout(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

fn env_parsed<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn default_database_path() -> String {
    "blog.db".to_string()
}

fn default_max_connections() -> u32 {
    8
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if successful
    /// * `Err(RepositoryError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse repository configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, RepositoryError> {
        toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// First existing `blog.toml` among the standard locations.
    pub fn find_default_location() -> Option<PathBuf> {
        [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("backend").join(CONFIG_FILE_NAME),
            PathBuf::from("..").join(CONFIG_FILE_NAME),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    /// Load the configuration used at startup.
    ///
    /// Reads `blog.toml` from the standard locations when one exists, falls
    /// back to the defaults otherwise, then applies environment overrides.
    /// A file that exists but does not parse is an error.
    pub fn load() -> Result<Self, RepositoryError> {
        let config = match Self::find_default_location() {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    /// Apply environment variables on top of this configuration.
    ///
    /// `REPOSITORY_TYPE` and `DATABASE_PATH` replace the file values as-is;
    /// `SQLITE_POOL_MAX`, `SQLITE_CONN_TIMEOUT_SEC` and `SQLITE_BUSY_TIMEOUT_MS`
    /// only when they parse.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(repo_type) = std::env::var("REPOSITORY_TYPE") {
            self.repository.repo_type = repo_type;
        }
        if let Ok(path) = std::env::var("DATABASE_PATH") {
            self.sqlite.database_path = path;
        }
        if let Some(max) = env_parsed::<u32>("SQLITE_POOL_MAX") {
            self.sqlite.max_connections = max;
        }
        if let Some(secs) = env_parsed::<u64>("SQLITE_CONN_TIMEOUT_SEC") {
            self.sqlite.connect_timeout = secs;
        }
        if let Some(ms) = env_parsed::<u64>("SQLITE_BUSY_TIMEOUT_MS") {
            self.sqlite.busy_timeout_ms = ms;
        }
        self
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// SQLite settings as a [`SqliteConfig`].
    pub fn to_sqlite_config(&self) -> SqliteConfig {
        SqliteConfig {
            database_path: self.sqlite.database_path.clone(),
            max_pool_size: self.sqlite.max_connections,
            connection_timeout_sec: self.sqlite.connect_timeout,
            busy_timeout_ms: self.sqlite.busy_timeout_ms,
        }
    }
}
