//! Runtime configuration loaded from environment variables.
//!
//! # Invariants
//! - Empty variables are treated as unset.
//! - An absent database path selects an in-memory store.
//! - An absent log directory leaves logging uninitialized.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "PARC_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "PARC_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "PARC_LOG_DIR";

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, message } => write!(f, "invalid `{key}`: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Process configuration for the inventory CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite database file. `None` opens an in-memory database.
    pub db_path: Option<PathBuf>,
    /// Normalized log level.
    pub log_level: &'static str,
    /// Absolute log directory. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, one call per variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let log_level = match read(LOG_LEVEL_ENV) {
            Some(value) => normalize_level(&value).map_err(|err| ConfigError::InvalidValue {
                key: LOG_LEVEL_ENV,
                message: err.to_string(),
            })?,
            None => default_log_level(),
        };

        let log_dir = read(LOG_DIR_ENV).map(PathBuf::from);
        if let Some(dir) = &log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    key: LOG_DIR_ENV,
                    message: format!("path must be absolute, got `{}`", dir.display()),
                });
            }
        }

        Ok(Self {
            db_path: read(DB_PATH_ENV).map(PathBuf::from),
            log_level,
            log_dir,
        })
    }
}
