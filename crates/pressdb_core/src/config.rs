//! Process-level configuration.
//!
//! Values come from defaults, then `PRESSDB_*` environment variables, then
//! whatever the embedding binary overlays on top.

use crate::db::DbOptions;
use crate::logging::{default_log_level, LoggingConfig};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "PRESSDB_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "PRESSDB_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PRESSDB_LOG_DIR";
pub const ENV_BUSY_TIMEOUT_MS: &str = "PRESSDB_BUSY_TIMEOUT_MS";

const DEFAULT_DB_PATH: &str = "pressdb.sqlite3";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Configuration value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid value `{}` for `{}`", self.value, self.key)
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub busy_timeout_ms: u64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_level: default_log_level().to_string(),
            log_dir: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl CoreConfig {
    /// Defaults overlaid with the `PRESSDB_*` environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`. Blank values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(timeout) = read(ENV_BUSY_TIMEOUT_MS) {
            config.busy_timeout_ms = timeout.trim().parse().map_err(|_| ConfigError {
                key: ENV_BUSY_TIMEOUT_MS,
                value: timeout.clone(),
            })?;
        }
        Ok(config)
    }

    pub fn db_options(&self) -> DbOptions {
        DbOptions {
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
        }
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            log_dir: self.log_dir.clone(),
        }
    }
}
