//! Subcommand implementations and the plumbing they share.

pub mod option;
pub mod post;
pub mod seed;
pub mod terms;

use pressdb_core::config::ENV_LOG_LEVEL;
use pressdb_core::{init_logging, open_db_with, CoreConfig};
use rusqlite::Connection;
use serde::Serialize;
use std::path::PathBuf;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Level used when neither the flag nor the environment picks one; keeps
/// stderr quiet for scripted use.
const CLI_DEFAULT_LOG_LEVEL: &str = "warn";

/// Environment config with command-line flags laid on top, logging started.
pub fn load_config(
    db: Option<PathBuf>,
    log_level: Option<String>,
    log_dir: Option<PathBuf>,
) -> Result<CoreConfig, Box<dyn std::error::Error>> {
    let mut config = CoreConfig::from_env()?;
    if std::env::var_os(ENV_LOG_LEVEL).is_none() {
        config.log_level = CLI_DEFAULT_LOG_LEVEL.to_string();
    }
    if let Some(db) = db {
        config.db_path = db;
    }
    if let Some(level) = log_level {
        config.log_level = level;
    }
    if let Some(dir) = log_dir {
        config.log_dir = Some(dir);
    }

    init_logging(&config.logging_config())?;
    Ok(config)
}

pub fn open_connection(config: &CoreConfig) -> Result<Connection, Box<dyn std::error::Error>> {
    Ok(open_db_with(&config.db_path, &config.db_options())?)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
