//! Option commands
//!
//! Usage:
//!   pressdb option get <NAME> [--default <VALUE>]
//!   pressdb option set <NAME> <VALUE> [--autoload yes|no]
//!   pressdb option autoloaded

use super::{print_json, CommandResult};
use clap::{Args, Subcommand};
use pressdb_core::{Autoload, OptionRepository, SqliteOptionRepository};
use rusqlite::Connection;

#[derive(Debug, Args)]
pub struct OptionArgs {
    #[command(subcommand)]
    pub command: OptionCommand,
}

#[derive(Debug, Subcommand)]
pub enum OptionCommand {
    /// Print one option value
    Get {
        name: String,
        /// Printed when the option is unset
        #[arg(long, default_value = "")]
        default: String,
    },
    /// Create or overwrite one option
    Set {
        name: String,
        value: String,
        #[arg(long, default_value = "yes")]
        autoload: String,
    },
    /// Print every autoloaded option
    Autoloaded,
}

pub fn execute(conn: &Connection, args: OptionArgs) -> CommandResult {
    let repo = SqliteOptionRepository::try_new(conn)?;
    match args.command {
        OptionCommand::Get { name, default } => {
            print_json(&repo.get_option(&name, &default)?)
        }
        OptionCommand::Set {
            name,
            value,
            autoload,
        } => {
            let autoload: Autoload = autoload.parse()?;
            repo.set_option(&name, &value, autoload)?;
            print_json(&repo.find_option(&name)?)
        }
        OptionCommand::Autoloaded => print_json(&repo.load_autoloaded()?),
    }
}
