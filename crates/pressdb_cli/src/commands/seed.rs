//! Seed command
//!
//! Usage: pressdb seed

use super::{print_json, CommandResult};
use pressdb_core::seed_defaults;
use rusqlite::Connection;

pub fn execute(conn: &Connection) -> CommandResult {
    let report = seed_defaults(conn)?;
    print_json(&report)
}
