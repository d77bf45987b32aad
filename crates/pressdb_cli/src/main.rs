//! PressDB CLI
//!
//! Command-line access to a PressDB site database. Every command prints JSON
//! on stdout.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "pressdb")]
#[command(about = "PressDB - content store queries", long_about = None)]
struct Cli {
    /// Database file (overrides PRESSDB_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log level (overrides PRESSDB_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute log directory (overrides PRESSDB_LOG_DIR); stderr when unset
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the default site (admin user, options, sample post)
    Seed,
    /// Show one published post by slug
    Post(commands::post::PostArgs),
    /// List posts with filters and pagination
    List(commands::post::ListArgs),
    /// Search published posts and pages
    Search(commands::post::SearchArgs),
    /// Read or write site options
    #[command(name = "option")]
    Options(commands::option::OptionArgs),
    /// List the terms of a taxonomy
    Terms(commands::terms::TermsArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = commands::load_config(cli.db, cli.log_level, cli.log_dir).and_then(|config| {
        let conn = commands::open_connection(&config)?;
        match cli.command {
            Commands::Seed => commands::seed::execute(&conn),
            Commands::Post(args) => commands::post::execute_get(&conn, args),
            Commands::List(args) => commands::post::execute_list(&conn, args),
            Commands::Search(args) => commands::post::execute_search(&conn, args),
            Commands::Options(args) => commands::option::execute(&conn, args),
            Commands::Terms(args) => commands::terms::execute(&conn, args),
        }
    });

    if let Err(e) = result {
        log::error!("event=cli_command module=cli status=error");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
