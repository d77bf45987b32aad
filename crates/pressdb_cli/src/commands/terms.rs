//! Term listing command
//!
//! Usage: pressdb terms <TAXONOMY> [--all] [--orderby name|count|id] [--order asc|desc] [--roots]

use super::{print_json, CommandResult};
use pressdb_core::{taxonomy_service, ParentFilter, TermListQuery};
use rusqlite::Connection;

#[derive(Debug, clap::Args)]
pub struct TermsArgs {
    pub taxonomy: String,

    /// Include terms with no members
    #[arg(long)]
    pub all: bool,

    #[arg(long, default_value = "name")]
    pub orderby: String,

    #[arg(long, default_value = "asc")]
    pub order: String,

    /// Only top-level terms
    #[arg(long, conflicts_with = "parent")]
    pub roots: bool,

    /// Only direct children of this term_taxonomy id
    #[arg(long)]
    pub parent: Option<i64>,
}

pub fn execute(conn: &Connection, args: TermsArgs) -> CommandResult {
    let parent = match (args.roots, args.parent) {
        (true, _) => ParentFilter::Root,
        (false, Some(id)) => ParentFilter::ChildrenOf(id),
        (false, None) => ParentFilter::Any,
    };
    let query = TermListQuery {
        hide_empty: !args.all,
        parent,
        order_by: args.orderby.parse()?,
        order: args.order.parse()?,
    };

    let service = taxonomy_service(conn)?;
    print_json(&service.list_terms(&args.taxonomy, &query)?)
}
