//! Post query commands
//!
//! Usage:
//!   pressdb post <SLUG> [--type <TYPE>]
//!   pressdb list [--type] [--status] [--limit] [--offset] [--sort] [--order] [--author] [--search]
//!   pressdb search <TEXT> [--type <TYPE>]... [--limit <N>]

use super::{print_json, CommandResult};
use pressdb_core::model::post::{POST_TYPE_POST, STATUS_PUBLISH};
use pressdb_core::service::content_service::parse_post_sort;
use pressdb_core::{content_service, PostListQuery, SearchQuery};
use rusqlite::Connection;

#[derive(Debug, clap::Args)]
pub struct PostArgs {
    /// Post slug
    pub slug: String,

    /// Post type
    #[arg(long = "type", default_value = POST_TYPE_POST)]
    pub post_type: String,
}

#[derive(Debug, clap::Args)]
pub struct ListArgs {
    #[arg(long = "type", default_value = POST_TYPE_POST)]
    pub post_type: String,

    #[arg(long, default_value = STATUS_PUBLISH)]
    pub status: String,

    #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
    pub limit: i64,

    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub offset: i64,

    /// date | title | modified
    #[arg(long, default_value = "date")]
    pub sort: String,

    /// asc | desc
    #[arg(long, default_value = "desc")]
    pub order: String,

    /// Only posts by this user id
    #[arg(long)]
    pub author: Option<i64>,

    /// Substring matched against title or content
    #[arg(long)]
    pub search: Option<String>,

    /// Leave meta out of each item
    #[arg(long)]
    pub no_meta: bool,
}

#[derive(Debug, clap::Args)]
pub struct SearchArgs {
    pub text: String,

    /// Post types to search (repeatable); post and page when omitted
    #[arg(long = "type")]
    pub post_types: Vec<String>,

    #[arg(long, default_value_t = 20)]
    pub limit: i64,
}

pub fn execute_get(conn: &Connection, args: PostArgs) -> CommandResult {
    let service = content_service(conn)?;
    match service.get_post_by_slug(&args.slug, &args.post_type)? {
        Some(detail) => print_json(&detail),
        None => Err(format!("no published {} with slug `{}`", args.post_type, args.slug).into()),
    }
}

pub fn execute_list(conn: &Connection, args: ListArgs) -> CommandResult {
    let (sort_field, sort_order) = parse_post_sort(&args.sort, &args.order)?;
    let query = PostListQuery {
        post_type: args.post_type,
        status: args.status,
        limit: args.limit,
        offset: args.offset,
        sort_field,
        sort_order,
        author_id: args.author,
        search: args.search,
        include_meta: !args.no_meta,
    };

    let service = content_service(conn)?;
    print_json(&service.list_posts(&query)?)
}

pub fn execute_search(conn: &Connection, args: SearchArgs) -> CommandResult {
    let mut query = SearchQuery::new(args.text);
    if !args.post_types.is_empty() {
        query.post_types = args.post_types;
    }
    query.limit = args.limit;

    let service = content_service(conn)?;
    print_json(&service.search(&query)?)
}
