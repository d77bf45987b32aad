//! Core data access for PressDB.
//! This crate owns the content schema and every invariant stored in it:
//! meta uniqueness, term counts and the term hierarchy.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, open_db_with, DbError, DbOptions};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig};
pub use model::meta::{MetaMap, MetaOwner};
pub use model::option::Autoload;
pub use model::post::{PostListQuery, PostSortField, SearchQuery};
pub use model::taxonomy::{ParentFilter, TermListQuery, TermOrderBy};
pub use model::{InvalidFilterValue, SortOrder};
pub use repo::meta_repo::{MetaRepository, SqliteMetaRepository};
pub use repo::option_repo::{OptionRepository, SqliteOptionRepository};
pub use repo::post_repo::{PostRepository, SqlitePostRepository};
pub use repo::taxonomy_repo::{SqliteTaxonomyRepository, TaxonomyRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{ErrorKind, RepoError, RepoResult};
pub use seed::{seed_defaults, SeedReport};
pub use service::content_service::{ContentService, ContentServiceError};
pub use service::taxonomy_service::{TaxonomyService, TaxonomyServiceError};

/// SQLite-backed content facade borrowing one connection.
pub type SqliteContentService<'conn> = ContentService<
    SqlitePostRepository<'conn>,
    SqliteMetaRepository<'conn>,
    SqliteTaxonomyRepository<'conn>,
    SqliteUserRepository<'conn>,
>;

/// Builds the content facade over a migrated connection.
pub fn content_service(conn: &rusqlite::Connection) -> RepoResult<SqliteContentService<'_>> {
    Ok(ContentService::new(
        SqlitePostRepository::try_new(conn)?,
        SqliteMetaRepository::try_new(conn)?,
        SqliteTaxonomyRepository::try_new(conn)?,
        SqliteUserRepository::try_new(conn)?,
    ))
}

/// Builds the taxonomy service over a migrated connection.
pub fn taxonomy_service(
    conn: &rusqlite::Connection,
) -> RepoResult<TaxonomyService<SqliteTaxonomyRepository<'_>>> {
    Ok(TaxonomyService::new(SqliteTaxonomyRepository::try_new(conn)?))
}

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{content_service, core_version, open_db_in_memory, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn content_service_builds_on_fresh_database() {
        let conn = open_db_in_memory().unwrap();
        assert!(content_service(&conn).is_ok());
    }
}
