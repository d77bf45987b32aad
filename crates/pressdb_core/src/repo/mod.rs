//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQL details from service orchestration.
//! - Classify store failures into the error kinds callers act on.
//!
//! # Invariants
//! - Single-entity lookups return `Ok(None)` instead of a not-found error.
//! - Multi-statement mutations run inside one `IMMEDIATE` transaction, or a
//!   savepoint when the caller already holds one.
//! - Repositories refuse connections whose schema is not fully migrated.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::InvalidFilterValue;
use log::warn;
use rusqlite::{Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::Deref;

pub mod meta_repo;
pub mod option_repo;
pub mod post_repo;
pub mod taxonomy_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Caller-facing failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A mutation targeted a row that does not exist.
    NotFound,
    /// Unique-key or referential-integrity violation reported by the store.
    ConstraintViolation,
    /// Connection, lock or timeout failure; retryable by the caller.
    StoreUnavailable,
    /// Caller input rejected before any query was issued.
    InvalidFilter,
    /// Anything else (corrupt rows, unexpected SQL errors).
    Internal,
}

/// Repository error shared by every content table.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound {
        entity: &'static str,
        id: i64,
    },
    ConstraintViolation(String),
    StoreUnavailable(String),
    InvalidFilter(InvalidFilterValue),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl RepoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::ConstraintViolation(_) => ErrorKind::ConstraintViolation,
            Self::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            Self::InvalidFilter(_) => ErrorKind::InvalidFilter,
            Self::Db(_)
            | Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_) => ErrorKind::Internal,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::ConstraintViolation(message) => write!(f, "constraint violation: {message}"),
            Self::StoreUnavailable(message) => write!(f, "store unavailable: {message}"),
            Self::InvalidFilter(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidFilter(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => err.into(),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match value.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => Self::ConstraintViolation(value.to_string()),
            Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked | ErrorCode::CannotOpen) => {
                Self::StoreUnavailable(value.to_string())
            }
            _ => Self::Db(DbError::Sqlite(value)),
        }
    }
}

impl From<InvalidFilterValue> for RepoError {
    fn from(value: InvalidFilterValue) -> Self {
        Self::InvalidFilter(value)
    }
}

/// Checks that `conn` is migrated to the latest schema and has `tables`.
pub(crate) fn ensure_schema_ready(conn: &Connection, tables: &[&'static str]) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in tables {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

/// Builds a `LIKE … ESCAPE '\'` pattern matching `needle` as a literal substring.
pub(crate) fn like_contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

const WRITE_SAVEPOINT: &str = "pressdb_write";

/// Write scope for multi-statement mutations.
///
/// Opens `BEGIN IMMEDIATE` on an idle connection and a savepoint when the
/// caller already holds a transaction, so repository writes compose inside
/// a larger unit of work. Rolls back on drop unless committed.
pub(crate) struct WriteTx<'conn> {
    conn: &'conn Connection,
    nested: bool,
    finished: bool,
}

impl<'conn> WriteTx<'conn> {
    pub(crate) fn begin(conn: &'conn Connection) -> RepoResult<Self> {
        let nested = !conn.is_autocommit();
        if nested {
            conn.execute_batch(&format!("SAVEPOINT {WRITE_SAVEPOINT};"))?;
        } else {
            conn.execute_batch("BEGIN IMMEDIATE;")?;
        }
        Ok(Self {
            conn,
            nested,
            finished: false,
        })
    }

    pub(crate) fn commit(mut self) -> RepoResult<()> {
        self.finished = true;
        if self.nested {
            self.conn.execute_batch(&format!("RELEASE {WRITE_SAVEPOINT};"))?;
        } else {
            self.conn.execute_batch("COMMIT;")?;
        }
        Ok(())
    }
}

impl Deref for WriteTx<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn
    }
}

impl Drop for WriteTx<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let rollback = if self.nested {
            format!("ROLLBACK TO {WRITE_SAVEPOINT}; RELEASE {WRITE_SAVEPOINT};")
        } else {
            "ROLLBACK;".to_string()
        };
        if let Err(err) = self.conn.execute_batch(&rollback) {
            warn!("event=write_rollback module=repo status=error error={err}");
        }
    }
}
