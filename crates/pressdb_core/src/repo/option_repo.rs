//! Site option repository.
//!
//! # Invariants
//! - One row per option name; writes are single-statement upserts.
//! - `autoload` is stored as `yes`/`no` and never interpreted here.

use crate::model::option::{Autoload, SiteOption};
use crate::repo::{ensure_schema_ready, RepoError, RepoResult, WriteTx};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;

pub trait OptionRepository {
    /// Returns the stored value, or `default` when the option is unset or
    /// stored empty.
    fn get_option(&self, name: &str, default: &str) -> RepoResult<String>;
    /// Returns the full option row.
    fn find_option(&self, name: &str) -> RepoResult<Option<SiteOption>>;
    /// Creates or overwrites value and autoload hint.
    fn set_option(&self, name: &str, value: &str, autoload: Autoload) -> RepoResult<()>;
    /// Inserts options that do not exist yet. Returns the number created.
    fn add_options(&self, options: &[SiteOption]) -> RepoResult<usize>;
    /// Removes an option; returns whether it existed.
    fn delete_option(&self, name: &str) -> RepoResult<bool>;
    /// Returns every option flagged `autoload = yes`.
    fn load_autoloaded(&self) -> RepoResult<BTreeMap<String, String>>;
}

pub struct SqliteOptionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOptionRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["options"])?;
        Ok(Self { conn })
    }
}

impl OptionRepository for SqliteOptionRepository<'_> {
    fn get_option(&self, name: &str, default: &str) -> RepoResult<String> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT option_value FROM options WHERE option_name = ?1;",
                [name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| default.to_string()))
    }

    fn find_option(&self, name: &str) -> RepoResult<Option<SiteOption>> {
        let row: Option<(String, String, String)> = self
            .conn
            .query_row(
                "SELECT option_name, option_value, autoload
                 FROM options
                 WHERE option_name = ?1;",
                [name],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        row.map(|(name, value, autoload)| -> RepoResult<SiteOption> {
            let autoload = autoload.parse::<Autoload>().map_err(|_| {
                RepoError::InvalidData(format!("invalid autoload `{autoload}` in options.autoload"))
            })?;
            Ok(SiteOption {
                name,
                value,
                autoload,
            })
        })
        .transpose()
    }

    fn set_option(&self, name: &str, value: &str, autoload: Autoload) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO options (option_name, option_value, autoload)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (option_name)
             DO UPDATE SET option_value = excluded.option_value,
                           autoload = excluded.autoload;",
            params![name, value, autoload.as_str()],
        )?;
        debug!(
            "event=option_set module=option status=ok name={} autoload={}",
            name,
            autoload.as_str()
        );
        Ok(())
    }

    fn add_options(&self, options: &[SiteOption]) -> RepoResult<usize> {
        let tx = WriteTx::begin(self.conn)?;
        let mut created = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO options (option_name, option_value, autoload)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT (option_name) DO NOTHING;",
            )?;
            for option in options {
                created += stmt.execute(params![
                    option.name,
                    option.value,
                    option.autoload.as_str()
                ])?;
            }
        }
        tx.commit()?;
        Ok(created)
    }

    fn delete_option(&self, name: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM options WHERE option_name = ?1;", [name])?;
        Ok(changed > 0)
    }

    fn load_autoloaded(&self) -> RepoResult<BTreeMap<String, String>> {
        let mut stmt = self.conn.prepare(
            "SELECT option_name, option_value
             FROM options
             WHERE autoload = 'yes'
             ORDER BY option_id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut options = BTreeMap::new();
        while let Some(row) = rows.next()? {
            options.insert(row.get(0)?, row.get(1)?);
        }
        Ok(options)
    }
}
