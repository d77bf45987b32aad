//! Meta repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Store open-schema key/value attributes for posts and users.
//! - Offer single-key reads and bulk reads folded into a map.
//!
//! # Invariants
//! - `(owner_id, meta_key)` is unique per owner table.
//! - `set` is a single atomic upsert statement, never read-then-write.
//! - Reads never validate that the owner exists; a missing owner simply has
//!   no entries.
//! - Duplicate keys (only possible with externally written rows) fold
//!   last-write-wins by `meta_id`.

use crate::model::meta::{MetaEntry, MetaMap, MetaOwner};
use crate::repo::{ensure_schema_ready, RepoResult, WriteTx};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for per-owner meta entries.
pub trait MetaRepository {
    /// Returns the value stored under `key`, or `None`.
    fn get(&self, owner: MetaOwner, key: &str) -> RepoResult<Option<String>>;
    /// Returns every entry of `owner` as a key -> value map.
    fn get_all(&self, owner: MetaOwner) -> RepoResult<MetaMap>;
    /// Returns raw rows of `owner` in `meta_id` order.
    fn list_entries(&self, owner: MetaOwner) -> RepoResult<Vec<MetaEntry>>;
    /// Creates or overwrites the value stored under `key`.
    fn set(&self, owner: MetaOwner, key: &str, value: &str) -> RepoResult<()>;
    /// Removes `key`; returns whether a row existed.
    fn delete(&self, owner: MetaOwner, key: &str) -> RepoResult<bool>;
    /// Inserts entries whose key is not yet set, keeping existing values.
    /// Returns the number of rows created.
    fn add_many(&self, owner: MetaOwner, entries: &[(String, String)]) -> RepoResult<usize>;
}

/// SQLite-backed meta repository over `post_meta` and `user_meta`.
pub struct SqliteMetaRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMetaRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["post_meta", "user_meta"])?;
        Ok(Self { conn })
    }
}

impl MetaRepository for SqliteMetaRepository<'_> {
    fn get(&self, owner: MetaOwner, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                &format!(
                    "SELECT meta_value
                     FROM {table}
                     WHERE {column} = ?1
                       AND meta_key = ?2
                     ORDER BY meta_id DESC
                     LIMIT 1;",
                    table = owner.table(),
                    column = owner.owner_column(),
                ),
                params![owner.id(), key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn get_all(&self, owner: MetaOwner) -> RepoResult<MetaMap> {
        let entries = self.list_entries(owner)?;
        Ok(fold_meta_entries(
            entries.into_iter().map(|entry| (entry.key, entry.value)),
        ))
    }

    fn list_entries(&self, owner: MetaOwner) -> RepoResult<Vec<MetaEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT meta_id, meta_key, meta_value
             FROM {table}
             WHERE {column} = ?1
             ORDER BY meta_id ASC;",
            table = owner.table(),
            column = owner.owner_column(),
        ))?;
        let mut rows = stmt.query([owner.id()])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(MetaEntry {
                meta_id: row.get("meta_id")?,
                owner,
                key: row.get("meta_key")?,
                value: row.get("meta_value")?,
            });
        }
        Ok(entries)
    }

    fn set(&self, owner: MetaOwner, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO {table} ({column}, meta_key, meta_value)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT ({column}, meta_key)
                 DO UPDATE SET meta_value = excluded.meta_value;",
                table = owner.table(),
                column = owner.owner_column(),
            ),
            params![owner.id(), key, value],
        )?;
        debug!(
            "event=meta_set module=meta status=ok table={} owner_id={} key_len={} value_len={}",
            owner.table(),
            owner.id(),
            key.len(),
            value.len()
        );
        Ok(())
    }

    fn delete(&self, owner: MetaOwner, key: &str) -> RepoResult<bool> {
        let changed = self.conn.execute(
            &format!(
                "DELETE FROM {table} WHERE {column} = ?1 AND meta_key = ?2;",
                table = owner.table(),
                column = owner.owner_column(),
            ),
            params![owner.id(), key],
        )?;
        Ok(changed > 0)
    }

    fn add_many(&self, owner: MetaOwner, entries: &[(String, String)]) -> RepoResult<usize> {
        let tx = WriteTx::begin(self.conn)?;
        let mut created = 0;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {table} ({column}, meta_key, meta_value)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT ({column}, meta_key) DO NOTHING;",
                table = owner.table(),
                column = owner.owner_column(),
            ))?;
            for (key, value) in entries {
                created += stmt.execute(params![owner.id(), key, value])?;
            }
        }
        tx.commit()?;
        debug!(
            "event=meta_add_many module=meta status=ok table={} owner_id={} requested={} created={}",
            owner.table(),
            owner.id(),
            entries.len(),
            created
        );
        Ok(created)
    }
}

/// Folds `(key, value)` pairs into a map; a later pair overwrites an earlier
/// pair with the same key.
pub fn fold_meta_entries(entries: impl IntoIterator<Item = (String, String)>) -> MetaMap {
    let mut map = MetaMap::new();
    for (key, value) in entries {
        map.insert(key, value);
    }
    map
}
