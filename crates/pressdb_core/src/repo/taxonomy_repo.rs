//! Taxonomy graph repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist terms, taxonomy-scoped terms and object relationships.
//! - Keep `term_taxonomy.count` equal to the number of relationship rows.
//!
//! # Invariants
//! - Every relationship insert/delete and its counter adjustment share one
//!   `IMMEDIATE` transaction, so concurrent writers cannot lose updates.
//! - `attach` is idempotent: a duplicate pair changes nothing.
//! - `detach` of a missing pair is a no-op; counts never drop below zero.
//! - Parent writes check, inside the write transaction, that the parent
//!   exists in the same taxonomy and is not a descendant.

use crate::model::taxonomy::{
    ParentFilter, Term, TermId, TermListQuery, TermRelationship, TermTaxonomy, TermTaxonomyId,
};
use crate::model::InvalidFilterValue;
use crate::repo::{ensure_schema_ready, RepoError, RepoResult, WriteTx};
use log::{debug, info, warn};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::collections::BTreeSet;

const TERM_TAXONOMY_SELECT_SQL: &str = "SELECT
    tt.term_taxonomy_id AS term_taxonomy_id,
    tt.taxonomy AS taxonomy,
    tt.description AS description,
    tt.parent AS parent,
    tt.count AS count,
    t.term_id AS term_id,
    t.name AS name,
    t.slug AS slug,
    t.term_group AS term_group
FROM term_taxonomy tt
INNER JOIN terms t ON t.term_id = tt.term_id";

/// Repository interface for the taxonomy graph.
pub trait TaxonomyRepository {
    /// Creates one term. Fails with a constraint violation on a taken slug.
    fn create_term(&self, name: &str, slug: &str) -> RepoResult<Term>;
    fn find_term_by_slug(&self, slug: &str) -> RepoResult<Option<Term>>;
    /// Scopes `term_id` into `taxonomy` with a zero count.
    fn create_term_taxonomy(
        &self,
        term_id: TermId,
        taxonomy: &str,
        description: &str,
        parent: Option<TermTaxonomyId>,
    ) -> RepoResult<TermTaxonomy>;
    fn get_term_taxonomy(&self, id: TermTaxonomyId) -> RepoResult<Option<TermTaxonomy>>;
    fn find_term_taxonomy(&self, slug: &str, taxonomy: &str) -> RepoResult<Option<TermTaxonomy>>;
    /// Lists term-taxonomy rows of one taxonomy with their terms.
    fn list_terms_by_taxonomy(
        &self,
        taxonomy: &str,
        query: &TermListQuery,
    ) -> RepoResult<Vec<TermTaxonomy>>;
    /// Lists memberships of `object_id`, optionally restricted to one taxonomy.
    fn list_relationships_for_object(
        &self,
        object_id: i64,
        taxonomy: Option<&str>,
    ) -> RepoResult<Vec<TermRelationship>>;
    /// Links `object_id` to a term-taxonomy. Returns `true` when a new
    /// relationship was created and the count incremented.
    fn attach(
        &self,
        object_id: i64,
        term_taxonomy_id: TermTaxonomyId,
        term_order: i64,
    ) -> RepoResult<bool>;
    /// Unlinks `object_id`. Returns `true` when a relationship was removed
    /// and the count decremented.
    fn detach(&self, object_id: i64, term_taxonomy_id: TermTaxonomyId) -> RepoResult<bool>;
    /// Replaces the memberships of `object_id` within `taxonomy`.
    fn set_object_terms(
        &self,
        object_id: i64,
        taxonomy: &str,
        term_taxonomy_ids: &[TermTaxonomyId],
    ) -> RepoResult<()>;
    /// Removes every membership of `object_id`, across all taxonomies.
    fn remove_object(&self, object_id: i64) -> RepoResult<usize>;
    /// Rewrites the parent link after an in-transaction cycle check.
    fn update_parent(
        &self,
        term_taxonomy_id: TermTaxonomyId,
        parent: Option<TermTaxonomyId>,
    ) -> RepoResult<()>;
    /// Recomputes the stored count from relationship rows.
    fn recount(&self, term_taxonomy_id: TermTaxonomyId) -> RepoResult<i64>;
    /// Counts relationship rows referencing the term-taxonomy.
    fn relationship_count(&self, term_taxonomy_id: TermTaxonomyId) -> RepoResult<i64>;
    /// Deletes the term-taxonomy, lifting its children to its parent.
    fn delete_term_taxonomy(&self, term_taxonomy_id: TermTaxonomyId) -> RepoResult<bool>;
}

/// SQLite-backed taxonomy repository.
pub struct SqliteTaxonomyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaxonomyRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["terms", "term_taxonomy", "term_relationships"])?;
        Ok(Self { conn })
    }
}

impl TaxonomyRepository for SqliteTaxonomyRepository<'_> {
    fn create_term(&self, name: &str, slug: &str) -> RepoResult<Term> {
        self.conn.execute(
            "INSERT INTO terms (name, slug, term_group) VALUES (?1, ?2, 0);",
            params![name, slug],
        )?;
        Ok(Term {
            term_id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            slug: slug.to_string(),
            term_group: 0,
        })
    }

    fn find_term_by_slug(&self, slug: &str) -> RepoResult<Option<Term>> {
        let term = self
            .conn
            .query_row(
                "SELECT term_id, name, slug, term_group FROM terms WHERE slug = ?1;",
                [slug],
                |row| {
                    Ok(Term {
                        term_id: row.get(0)?,
                        name: row.get(1)?,
                        slug: row.get(2)?,
                        term_group: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(term)
    }

    fn create_term_taxonomy(
        &self,
        term_id: TermId,
        taxonomy: &str,
        description: &str,
        parent: Option<TermTaxonomyId>,
    ) -> RepoResult<TermTaxonomy> {
        let tx = WriteTx::begin(self.conn)?;
        if let Some(parent) = parent {
            ensure_parent_taxonomy(&tx, parent, taxonomy)?;
        }
        tx.execute(
            "INSERT INTO term_taxonomy (term_id, taxonomy, description, parent, count)
             VALUES (?1, ?2, ?3, ?4, 0);",
            params![term_id, taxonomy, description, parent],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        info!(
            "event=term_taxonomy_create module=taxonomy status=ok term_taxonomy_id={} taxonomy={}",
            id, taxonomy
        );
        self.get_term_taxonomy(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("term_taxonomy {id} missing in read-back"))
        })
    }

    fn get_term_taxonomy(&self, id: TermTaxonomyId) -> RepoResult<Option<TermTaxonomy>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TERM_TAXONOMY_SELECT_SQL} WHERE tt.term_taxonomy_id = ?1;"
        ))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_term_taxonomy_row(row)?));
        }
        Ok(None)
    }

    fn find_term_taxonomy(&self, slug: &str, taxonomy: &str) -> RepoResult<Option<TermTaxonomy>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TERM_TAXONOMY_SELECT_SQL} WHERE t.slug = ?1 AND tt.taxonomy = ?2;"
        ))?;
        let mut rows = stmt.query(params![slug, taxonomy])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_term_taxonomy_row(row)?));
        }
        Ok(None)
    }

    fn list_terms_by_taxonomy(
        &self,
        taxonomy: &str,
        query: &TermListQuery,
    ) -> RepoResult<Vec<TermTaxonomy>> {
        let mut sql = format!("{TERM_TAXONOMY_SELECT_SQL} WHERE tt.taxonomy = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(taxonomy.to_string())];

        if query.hide_empty {
            sql.push_str(" AND tt.count > 0");
        }

        match query.parent {
            ParentFilter::Any => {}
            ParentFilter::Root => sql.push_str(" AND tt.parent IS NULL"),
            ParentFilter::ChildrenOf(parent) => {
                sql.push_str(" AND tt.parent = ?");
                bind_values.push(Value::Integer(parent));
            }
        }

        sql.push_str(&format!(
            " ORDER BY {} {}, tt.term_taxonomy_id ASC",
            query.order_by.column(),
            query.order.as_sql()
        ));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_term_taxonomy_row(row)?);
        }
        Ok(items)
    }

    fn list_relationships_for_object(
        &self,
        object_id: i64,
        taxonomy: Option<&str>,
    ) -> RepoResult<Vec<TermRelationship>> {
        let mut sql = String::from(
            "SELECT
                tr.object_id AS object_id,
                tr.term_order AS term_order,
                tt.term_taxonomy_id AS term_taxonomy_id,
                tt.taxonomy AS taxonomy,
                tt.description AS description,
                tt.parent AS parent,
                tt.count AS count,
                t.term_id AS term_id,
                t.name AS name,
                t.slug AS slug,
                t.term_group AS term_group
             FROM term_relationships tr
             INNER JOIN term_taxonomy tt ON tt.term_taxonomy_id = tr.term_taxonomy_id
             INNER JOIN terms t ON t.term_id = tt.term_id
             WHERE tr.object_id = ?",
        );
        let mut bind_values: Vec<Value> = vec![Value::Integer(object_id)];
        if let Some(taxonomy) = taxonomy {
            sql.push_str(" AND tt.taxonomy = ?");
            bind_values.push(Value::Text(taxonomy.to_string()));
        }
        sql.push_str(" ORDER BY tt.taxonomy ASC, tr.term_order ASC, tr.term_taxonomy_id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(TermRelationship {
                object_id: row.get("object_id")?,
                term_order: row.get("term_order")?,
                term_taxonomy: parse_term_taxonomy_row(row)?,
            });
        }
        Ok(items)
    }

    fn attach(
        &self,
        object_id: i64,
        term_taxonomy_id: TermTaxonomyId,
        term_order: i64,
    ) -> RepoResult<bool> {
        let tx = WriteTx::begin(self.conn)?;
        ensure_term_taxonomy_exists(&tx, term_taxonomy_id)?;
        let created = insert_relationship(&tx, object_id, term_taxonomy_id, term_order)?;
        tx.commit()?;

        debug!(
            "event=term_attach module=taxonomy status=ok object_id={} term_taxonomy_id={} created={}",
            object_id, term_taxonomy_id, created
        );
        Ok(created)
    }

    fn detach(&self, object_id: i64, term_taxonomy_id: TermTaxonomyId) -> RepoResult<bool> {
        let tx = WriteTx::begin(self.conn)?;
        let removed = delete_relationship(&tx, object_id, term_taxonomy_id)?;
        tx.commit()?;

        debug!(
            "event=term_detach module=taxonomy status=ok object_id={} term_taxonomy_id={} removed={}",
            object_id, term_taxonomy_id, removed
        );
        Ok(removed)
    }

    fn set_object_terms(
        &self,
        object_id: i64,
        taxonomy: &str,
        term_taxonomy_ids: &[TermTaxonomyId],
    ) -> RepoResult<()> {
        let tx = WriteTx::begin(self.conn)?;

        let mut desired = Vec::new();
        let mut seen = BTreeSet::new();
        for id in term_taxonomy_ids {
            if !seen.insert(*id) {
                continue;
            }
            let actual: Option<String> = tx
                .query_row(
                    "SELECT taxonomy FROM term_taxonomy WHERE term_taxonomy_id = ?1;",
                    [id],
                    |row| row.get(0),
                )
                .optional()?;
            match actual {
                None => {
                    return Err(RepoError::NotFound {
                        entity: "term_taxonomy",
                        id: *id,
                    })
                }
                Some(actual) if actual != taxonomy => {
                    return Err(RepoError::InvalidFilter(InvalidFilterValue::new(
                        "term_taxonomy_id",
                        format!("{id} belongs to `{actual}`, not `{taxonomy}`"),
                    )));
                }
                Some(_) => desired.push(*id),
            }
        }

        let current = list_object_term_ids(&tx, object_id, taxonomy)?;
        let mut removed = 0;
        for id in current.iter().filter(|id| !seen.contains(*id)) {
            if delete_relationship(&tx, object_id, *id)? {
                removed += 1;
            }
        }

        let mut added = 0;
        for (index, id) in desired.iter().enumerate() {
            let order = index as i64;
            if insert_relationship(&tx, object_id, *id, order)? {
                added += 1;
            } else {
                tx.execute(
                    "UPDATE term_relationships
                     SET term_order = ?3
                     WHERE object_id = ?1 AND term_taxonomy_id = ?2;",
                    params![object_id, id, order],
                )?;
            }
        }

        tx.commit()?;
        info!(
            "event=object_terms_set module=taxonomy status=ok object_id={} taxonomy={} added={} removed={}",
            object_id, taxonomy, added, removed
        );
        Ok(())
    }

    fn remove_object(&self, object_id: i64) -> RepoResult<usize> {
        let tx = WriteTx::begin(self.conn)?;
        let removed = remove_object_relationships(&tx, object_id)?;
        tx.commit()?;
        Ok(removed)
    }

    fn update_parent(
        &self,
        term_taxonomy_id: TermTaxonomyId,
        parent: Option<TermTaxonomyId>,
    ) -> RepoResult<()> {
        let tx = WriteTx::begin(self.conn)?;
        let taxonomy: String = tx
            .query_row(
                "SELECT taxonomy FROM term_taxonomy WHERE term_taxonomy_id = ?1;",
                [term_taxonomy_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(RepoError::NotFound {
                entity: "term_taxonomy",
                id: term_taxonomy_id,
            })?;
        if let Some(parent) = parent {
            ensure_parent_taxonomy(&tx, parent, &taxonomy)?;
            if parent_chain_contains(&tx, parent, term_taxonomy_id)? {
                return Err(RepoError::InvalidFilter(InvalidFilterValue::new(
                    "parent",
                    format!("{parent} would make {term_taxonomy_id} its own ancestor"),
                )));
            }
        }

        tx.execute(
            "UPDATE term_taxonomy SET parent = ?2 WHERE term_taxonomy_id = ?1;",
            params![term_taxonomy_id, parent],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn recount(&self, term_taxonomy_id: TermTaxonomyId) -> RepoResult<i64> {
        let tx = WriteTx::begin(self.conn)?;
        let stored: i64 = tx
            .query_row(
                "SELECT count FROM term_taxonomy WHERE term_taxonomy_id = ?1;",
                [term_taxonomy_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(RepoError::NotFound {
                entity: "term_taxonomy",
                id: term_taxonomy_id,
            })?;
        let actual = count_relationship_rows(&tx, term_taxonomy_id)?;
        if stored != actual {
            tx.execute(
                "UPDATE term_taxonomy SET count = ?2 WHERE term_taxonomy_id = ?1;",
                params![term_taxonomy_id, actual],
            )?;
            warn!(
                "event=term_recount module=taxonomy status=repaired term_taxonomy_id={} stored={} actual={}",
                term_taxonomy_id, stored, actual
            );
        }
        tx.commit()?;
        Ok(actual)
    }

    fn relationship_count(&self, term_taxonomy_id: TermTaxonomyId) -> RepoResult<i64> {
        count_relationship_rows(self.conn, term_taxonomy_id)
    }

    fn delete_term_taxonomy(&self, term_taxonomy_id: TermTaxonomyId) -> RepoResult<bool> {
        let tx = WriteTx::begin(self.conn)?;
        let row: Option<(TermId, Option<TermTaxonomyId>)> = tx
            .query_row(
                "SELECT term_id, parent FROM term_taxonomy WHERE term_taxonomy_id = ?1;",
                [term_taxonomy_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let Some((term_id, parent)) = row else {
            return Ok(false);
        };

        tx.execute(
            "UPDATE term_taxonomy SET parent = ?2 WHERE parent = ?1;",
            params![term_taxonomy_id, parent],
        )?;
        tx.execute(
            "DELETE FROM term_taxonomy WHERE term_taxonomy_id = ?1;",
            [term_taxonomy_id],
        )?;
        tx.execute(
            "DELETE FROM terms
             WHERE term_id = ?1
               AND NOT EXISTS (SELECT 1 FROM term_taxonomy WHERE term_id = ?1);",
            [term_id],
        )?;
        tx.commit()?;

        info!(
            "event=term_taxonomy_delete module=taxonomy status=ok term_taxonomy_id={}",
            term_taxonomy_id
        );
        Ok(true)
    }
}

/// Inserts a relationship and bumps the count when the row is new.
/// Must run inside the caller's transaction.
fn insert_relationship(
    conn: &Connection,
    object_id: i64,
    term_taxonomy_id: TermTaxonomyId,
    term_order: i64,
) -> RepoResult<bool> {
    let created = conn.execute(
        "INSERT INTO term_relationships (object_id, term_taxonomy_id, term_order)
         VALUES (?1, ?2, ?3)
         ON CONFLICT (object_id, term_taxonomy_id) DO NOTHING;",
        params![object_id, term_taxonomy_id, term_order],
    )?;
    if created == 0 {
        return Ok(false);
    }
    conn.execute(
        "UPDATE term_taxonomy SET count = count + 1 WHERE term_taxonomy_id = ?1;",
        [term_taxonomy_id],
    )?;
    Ok(true)
}

/// Deletes a relationship and lowers the count when a row was removed.
/// Must run inside the caller's transaction.
fn delete_relationship(
    conn: &Connection,
    object_id: i64,
    term_taxonomy_id: TermTaxonomyId,
) -> RepoResult<bool> {
    let removed = conn.execute(
        "DELETE FROM term_relationships WHERE object_id = ?1 AND term_taxonomy_id = ?2;",
        params![object_id, term_taxonomy_id],
    )?;
    if removed == 0 {
        return Ok(false);
    }
    decrement_count(conn, term_taxonomy_id)?;
    Ok(true)
}

/// Detaches `object_id` from every term-taxonomy. Must run inside the
/// caller's transaction.
pub(crate) fn remove_object_relationships(conn: &Connection, object_id: i64) -> RepoResult<usize> {
    let ids = {
        let mut stmt = conn.prepare(
            "SELECT term_taxonomy_id
             FROM term_relationships
             WHERE object_id = ?1
             ORDER BY term_taxonomy_id ASC;",
        )?;
        let mut rows = stmt.query([object_id])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            ids.push(row.get::<_, TermTaxonomyId>(0)?);
        }
        ids
    };

    let mut removed = 0;
    for id in ids {
        if delete_relationship(conn, object_id, id)? {
            removed += 1;
        }
    }
    Ok(removed)
}

fn decrement_count(conn: &Connection, term_taxonomy_id: TermTaxonomyId) -> RepoResult<()> {
    let count: Option<i64> = conn
        .query_row(
            "SELECT count FROM term_taxonomy WHERE term_taxonomy_id = ?1;",
            [term_taxonomy_id],
            |row| row.get(0),
        )
        .optional()?;

    match count {
        None => Ok(()),
        Some(value) if value <= 0 => {
            warn!(
                "event=term_count_clamped module=taxonomy status=warn term_taxonomy_id={} stored_count={}",
                term_taxonomy_id, value
            );
            conn.execute(
                "UPDATE term_taxonomy SET count = 0 WHERE term_taxonomy_id = ?1;",
                [term_taxonomy_id],
            )?;
            Ok(())
        }
        Some(_) => {
            conn.execute(
                "UPDATE term_taxonomy SET count = count - 1 WHERE term_taxonomy_id = ?1;",
                [term_taxonomy_id],
            )?;
            Ok(())
        }
    }
}

fn ensure_term_taxonomy_exists(
    conn: &Connection,
    term_taxonomy_id: TermTaxonomyId,
) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM term_taxonomy WHERE term_taxonomy_id = ?1);",
        [term_taxonomy_id],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(RepoError::NotFound {
            entity: "term_taxonomy",
            id: term_taxonomy_id,
        });
    }
    Ok(())
}

/// A parent must exist and belong to the child's taxonomy.
fn ensure_parent_taxonomy(
    conn: &Connection,
    parent: TermTaxonomyId,
    taxonomy: &str,
) -> RepoResult<()> {
    let actual: Option<String> = conn
        .query_row(
            "SELECT taxonomy FROM term_taxonomy WHERE term_taxonomy_id = ?1;",
            [parent],
            |row| row.get(0),
        )
        .optional()?;
    match actual {
        None => Err(RepoError::InvalidFilter(InvalidFilterValue::new(
            "parent",
            format!("{parent} does not exist"),
        ))),
        Some(actual) if actual != taxonomy => Err(RepoError::InvalidFilter(InvalidFilterValue::new(
            "parent",
            format!("{parent} belongs to `{actual}`, not `{taxonomy}`"),
        ))),
        Some(_) => Ok(()),
    }
}

fn list_object_term_ids(
    conn: &Connection,
    object_id: i64,
    taxonomy: &str,
) -> RepoResult<Vec<TermTaxonomyId>> {
    let mut stmt = conn.prepare(
        "SELECT tr.term_taxonomy_id
         FROM term_relationships tr
         INNER JOIN term_taxonomy tt ON tt.term_taxonomy_id = tr.term_taxonomy_id
         WHERE tr.object_id = ?1
           AND tt.taxonomy = ?2
         ORDER BY tr.term_taxonomy_id ASC;",
    )?;
    let mut rows = stmt.query(params![object_id, taxonomy])?;
    let mut ids = Vec::new();
    while let Some(row) = rows.next()? {
        ids.push(row.get(0)?);
    }
    Ok(ids)
}

fn count_relationship_rows(conn: &Connection, term_taxonomy_id: TermTaxonomyId) -> RepoResult<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM term_relationships WHERE term_taxonomy_id = ?1;",
        [term_taxonomy_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Returns whether walking parent links upward from `start` reaches `target`.
///
/// `UNION` (not `UNION ALL`) keeps the walk finite even if stored data
/// already contains a loop.
fn parent_chain_contains(
    conn: &Connection,
    start: TermTaxonomyId,
    target: TermTaxonomyId,
) -> RepoResult<bool> {
    let found: i64 = conn.query_row(
        "WITH RECURSIVE ancestors(id) AS (
            SELECT ?1
            UNION
            SELECT tt.parent
            FROM term_taxonomy tt
            INNER JOIN ancestors a ON tt.term_taxonomy_id = a.id
            WHERE tt.parent IS NOT NULL
        )
        SELECT EXISTS(SELECT 1 FROM ancestors WHERE id = ?2);",
        params![start, target],
        |row| row.get(0),
    )?;
    Ok(found == 1)
}

fn parse_term_taxonomy_row(row: &Row<'_>) -> RepoResult<TermTaxonomy> {
    let count: i64 = row.get("count")?;
    if count < 0 {
        return Err(RepoError::InvalidData(format!(
            "negative count `{count}` in term_taxonomy.count"
        )));
    }

    Ok(TermTaxonomy {
        term_taxonomy_id: row.get("term_taxonomy_id")?,
        taxonomy: row.get("taxonomy")?,
        description: row.get("description")?,
        parent: row.get("parent")?,
        count,
        term: Term {
            term_id: row.get("term_id")?,
            name: row.get("name")?,
            slug: row.get("slug")?,
            term_group: row.get("term_group")?,
        },
    })
}
