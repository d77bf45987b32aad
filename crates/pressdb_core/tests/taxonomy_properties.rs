//! Property and concurrency tests for term count maintenance.
//!
//! Whatever sequence of attach/detach/replace calls runs, every stored
//! `term_taxonomy.count` must equal its number of relationship rows.

use pressdb_core::db::{open_db, open_db_in_memory};
use pressdb_core::model::taxonomy::{NewTermTaxonomy, TAXONOMY_CATEGORY};
use pressdb_core::{taxonomy_service, SqliteTaxonomyRepository, TaxonomyRepository};
use proptest::prelude::*;
use rusqlite::Connection;
use std::thread;

#[derive(Debug, Clone)]
enum Op {
    Attach { object: i64, term: usize },
    Detach { object: i64, term: usize },
    Replace { object: i64, terms: Vec<usize> },
    DeletePost { object: i64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (1i64..6, 0usize..3).prop_map(|(object, term)| Op::Attach { object, term }),
        3 => (1i64..6, 0usize..3).prop_map(|(object, term)| Op::Detach { object, term }),
        1 => (1i64..6, prop::collection::vec(0usize..3, 0..4))
            .prop_map(|(object, terms)| Op::Replace { object, terms }),
        1 => (1i64..6).prop_map(|object| Op::DeletePost { object }),
    ]
}

fn create_terms(conn: &Connection, names: &[&str]) -> Vec<i64> {
    let service = taxonomy_service(conn).unwrap();
    names
        .iter()
        .map(|name| {
            service
                .insert_term(&NewTermTaxonomy {
                    name: name.to_string(),
                    taxonomy: TAXONOMY_CATEGORY.to_string(),
                    ..NewTermTaxonomy::default()
                })
                .unwrap()
                .term_taxonomy_id
        })
        .collect()
}

/// `(term_taxonomy_id, stored count, actual rows)` for every row.
fn count_report(conn: &Connection) -> Vec<(i64, i64, i64)> {
    let mut stmt = conn
        .prepare(
            "SELECT
                tt.term_taxonomy_id,
                tt.count,
                (SELECT COUNT(*) FROM term_relationships tr
                 WHERE tr.term_taxonomy_id = tt.term_taxonomy_id)
             FROM term_taxonomy tt
             ORDER BY tt.term_taxonomy_id;",
        )
        .unwrap();
    let rows: Vec<(i64, i64, i64)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .unwrap()
        .map(Result::unwrap)
        .collect();
    rows
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn count_matches_relationship_rows(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let conn = open_db_in_memory().unwrap();
        let terms = create_terms(&conn, &["alpha", "beta", "gamma"]);
        let repo = SqliteTaxonomyRepository::try_new(&conn).unwrap();

        for op in ops {
            match op {
                Op::Attach { object, term } => {
                    repo.attach(object, terms[term], 0).unwrap();
                }
                Op::Detach { object, term } => {
                    repo.detach(object, terms[term]).unwrap();
                }
                Op::Replace { object, terms: picks } => {
                    let ids: Vec<i64> = picks.iter().map(|pick| terms[*pick]).collect();
                    repo.set_object_terms(object, TAXONOMY_CATEGORY, &ids).unwrap();
                }
                Op::DeletePost { object } => {
                    repo.remove_object(object).unwrap();
                }
            }

            for (id, stored, actual) in count_report(&conn) {
                prop_assert_eq!(stored, actual, "term_taxonomy {} drifted", id);
            }
        }
    }
}

#[test]
fn concurrent_attach_detach_converges_to_row_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taxonomy.db");
    let terms = {
        let conn = open_db(&path).unwrap();
        create_terms(&conn, &["shared", "other"])
    };

    let handles: Vec<_> = (0..4i64)
        .map(|worker| {
            let path = path.clone();
            let terms = terms.clone();
            thread::spawn(move || {
                let conn = open_db(&path).unwrap();
                let repo = SqliteTaxonomyRepository::try_new(&conn).unwrap();
                for round in 0..30i64 {
                    // Objects overlap across workers so duplicates race.
                    let object = (worker + round) % 8;
                    let term = terms[(round % 2) as usize];
                    repo.attach(object, term, 0).unwrap();
                    if round % 3 == 0 {
                        repo.detach((object + 1) % 8, term).unwrap();
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let conn = open_db(&path).unwrap();
    for (id, stored, actual) in count_report(&conn) {
        assert_eq!(stored, actual, "term_taxonomy {id} drifted");
    }
}
