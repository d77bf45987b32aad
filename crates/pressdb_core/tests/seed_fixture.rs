use pressdb_core::db::open_db_in_memory;
use pressdb_core::seed::{DEFAULT_OPTIONS, SAMPLE_POST_ID, UNCATEGORIZED_TERM_TAXONOMY_ID};
use pressdb_core::{
    seed_defaults, MetaOwner, MetaRepository, OptionRepository, SqliteMetaRepository,
    SqliteOptionRepository, SqliteTaxonomyRepository, SqliteUserRepository, TaxonomyRepository,
    UserRepository,
};
use rusqlite::Connection;

fn row_count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

fn fixture_row_counts(conn: &Connection) -> Vec<i64> {
    [
        "users",
        "user_meta",
        "options",
        "terms",
        "term_taxonomy",
        "posts",
        "comments",
        "term_relationships",
    ]
    .iter()
    .map(|table| row_count(conn, table))
    .collect()
}

#[test]
fn seed_creates_default_site() {
    let conn = open_db_in_memory().unwrap();
    let report = seed_defaults(&conn).unwrap();

    assert_eq!(report.user_meta_created, 4);
    assert_eq!(report.options_created, DEFAULT_OPTIONS.len());
    assert!(report.category_created);
    assert!(report.post_created);
    assert!(report.post_attached);
    assert!(report.comment_created);

    let admin = SqliteUserRepository::try_new(&conn)
        .unwrap()
        .find_user_by_login("admin")
        .unwrap()
        .unwrap();
    assert_eq!(admin.display_name, "Administrator");

    let meta = SqliteMetaRepository::try_new(&conn).unwrap();
    assert_eq!(
        meta.get(MetaOwner::User(admin.id), "wp_user_level")
            .unwrap()
            .as_deref(),
        Some("10")
    );

    let options = SqliteOptionRepository::try_new(&conn).unwrap();
    assert_eq!(options.get_option("blogname", "").unwrap(), "WordPress Site");
    assert_eq!(options.get_option("rewrite_rules", "x").unwrap(), "x");
    assert!(!options
        .load_autoloaded()
        .unwrap()
        .contains_key("moderation_keys"));

    let taxonomy = SqliteTaxonomyRepository::try_new(&conn).unwrap();
    let category = taxonomy
        .get_term_taxonomy(UNCATEGORIZED_TERM_TAXONOMY_ID)
        .unwrap()
        .unwrap();
    assert_eq!(category.term.name, "Uncategorized");
    assert_eq!(category.count, 1);
    assert_eq!(
        taxonomy
            .list_relationships_for_object(SAMPLE_POST_ID, Some("category"))
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn seed_is_idempotent_and_keeps_later_edits() {
    let conn = open_db_in_memory().unwrap();
    seed_defaults(&conn).unwrap();
    let options = SqliteOptionRepository::try_new(&conn).unwrap();
    options
        .set_option("blogname", "Renamed", pressdb_core::Autoload::Yes)
        .unwrap();
    let before = fixture_row_counts(&conn);

    let report = seed_defaults(&conn).unwrap();

    assert_eq!(report.user_meta_created, 0);
    assert_eq!(report.options_created, 0);
    assert!(!report.category_created);
    assert!(!report.post_created);
    assert!(!report.post_attached);
    assert!(!report.comment_created);

    let after = fixture_row_counts(&conn);
    assert_eq!(before, after);
    assert_eq!(options.get_option("blogname", "").unwrap(), "Renamed");

    let count: i64 = conn
        .query_row(
            "SELECT count FROM term_taxonomy WHERE term_taxonomy_id = 1;",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn failed_seed_leaves_no_partial_fixture() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TRIGGER comments_locked BEFORE INSERT ON comments
         BEGIN
             SELECT RAISE(ABORT, 'comments locked');
         END;",
    )
    .unwrap();

    assert!(seed_defaults(&conn).is_err());
    assert!(conn.is_autocommit());
    assert!(fixture_row_counts(&conn).iter().all(|count| *count == 0));

    conn.execute_batch("DROP TRIGGER comments_locked;").unwrap();
    let report = seed_defaults(&conn).unwrap();
    assert!(report.post_created);
    assert!(report.comment_created);
}
