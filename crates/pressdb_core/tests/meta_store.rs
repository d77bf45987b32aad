use pressdb_core::db::{open_db, open_db_in_memory};
use pressdb_core::model::post::NewPost;
use pressdb_core::model::user::NewUser;
use pressdb_core::{
    ErrorKind, MetaOwner, MetaRepository, PostRepository, SqliteMetaRepository,
    SqlitePostRepository, SqliteUserRepository, UserRepository,
};
use rusqlite::Connection;
use std::thread;

fn create_author(conn: &Connection, login: &str) -> i64 {
    let users = SqliteUserRepository::try_new(conn).unwrap();
    users
        .upsert_user_by_login(&NewUser {
            login: login.to_string(),
            display_name: login.to_uppercase(),
            ..NewUser::default()
        })
        .unwrap()
        .id
}

fn create_post(conn: &Connection, author_id: i64, slug: &str) -> i64 {
    let posts = SqlitePostRepository::try_new(conn).unwrap();
    posts
        .create_post(&NewPost::new(author_id, slug, slug))
        .unwrap()
        .id
}

#[test]
fn set_then_get_returns_value_and_overwrites_in_place() {
    let conn = open_db_in_memory().unwrap();
    let author = create_author(&conn, "ana");
    let post = create_post(&conn, author, "first");
    let meta = SqliteMetaRepository::try_new(&conn).unwrap();

    meta.set(MetaOwner::Post(post), "color", "red").unwrap();
    assert_eq!(
        meta.get(MetaOwner::Post(post), "color").unwrap().as_deref(),
        Some("red")
    );

    meta.set(MetaOwner::Post(post), "color", "blue").unwrap();
    assert_eq!(
        meta.get(MetaOwner::Post(post), "color").unwrap().as_deref(),
        Some("blue")
    );
    assert_eq!(meta.list_entries(MetaOwner::Post(post)).unwrap().len(), 1);
}

#[test]
fn get_on_missing_key_or_owner_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let meta = SqliteMetaRepository::try_new(&conn).unwrap();

    assert_eq!(meta.get(MetaOwner::Post(999), "color").unwrap(), None);
    assert!(meta.get_all(MetaOwner::User(999)).unwrap().is_empty());
}

#[test]
fn empty_key_and_empty_value_are_distinct_from_unset() {
    let conn = open_db_in_memory().unwrap();
    let author = create_author(&conn, "ana");
    let meta = SqliteMetaRepository::try_new(&conn).unwrap();

    meta.set(MetaOwner::User(author), "", "blank-key").unwrap();
    meta.set(MetaOwner::User(author), "nickname", "").unwrap();

    assert_eq!(
        meta.get(MetaOwner::User(author), "").unwrap().as_deref(),
        Some("blank-key")
    );
    assert_eq!(
        meta.get(MetaOwner::User(author), "nickname")
            .unwrap()
            .as_deref(),
        Some("")
    );
    assert_eq!(meta.get(MetaOwner::User(author), "unset").unwrap(), None);
}

#[test]
fn get_all_returns_every_key_of_owner_only() {
    let conn = open_db_in_memory().unwrap();
    let author = create_author(&conn, "ana");
    let first = create_post(&conn, author, "first");
    let second = create_post(&conn, author, "second");
    let meta = SqliteMetaRepository::try_new(&conn).unwrap();

    meta.set(MetaOwner::Post(first), "a", "1").unwrap();
    meta.set(MetaOwner::Post(first), "b", "2").unwrap();
    meta.set(MetaOwner::Post(second), "a", "other").unwrap();

    let map = meta.get_all(MetaOwner::Post(first)).unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("a").map(String::as_str), Some("1"));
    assert_eq!(map.get("b").map(String::as_str), Some("2"));
}

#[test]
fn post_and_user_meta_do_not_collide_on_same_id() {
    let conn = open_db_in_memory().unwrap();
    let author = create_author(&conn, "ana");
    let post = create_post(&conn, author, "first");
    assert_eq!(author, post);
    let meta = SqliteMetaRepository::try_new(&conn).unwrap();

    meta.set(MetaOwner::Post(post), "key", "post").unwrap();
    meta.set(MetaOwner::User(author), "key", "user").unwrap();

    assert_eq!(
        meta.get(MetaOwner::Post(post), "key").unwrap().as_deref(),
        Some("post")
    );
    assert_eq!(
        meta.get(MetaOwner::User(author), "key").unwrap().as_deref(),
        Some("user")
    );
}

#[test]
fn set_for_missing_owner_is_constraint_violation() {
    let conn = open_db_in_memory().unwrap();
    let meta = SqliteMetaRepository::try_new(&conn).unwrap();

    let err = meta.set(MetaOwner::Post(42), "k", "v").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
}

#[test]
fn delete_removes_key_and_reports_presence() {
    let conn = open_db_in_memory().unwrap();
    let author = create_author(&conn, "ana");
    let meta = SqliteMetaRepository::try_new(&conn).unwrap();

    meta.set(MetaOwner::User(author), "k", "v").unwrap();
    assert!(meta.delete(MetaOwner::User(author), "k").unwrap());
    assert!(!meta.delete(MetaOwner::User(author), "k").unwrap());
    assert_eq!(meta.get(MetaOwner::User(author), "k").unwrap(), None);
}

#[test]
fn add_many_skips_existing_keys() {
    let conn = open_db_in_memory().unwrap();
    let author = create_author(&conn, "ana");
    let meta = SqliteMetaRepository::try_new(&conn).unwrap();

    meta.set(MetaOwner::User(author), "first_name", "Changed").unwrap();
    let created = meta
        .add_many(
            MetaOwner::User(author),
            &[
                ("first_name".to_string(), "Admin".to_string()),
                ("last_name".to_string(), "User".to_string()),
            ],
        )
        .unwrap();

    assert_eq!(created, 1);
    assert_eq!(
        meta.get(MetaOwner::User(author), "first_name")
            .unwrap()
            .as_deref(),
        Some("Changed")
    );
}

#[test]
fn deleting_owner_cascades_meta() {
    let conn = open_db_in_memory().unwrap();
    let author = create_author(&conn, "ana");
    let post = create_post(&conn, author, "doomed");
    let other_author = create_author(&conn, "bo");
    let meta = SqliteMetaRepository::try_new(&conn).unwrap();
    meta.set(MetaOwner::Post(post), "k", "v").unwrap();
    meta.set(MetaOwner::User(other_author), "k", "v").unwrap();

    let posts = SqlitePostRepository::try_new(&conn).unwrap();
    assert!(posts.delete_post(post).unwrap());
    assert!(meta.get_all(MetaOwner::Post(post)).unwrap().is_empty());

    let users = SqliteUserRepository::try_new(&conn).unwrap();
    assert!(users.delete_user(other_author).unwrap());
    assert!(meta.get_all(MetaOwner::User(other_author)).unwrap().is_empty());
}

#[test]
fn deleting_user_with_posts_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let author = create_author(&conn, "ana");
    create_post(&conn, author, "kept");

    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let err = users.delete_user(author).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
}

#[test]
fn concurrent_sets_on_same_key_leave_one_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("meta.db");
    let post = {
        let conn = open_db(&path).unwrap();
        let author = create_author(&conn, "ana");
        create_post(&conn, author, "contended")
    };

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let path = path.clone();
            thread::spawn(move || {
                let conn = open_db(&path).unwrap();
                let meta = SqliteMetaRepository::try_new(&conn).unwrap();
                for round in 0..25 {
                    meta.set(MetaOwner::Post(post), "views", &format!("{worker}-{round}"))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let conn = open_db(&path).unwrap();
    let meta = SqliteMetaRepository::try_new(&conn).unwrap();
    let entries = meta.list_entries(MetaOwner::Post(post)).unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].value.ends_with("-24"));
}
