use pressdb_core::db::open_db_in_memory;
use pressdb_core::model::comment::{NewComment, COMMENT_PENDING};
use pressdb_core::model::post::{NewPost, POST_TYPE_PAGE, STATUS_DRAFT, STATUS_TRASH};
use pressdb_core::model::user::NewUser;
use pressdb_core::{
    content_service, seed_defaults, ErrorKind, MetaOwner, MetaRepository, PostListQuery,
    PostRepository, PostSortField, SearchQuery, SortOrder, SqliteMetaRepository,
    SqlitePostRepository, SqliteUserRepository, UserRepository,
};
use rusqlite::Connection;

fn create_author(conn: &Connection, login: &str, display_name: &str) -> i64 {
    SqliteUserRepository::try_new(conn)
        .unwrap()
        .upsert_user_by_login(&NewUser {
            login: login.to_string(),
            nicename: login.to_string(),
            email: format!("{login}@example.test"),
            display_name: display_name.to_string(),
            ..NewUser::default()
        })
        .unwrap()
        .id
}

fn create_post(conn: &Connection, post: NewPost) -> i64 {
    SqlitePostRepository::try_new(conn)
        .unwrap()
        .create_post(&post)
        .unwrap()
        .id
}

fn post_at(author: i64, slug: &str, date: i64) -> NewPost {
    let mut post = NewPost::new(author, format!("Title {slug}"), slug);
    post.date = Some(date);
    post
}

#[test]
fn default_listing_returns_ten_newest_published_posts() {
    let conn = open_db_in_memory().unwrap();
    let author = create_author(&conn, "ana", "Ana");
    for index in 0..15 {
        create_post(&conn, post_at(author, &format!("pub-{index}"), 1_000 + index));
    }
    for index in 0..3 {
        let mut draft = post_at(author, &format!("draft-{index}"), 5_000 + index);
        draft.status = STATUS_DRAFT.to_string();
        create_post(&conn, draft);
    }

    let service = content_service(&conn).unwrap();
    let items = service.list_posts(&PostListQuery::default()).unwrap();

    assert_eq!(items.len(), 10);
    assert!(items.iter().all(|item| item.post.status == "publish"));
    assert_eq!(items[0].post.slug, "pub-14");
    assert!(items
        .windows(2)
        .all(|pair| pair[0].post.date >= pair[1].post.date));
    assert_eq!(items[0].author.as_ref().unwrap().display_name, "Ana");
}

#[test]
fn listing_pages_are_stable_when_sort_keys_tie() {
    let conn = open_db_in_memory().unwrap();
    let author = create_author(&conn, "ana", "Ana");
    for index in 0..6 {
        create_post(&conn, post_at(author, &format!("same-{index}"), 42));
    }
    let service = content_service(&conn).unwrap();

    let page = |offset| {
        service
            .list_posts(&PostListQuery {
                limit: 3,
                offset,
                ..PostListQuery::default()
            })
            .unwrap()
            .into_iter()
            .map(|item| item.post.id)
            .collect::<Vec<_>>()
    };
    let first = page(0);
    let second = page(3);

    assert_eq!(first, vec![6, 5, 4]);
    assert_eq!(second, vec![3, 2, 1]);
}

#[test]
fn listing_sorts_by_title_ascending_and_filters_author() {
    let conn = open_db_in_memory().unwrap();
    let ana = create_author(&conn, "ana", "Ana");
    let bo = create_author(&conn, "bo", "Bo");
    let mut zeta = NewPost::new(ana, "Zeta", "zeta");
    zeta.date = Some(1);
    create_post(&conn, zeta);
    create_post(&conn, NewPost::new(ana, "alpha", "alpha"));
    create_post(&conn, NewPost::new(bo, "Beta", "beta"));

    let service = content_service(&conn).unwrap();
    let items = service
        .list_posts(&PostListQuery {
            sort_field: PostSortField::Title,
            sort_order: SortOrder::Asc,
            author_id: Some(ana),
            ..PostListQuery::default()
        })
        .unwrap();

    // Titles compare bytewise, so uppercase sorts first.
    let titles: Vec<_> = items.iter().map(|item| item.post.title.as_str()).collect();
    assert_eq!(titles, vec!["Zeta", "alpha"]);
}

#[test]
fn listing_search_matches_title_or_content_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let author = create_author(&conn, "ana", "Ana");
    let mut in_body = NewPost::new(author, "Plain", "plain");
    in_body.content = "A note about SQLite internals".to_string();
    create_post(&conn, in_body);
    create_post(&conn, NewPost::new(author, "sqlite tips", "tips"));
    create_post(&conn, NewPost::new(author, "Unrelated", "unrelated"));

    let service = content_service(&conn).unwrap();
    let items = service
        .list_posts(&PostListQuery {
            search: Some("SQLITE".to_string()),
            ..PostListQuery::default()
        })
        .unwrap();

    assert_eq!(items.len(), 2);
}

#[test]
fn listing_search_treats_wildcards_literally() {
    let conn = open_db_in_memory().unwrap();
    let author = create_author(&conn, "ana", "Ana");
    create_post(&conn, NewPost::new(author, "50% off", "sale"));
    create_post(&conn, NewPost::new(author, "500 reasons", "reasons"));

    let service = content_service(&conn).unwrap();
    let items = service
        .list_posts(&PostListQuery {
            search: Some("50%".to_string()),
            ..PostListQuery::default()
        })
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].post.slug, "sale");
}

#[test]
fn listing_rejects_negative_bounds_before_querying() {
    let conn = open_db_in_memory().unwrap();
    let service = content_service(&conn).unwrap();

    let err = service
        .list_posts(&PostListQuery {
            limit: -1,
            ..PostListQuery::default()
        })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFilter);
}

#[test]
fn listing_item_carries_meta_only_when_requested_and_approved_count() {
    let conn = open_db_in_memory().unwrap();
    let author = create_author(&conn, "ana", "Ana");
    let post = create_post(&conn, NewPost::new(author, "With meta", "with-meta"));
    SqliteMetaRepository::try_new(&conn)
        .unwrap()
        .set(MetaOwner::Post(post), "mood", "sunny")
        .unwrap();
    let posts = SqlitePostRepository::try_new(&conn).unwrap();
    posts.create_comment(&NewComment::new(post, "Reader", "hi")).unwrap();
    let mut pending = NewComment::new(post, "Spammer", "buy");
    pending.approved = COMMENT_PENDING.to_string();
    posts.create_comment(&pending).unwrap();

    let service = content_service(&conn).unwrap();
    let with_meta = service.list_posts(&PostListQuery::default()).unwrap();
    assert_eq!(with_meta[0].meta.get("mood").map(String::as_str), Some("sunny"));
    assert_eq!(with_meta[0].approved_comment_count, 1);

    let without_meta = service
        .list_posts(&PostListQuery {
            include_meta: false,
            ..PostListQuery::default()
        })
        .unwrap();
    assert!(without_meta[0].meta.is_empty());
}

#[test]
fn get_post_by_slug_returns_seeded_hello_world() {
    let conn = open_db_in_memory().unwrap();
    seed_defaults(&conn).unwrap();
    let service = content_service(&conn).unwrap();

    let detail = service.get_post_by_slug("hello-world", "post").unwrap().unwrap();

    assert_eq!(detail.post.title, "Hello World!");
    let author = detail.author.unwrap();
    assert_eq!(author.display_name, "Administrator");
    assert_eq!(author.email, "admin@wordpress.local");
    assert_eq!(detail.comments.len(), 1);
    assert_eq!(detail.comments[0].comment.author, "A WordPress Commenter");
    assert!(detail.comments[0].replies.is_empty());
    assert_eq!(detail.terms.len(), 1);
    assert_eq!(detail.terms[0].term_taxonomy.term.slug, "uncategorized");
}

#[test]
fn get_post_by_slug_misses_wrong_type_and_unpublished() {
    let conn = open_db_in_memory().unwrap();
    seed_defaults(&conn).unwrap();
    let service = content_service(&conn).unwrap();

    assert!(service
        .get_post_by_slug("hello-world", POST_TYPE_PAGE)
        .unwrap()
        .is_none());
    assert!(service.get_post_by_slug("no-such-post", "post").unwrap().is_none());

    SqlitePostRepository::try_new(&conn)
        .unwrap()
        .set_post_status(1, STATUS_TRASH)
        .unwrap();
    assert!(service.get_post_by_slug("hello-world", "post").unwrap().is_none());
}

#[test]
fn comment_threads_are_newest_first_with_oldest_first_replies() {
    let conn = open_db_in_memory().unwrap();
    let author = create_author(&conn, "ana", "Ana");
    let post = create_post(&conn, NewPost::new(author, "Threads", "threads"));
    let posts = SqlitePostRepository::try_new(&conn).unwrap();

    let mut older = NewComment::new(post, "A", "older");
    older.date = Some(100);
    let older = posts.create_comment(&older).unwrap();
    let mut newer = NewComment::new(post, "B", "newer");
    newer.date = Some(200);
    posts.create_comment(&newer).unwrap();

    for (date, text) in [(400, "second reply"), (300, "first reply")] {
        let mut reply = NewComment::new(post, "C", text);
        reply.date = Some(date);
        reply.parent_id = older.comment_id;
        posts.create_comment(&reply).unwrap();
    }
    let mut hidden = NewComment::new(post, "D", "pending reply");
    hidden.parent_id = older.comment_id;
    hidden.approved = COMMENT_PENDING.to_string();
    posts.create_comment(&hidden).unwrap();

    let service = content_service(&conn).unwrap();
    let detail = service.get_post_by_slug("threads", "post").unwrap().unwrap();

    let tops: Vec<_> = detail
        .comments
        .iter()
        .map(|thread| thread.comment.content.as_str())
        .collect();
    assert_eq!(tops, vec!["newer", "older"]);
    let replies: Vec<_> = detail.comments[1]
        .replies
        .iter()
        .map(|reply| reply.content.as_str())
        .collect();
    assert_eq!(replies, vec!["first reply", "second reply"]);
}

#[test]
fn search_finds_seeded_post_by_content_and_matches_text_verbatim() {
    let conn = open_db_in_memory().unwrap();
    seed_defaults(&conn).unwrap();
    let service = content_service(&conn).unwrap();

    let hits = service.search(&SearchQuery::new("WELCOME")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].post.slug, "hello-world");
    assert_eq!(
        hits[0].author.as_ref().unwrap().display_name,
        "Administrator"
    );

    let by_excerpt = service.search(&SearchQuery::new("comment")).unwrap();
    assert_eq!(by_excerpt.len(), 1);
    assert_eq!(by_excerpt[0].post.id, 1);

    assert!(service.search(&SearchQuery::new("")).unwrap().is_empty());
    assert!(service.search(&SearchQuery::new("World! ")).unwrap().is_empty());
    assert_eq!(service.search(&SearchQuery::new("World!")).unwrap().len(), 1);
}

#[test]
fn search_covers_pages_and_excerpts_but_not_drafts() {
    let conn = open_db_in_memory().unwrap();
    let author = create_author(&conn, "ana", "Ana");
    let mut page = NewPost::new(author, "About", "about");
    page.post_type = POST_TYPE_PAGE.to_string();
    page.excerpt = "all about gardening".to_string();
    page.date = Some(10);
    create_post(&conn, page);
    let mut post = NewPost::new(author, "Gardening log", "log");
    post.date = Some(20);
    create_post(&conn, post);
    let mut draft = NewPost::new(author, "Gardening draft", "draft");
    draft.status = STATUS_DRAFT.to_string();
    create_post(&conn, draft);

    let service = content_service(&conn).unwrap();
    let hits = service.search(&SearchQuery::new("gardening")).unwrap();
    let slugs: Vec<_> = hits.iter().map(|hit| hit.post.slug.as_str()).collect();
    assert_eq!(slugs, vec!["log", "about"]);

    let mut posts_only = SearchQuery::new("gardening");
    posts_only.post_types = vec!["post".to_string()];
    posts_only.limit = 5;
    assert_eq!(service.search(&posts_only).unwrap().len(), 1);
}

#[test]
fn get_post_terms_defaults_to_category() {
    let conn = open_db_in_memory().unwrap();
    seed_defaults(&conn).unwrap();
    let service = content_service(&conn).unwrap();

    let categories = service.get_post_terms(1, None).unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].term_taxonomy.taxonomy, "category");
    assert!(service.get_post_terms(1, Some("post_tag")).unwrap().is_empty());
}

#[test]
fn delete_post_removes_comments_and_decrements_counts() {
    let conn = open_db_in_memory().unwrap();
    seed_defaults(&conn).unwrap();
    let posts = SqlitePostRepository::try_new(&conn).unwrap();

    assert!(posts.delete_post(1).unwrap());
    assert!(!posts.delete_post(1).unwrap());

    let (count, comments): (i64, i64) = conn
        .query_row(
            "SELECT
                (SELECT count FROM term_taxonomy WHERE term_taxonomy_id = 1),
                (SELECT COUNT(*) FROM comments);",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(count, 0);
    assert_eq!(comments, 0);
    let users = SqliteUserRepository::try_new(&conn).unwrap();
    assert!(users.get_user(1).unwrap().is_some());
}

#[test]
fn duplicate_slug_within_type_is_constraint_violation() {
    let conn = open_db_in_memory().unwrap();
    let author = create_author(&conn, "ana", "Ana");
    create_post(&conn, NewPost::new(author, "One", "same"));
    let mut page = NewPost::new(author, "Page", "same");
    page.post_type = POST_TYPE_PAGE.to_string();
    create_post(&conn, page);

    let err = SqlitePostRepository::try_new(&conn)
        .unwrap()
        .create_post(&NewPost::new(author, "Two", "same"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
}

#[test]
fn set_post_status_on_missing_post_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let err = SqlitePostRepository::try_new(&conn)
        .unwrap()
        .set_post_status(77, STATUS_TRASH)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
