//! Post and comment repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist posts and their comments.
//! - Run the filtered/paginated listing and the cross-type search.
//!
//! # Invariants
//! - Listing order is `<sort column> <dir>, id <dir>` so pages are stable.
//! - Search text is matched literally; `%`/`_` in user input are escaped.
//! - Only comments with `comment_approved = '1'` are counted or threaded.

use crate::model::comment::{Comment, CommentId, CommentThread, NewComment, COMMENT_APPROVED};
use crate::model::post::{NewPost, Post, PostId, PostListQuery, SearchQuery};
use crate::repo::taxonomy_repo::remove_object_relationships;
use crate::repo::{ensure_schema_ready, like_contains_pattern, RepoError, RepoResult, WriteTx};
use log::info;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::HashMap;

const POST_SELECT_SQL: &str = "SELECT
    id,
    post_author,
    post_type,
    post_status,
    post_name,
    post_title,
    post_content,
    post_excerpt,
    post_date,
    post_modified,
    post_parent,
    menu_order,
    guid,
    comment_status
FROM posts";

const COMMENT_SELECT_SQL: &str = "SELECT
    comment_id,
    comment_post_id,
    comment_author,
    comment_author_email,
    comment_author_url,
    comment_content,
    comment_date,
    comment_approved,
    comment_parent,
    user_id
FROM comments";

/// Repository interface for posts and comments.
pub trait PostRepository {
    /// Creates one post and returns the stored row.
    fn create_post(&self, post: &NewPost) -> RepoResult<Post>;
    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>>;
    /// Exact lookup of a published post by `(slug, post_type)`.
    fn find_by_slug(&self, slug: &str, post_type: &str) -> RepoResult<Option<Post>>;
    /// Lists posts matching `query`. Rejects invalid bounds before querying.
    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>>;
    /// Searches published posts of the requested types. Blank text yields
    /// no results.
    fn search_posts(&self, query: &SearchQuery) -> RepoResult<Vec<Post>>;
    fn count_approved_comments(&self, post_id: PostId) -> RepoResult<i64>;
    /// Approved top-level comments newest-first, each with approved replies
    /// oldest-first.
    fn approved_comment_threads(&self, post_id: PostId) -> RepoResult<Vec<CommentThread>>;
    fn create_comment(&self, comment: &NewComment) -> RepoResult<Comment>;
    /// Moves a post to another status and stamps `modified`.
    fn set_post_status(&self, id: PostId, status: &str) -> RepoResult<()>;
    /// Deletes a post with its meta, comments and term relationships.
    fn delete_post(&self, id: PostId) -> RepoResult<bool>;
}

/// SQLite-backed post repository.
pub struct SqlitePostRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["posts", "comments", "term_relationships"])?;
        Ok(Self { conn })
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn create_post(&self, post: &NewPost) -> RepoResult<Post> {
        self.conn.execute(
            "INSERT INTO posts (
                id,
                post_author,
                post_type,
                post_status,
                post_name,
                post_title,
                post_content,
                post_excerpt,
                post_date,
                post_modified,
                post_parent,
                menu_order,
                guid,
                comment_status
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8,
                COALESCE(?9, strftime('%s', 'now') * 1000),
                COALESCE(?9, strftime('%s', 'now') * 1000),
                ?10, ?11, ?12, ?13
            );",
            params![
                post.id,
                post.author_id,
                post.post_type,
                post.status,
                post.slug,
                post.title,
                post.content,
                post.excerpt,
                post.date,
                post.parent_id,
                post.menu_order,
                post.guid,
                post.comment_status,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(
            "event=post_create module=post status=ok post_id={} post_type={}",
            id, post.post_type
        );

        self.get_post(id)?
            .ok_or_else(|| RepoError::InvalidData(format!("post {id} missing in read-back")))
    }

    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POST_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_post_row(row)?));
        }
        Ok(None)
    }

    fn find_by_slug(&self, slug: &str, post_type: &str) -> RepoResult<Option<Post>> {
        let mut stmt = self.conn.prepare(&format!(
            "{POST_SELECT_SQL}
             WHERE post_name = ?1
               AND post_type = ?2
               AND post_status = 'publish';"
        ))?;
        let mut rows = stmt.query(params![slug, post_type])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_post_row(row)?));
        }
        Ok(None)
    }

    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>> {
        query.validate()?;

        let mut sql = format!("{POST_SELECT_SQL} WHERE post_type = ? AND post_status = ?");
        let mut bind_values = vec![
            Value::Text(query.post_type.clone()),
            Value::Text(query.status.clone()),
        ];

        if let Some(author_id) = query.author_id {
            sql.push_str(" AND post_author = ?");
            bind_values.push(Value::Integer(author_id));
        }

        if let Some(search) = query.search.as_deref().filter(|text| !text.is_empty()) {
            let pattern = like_contains_pattern(search);
            sql.push_str(" AND (post_title LIKE ? ESCAPE '\\' OR post_content LIKE ? ESCAPE '\\')");
            bind_values.push(Value::Text(pattern.clone()));
            bind_values.push(Value::Text(pattern));
        }

        let direction = query.sort_order.as_sql();
        sql.push_str(&format!(
            " ORDER BY {column} {direction}, id {direction} LIMIT ? OFFSET ?",
            column = query.sort_field.column(),
        ));
        bind_values.push(Value::Integer(query.limit));
        bind_values.push(Value::Integer(query.offset));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            posts.push(parse_post_row(row)?);
        }
        Ok(posts)
    }

    fn search_posts(&self, query: &SearchQuery) -> RepoResult<Vec<Post>> {
        query.validate()?;
        let text = query.text.as_str();
        if text.is_empty() || query.post_types.is_empty() {
            return Ok(Vec::new());
        }

        let pattern = like_contains_pattern(text);
        let placeholders = vec!["?"; query.post_types.len()].join(", ");
        let sql = format!(
            "{POST_SELECT_SQL}
             WHERE post_status = 'publish'
               AND post_type IN ({placeholders})
               AND (
                    post_title LIKE ? ESCAPE '\\'
                 OR post_content LIKE ? ESCAPE '\\'
                 OR post_excerpt LIKE ? ESCAPE '\\'
               )
             ORDER BY post_date DESC, id DESC
             LIMIT ?;"
        );

        let mut bind_values: Vec<Value> = query
            .post_types
            .iter()
            .map(|post_type| Value::Text(post_type.clone()))
            .collect();
        for _ in 0..3 {
            bind_values.push(Value::Text(pattern.clone()));
        }
        bind_values.push(Value::Integer(query.limit));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            posts.push(parse_post_row(row)?);
        }
        Ok(posts)
    }

    fn count_approved_comments(&self, post_id: PostId) -> RepoResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*)
             FROM comments
             WHERE comment_post_id = ?1
               AND comment_approved = ?2;",
            params![post_id, COMMENT_APPROVED],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn approved_comment_threads(&self, post_id: PostId) -> RepoResult<Vec<CommentThread>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COMMENT_SELECT_SQL}
             WHERE comment_post_id = ?1
               AND comment_approved = ?2
             ORDER BY comment_date ASC, comment_id ASC;"
        ))?;
        let mut rows = stmt.query(params![post_id, COMMENT_APPROVED])?;

        let mut top_level = Vec::new();
        let mut replies: HashMap<CommentId, Vec<Comment>> = HashMap::new();
        while let Some(row) = rows.next()? {
            let comment = parse_comment_row(row)?;
            if comment.parent_id == 0 {
                top_level.push(comment);
            } else {
                replies.entry(comment.parent_id).or_default().push(comment);
            }
        }

        // Rows arrive oldest-first; threads are presented newest-first.
        top_level.reverse();
        Ok(top_level
            .into_iter()
            .map(|comment| {
                let replies = replies.remove(&comment.comment_id).unwrap_or_default();
                CommentThread { comment, replies }
            })
            .collect())
    }

    fn create_comment(&self, comment: &NewComment) -> RepoResult<Comment> {
        self.conn.execute(
            "INSERT INTO comments (
                comment_post_id,
                comment_author,
                comment_author_email,
                comment_author_url,
                comment_author_ip,
                comment_date,
                comment_content,
                comment_approved,
                comment_parent,
                user_id
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                COALESCE(?6, strftime('%s', 'now') * 1000),
                ?7, ?8, ?9, ?10
            );",
            params![
                comment.post_id,
                comment.author,
                comment.author_email,
                comment.author_url,
                comment.author_ip,
                comment.date,
                comment.content,
                comment.approved,
                comment.parent_id,
                comment.user_id,
            ],
        )?;
        let id = self.conn.last_insert_rowid();

        let mut stmt = self
            .conn
            .prepare(&format!("{COMMENT_SELECT_SQL} WHERE comment_id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => parse_comment_row(row),
            None => Err(RepoError::InvalidData(format!(
                "comment {id} missing in read-back"
            ))),
        }
    }

    fn set_post_status(&self, id: PostId, status: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE posts
             SET post_status = ?2,
                 post_modified = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![id, status],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "post", id });
        }
        info!("event=post_status module=post status=ok post_id={} post_status={}", id, status);
        Ok(())
    }

    fn delete_post(&self, id: PostId) -> RepoResult<bool> {
        let tx = WriteTx::begin(self.conn)?;
        let relationships = remove_object_relationships(&tx, id)?;
        let changed = tx.execute("DELETE FROM posts WHERE id = ?1;", [id])?;
        tx.commit()?;

        if changed > 0 {
            info!(
                "event=post_delete module=post status=ok post_id={} relationships_removed={}",
                id, relationships
            );
        }
        Ok(changed > 0)
    }
}

fn parse_post_row(row: &Row<'_>) -> RepoResult<Post> {
    Ok(Post {
        id: row.get("id")?,
        author_id: row.get("post_author")?,
        post_type: row.get("post_type")?,
        status: row.get("post_status")?,
        slug: row.get("post_name")?,
        title: row.get("post_title")?,
        content: row.get("post_content")?,
        excerpt: row.get("post_excerpt")?,
        date: row.get("post_date")?,
        modified: row.get("post_modified")?,
        parent_id: row.get("post_parent")?,
        menu_order: row.get("menu_order")?,
        guid: row.get("guid")?,
        comment_status: row.get("comment_status")?,
    })
}

fn parse_comment_row(row: &Row<'_>) -> RepoResult<Comment> {
    Ok(Comment {
        comment_id: row.get("comment_id")?,
        post_id: row.get("comment_post_id")?,
        author: row.get("comment_author")?,
        author_email: row.get("comment_author_email")?,
        author_url: row.get("comment_author_url")?,
        content: row.get("comment_content")?,
        date: row.get("comment_date")?,
        approved: row.get("comment_approved")?,
        parent_id: row.get("comment_parent")?,
        user_id: row.get("user_id")?,
    })
}
