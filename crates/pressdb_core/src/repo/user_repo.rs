//! User repository and author projections.

use crate::model::user::{AuthorDetail, AuthorSummary, NewUser, User, UserId};
use crate::repo::{ensure_schema_ready, RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT
    id,
    user_login,
    user_nicename,
    user_email,
    user_url,
    display_name,
    user_registered,
    user_status
FROM users";

pub trait UserRepository {
    /// Inserts the user unless `login` is taken; an existing row is returned
    /// unchanged.
    fn upsert_user_by_login(&self, user: &NewUser) -> RepoResult<User>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn find_user_by_login(&self, login: &str) -> RepoResult<Option<User>>;
    fn author_summary(&self, id: UserId) -> RepoResult<Option<AuthorSummary>>;
    fn author_detail(&self, id: UserId) -> RepoResult<Option<AuthorDetail>>;
    /// Deletes the user and, through the store cascade, its meta entries.
    /// Fails with a constraint violation while the user still owns posts.
    fn delete_user(&self, id: UserId) -> RepoResult<bool>;
}

pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["users"])?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn upsert_user_by_login(&self, user: &NewUser) -> RepoResult<User> {
        let created = self.conn.execute(
            "INSERT INTO users (
                user_login,
                user_pass,
                user_nicename,
                user_email,
                user_url,
                display_name
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT (user_login) DO NOTHING;",
            params![
                user.login,
                user.pass_hash,
                user.nicename,
                user.email,
                user.url,
                user.display_name,
            ],
        )?;
        if created > 0 {
            info!("event=user_create module=user status=ok login_len={}", user.login.len());
        }

        self.find_user_by_login(&user.login)?
            .ok_or_else(|| RepoError::InvalidData("upserted user missing in read-back".to_string()))
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }

    fn find_user_by_login(&self, login: &str) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE user_login = ?1;"))?;
        let mut rows = stmt.query([login])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }

    fn author_summary(&self, id: UserId) -> RepoResult<Option<AuthorSummary>> {
        let summary = self
            .conn
            .query_row(
                "SELECT id, display_name, user_nicename FROM users WHERE id = ?1;",
                [id],
                |row| {
                    Ok(AuthorSummary {
                        id: row.get(0)?,
                        display_name: row.get(1)?,
                        nicename: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(summary)
    }

    fn author_detail(&self, id: UserId) -> RepoResult<Option<AuthorDetail>> {
        let detail = self
            .conn
            .query_row(
                "SELECT id, display_name, user_nicename, user_email FROM users WHERE id = ?1;",
                [id],
                |row| {
                    Ok(AuthorDetail {
                        id: row.get(0)?,
                        display_name: row.get(1)?,
                        nicename: row.get(2)?,
                        email: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(detail)
    }

    fn delete_user(&self, id: UserId) -> RepoResult<bool> {
        let changed = self.conn.execute("DELETE FROM users WHERE id = ?1;", [id])?;
        if changed > 0 {
            info!("event=user_delete module=user status=ok user_id={id}");
        }
        Ok(changed > 0)
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    Ok(User {
        id: row.get("id")?,
        login: row.get("user_login")?,
        nicename: row.get("user_nicename")?,
        email: row.get("user_email")?,
        url: row.get("user_url")?,
        display_name: row.get("display_name")?,
        registered: row.get("user_registered")?,
        status: row.get("user_status")?,
    })
}
