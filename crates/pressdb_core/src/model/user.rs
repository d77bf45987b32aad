//! Users and the author projections embedded in post read models.

use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// Full user row (password hash excluded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub login: String,
    pub nicename: String,
    pub email: String,
    pub url: String,
    pub display_name: String,
    pub registered: i64,
    pub status: i64,
}

/// Write model for [`crate::repo::user_repo::UserRepository::upsert_user_by_login`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub login: String,
    /// Opaque credential hash; never read back by this crate.
    pub pass_hash: String,
    pub nicename: String,
    pub email: String,
    pub url: String,
    pub display_name: String,
}

/// Author projection used by listings and search hits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: UserId,
    pub display_name: String,
    pub nicename: String,
}

/// Author projection used by single-post detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorDetail {
    pub id: UserId,
    pub display_name: String,
    pub nicename: String,
    pub email: String,
}
