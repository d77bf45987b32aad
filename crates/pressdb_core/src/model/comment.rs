//! Post comments and threaded projections.

use super::post::PostId;
use serde::{Deserialize, Serialize};

pub type CommentId = i64;

/// `comment_approved` value for visible comments.
pub const COMMENT_APPROVED: &str = "1";
/// `comment_approved` value for comments awaiting moderation.
pub const COMMENT_PENDING: &str = "0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: CommentId,
    pub post_id: PostId,
    pub author: String,
    pub author_email: String,
    pub author_url: String,
    pub content: String,
    /// Epoch ms.
    pub date: i64,
    /// `"1"` approved, `"0"` pending, or a moderation state such as `"spam"`.
    pub approved: String,
    /// `0` for top-level comments.
    pub parent_id: CommentId,
    /// `0` for anonymous commenters.
    pub user_id: i64,
}

impl Comment {
    pub fn is_approved(&self) -> bool {
        self.approved == COMMENT_APPROVED
    }
}

/// Write model for new comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub post_id: PostId,
    pub author: String,
    pub author_email: String,
    pub author_url: String,
    pub author_ip: String,
    pub content: String,
    pub approved: String,
    pub parent_id: CommentId,
    pub user_id: i64,
    /// Epoch ms; `None` stamps the current time.
    pub date: Option<i64>,
}

impl NewComment {
    /// Approved top-level comment from an anonymous author.
    pub fn new(post_id: PostId, author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            post_id,
            author: author.into(),
            author_email: String::new(),
            author_url: String::new(),
            author_ip: String::new(),
            content: content.into(),
            approved: COMMENT_APPROVED.to_string(),
            parent_id: 0,
            user_id: 0,
            date: None,
        }
    }
}

/// Top-level comment with its approved replies (oldest first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentThread {
    pub comment: Comment,
    pub replies: Vec<Comment>,
}
