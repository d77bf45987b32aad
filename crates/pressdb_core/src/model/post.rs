//! Posts (content objects) and their query/read models.
//!
//! # Invariants
//! - `(post_type, slug)` is unique.
//! - Posts leave the public listings through status transitions
//!   (e.g. `trash`), not deletion.

use super::comment::CommentThread;
use super::meta::MetaMap;
use super::taxonomy::TermRelationship;
use super::user::{AuthorDetail, AuthorSummary, UserId};
use super::{InvalidFilterValue, SortOrder};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub type PostId = i64;

pub const POST_TYPE_POST: &str = "post";
pub const POST_TYPE_PAGE: &str = "page";
pub const STATUS_PUBLISH: &str = "publish";
pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_TRASH: &str = "trash";

const DEFAULT_LIST_LIMIT: i64 = 10;
const DEFAULT_SEARCH_LIMIT: i64 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub post_type: String,
    pub status: String,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    /// Publication time, epoch ms.
    pub date: i64,
    /// Last edit time, epoch ms.
    pub modified: i64,
    /// `0` when the post has no parent.
    pub parent_id: PostId,
    pub menu_order: i64,
    pub guid: String,
    pub comment_status: String,
}

/// Write model for new posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    /// Explicit id for fixtures; `None` lets the store assign one.
    pub id: Option<PostId>,
    pub author_id: UserId,
    pub post_type: String,
    pub status: String,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    /// Epoch ms; `None` stamps the current time.
    pub date: Option<i64>,
    pub parent_id: PostId,
    pub menu_order: i64,
    pub guid: String,
    pub comment_status: String,
}

impl NewPost {
    /// Published `post` with empty body and excerpt.
    pub fn new(author_id: UserId, title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: None,
            author_id,
            post_type: POST_TYPE_POST.to_string(),
            status: STATUS_PUBLISH.to_string(),
            slug: slug.into(),
            title: title.into(),
            content: String::new(),
            excerpt: String::new(),
            date: None,
            parent_id: 0,
            menu_order: 0,
            guid: String::new(),
            comment_status: "open".to_string(),
        }
    }
}

/// Sortable post columns exposed to callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostSortField {
    #[default]
    Date,
    Title,
    Modified,
}

impl PostSortField {
    pub(crate) fn column(self) -> &'static str {
        match self {
            Self::Date => "post_date",
            Self::Title => "post_title",
            Self::Modified => "post_modified",
        }
    }
}

impl FromStr for PostSortField {
    type Err = InvalidFilterValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "title" => Ok(Self::Title),
            "modified" => Ok(Self::Modified),
            _ => Err(InvalidFilterValue::new("sort_field", value)),
        }
    }
}

/// Filter, sort and pagination options for post listings.
///
/// Bounds are signed so out-of-range caller input can be rejected with a
/// typed error instead of wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostListQuery {
    pub post_type: String,
    pub status: String,
    pub limit: i64,
    pub offset: i64,
    pub sort_field: PostSortField,
    pub sort_order: SortOrder,
    pub author_id: Option<UserId>,
    /// Case-insensitive substring matched against title OR content.
    pub search: Option<String>,
    /// Join each item's meta map. Pure listings can skip the extra query.
    pub include_meta: bool,
}

impl Default for PostListQuery {
    fn default() -> Self {
        Self {
            post_type: POST_TYPE_POST.to_string(),
            status: STATUS_PUBLISH.to_string(),
            limit: DEFAULT_LIST_LIMIT,
            offset: 0,
            sort_field: PostSortField::Date,
            sort_order: SortOrder::Desc,
            author_id: None,
            search: None,
            include_meta: true,
        }
    }
}

impl PostListQuery {
    /// Rejects bounds outside the allowed range before any query runs.
    pub fn validate(&self) -> Result<(), InvalidFilterValue> {
        if self.limit < 0 {
            return Err(InvalidFilterValue::new("limit", self.limit.to_string()));
        }
        if self.offset < 0 {
            return Err(InvalidFilterValue::new("offset", self.offset.to_string()));
        }
        Ok(())
    }
}

/// Cross-type search over title, content and excerpt of published posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub post_types: Vec<String>,
    pub limit: i64,
}

impl SearchQuery {
    /// Query over `post` and `page` with the default limit of 20.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            post_types: vec![POST_TYPE_POST.to_string(), POST_TYPE_PAGE.to_string()],
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn validate(&self) -> Result<(), InvalidFilterValue> {
        if self.limit < 0 {
            return Err(InvalidFilterValue::new("limit", self.limit.to_string()));
        }
        Ok(())
    }
}

/// Listing row: post plus author summary, meta and approved comment count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostListItem {
    pub post: Post,
    pub author: Option<AuthorSummary>,
    /// Empty when the listing was requested without meta.
    pub meta: MetaMap,
    pub approved_comment_count: i64,
}

/// Fully enriched single post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetail {
    pub post: Post,
    pub author: Option<AuthorDetail>,
    pub meta: MetaMap,
    /// Approved top-level threads, newest first.
    pub comments: Vec<CommentThread>,
    /// Memberships across every taxonomy.
    pub terms: Vec<TermRelationship>,
}

/// Search row: post plus author summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSearchItem {
    pub post: Post,
    pub author: Option<AuthorSummary>,
}
