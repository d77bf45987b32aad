//! Content query facade.
//!
//! # Responsibility
//! - Answer the read use-cases of the public site: post listings, single
//!   post by slug, search and per-post terms.
//! - Enrich posts with author, meta, comments and taxonomy memberships.
//!
//! # Invariants
//! - Filter input is validated before any query runs.
//! - Only published posts and approved comments are visible.
//! - Enrichment is per post and lazy: listings skip meta when not requested.

use crate::model::meta::{MetaMap, MetaOwner};
use crate::model::post::{
    PostDetail, PostListItem, PostListQuery, PostSearchItem, PostSortField, SearchQuery,
};
use crate::model::taxonomy::{TermRelationship, TAXONOMY_CATEGORY};
use crate::model::{InvalidFilterValue, SortOrder};
use crate::repo::meta_repo::MetaRepository;
use crate::repo::post_repo::PostRepository;
use crate::repo::taxonomy_repo::TaxonomyRepository;
use crate::repo::user_repo::UserRepository;
use crate::repo::{ErrorKind, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from content query operations.
#[derive(Debug)]
pub enum ContentServiceError {
    /// Caller filter rejected before querying.
    InvalidFilter(InvalidFilterValue),
    /// Repository-level failure.
    Repo(RepoError),
}

impl ContentServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidFilter(_) => ErrorKind::InvalidFilter,
            Self::Repo(err) => err.kind(),
        }
    }
}

impl Display for ContentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFilter(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ContentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidFilter(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ContentServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::InvalidFilter(err) => Self::InvalidFilter(err),
            other => Self::Repo(other),
        }
    }
}

impl From<InvalidFilterValue> for ContentServiceError {
    fn from(value: InvalidFilterValue) -> Self {
        Self::InvalidFilter(value)
    }
}

pub type ContentServiceResult<T> = Result<T, ContentServiceError>;

/// Read facade over posts, users, meta and the taxonomy graph.
pub struct ContentService<P, M, T, U>
where
    P: PostRepository,
    M: MetaRepository,
    T: TaxonomyRepository,
    U: UserRepository,
{
    posts: P,
    meta: M,
    taxonomy: T,
    users: U,
}

impl<P, M, T, U> ContentService<P, M, T, U>
where
    P: PostRepository,
    M: MetaRepository,
    T: TaxonomyRepository,
    U: UserRepository,
{
    pub fn new(posts: P, meta: M, taxonomy: T, users: U) -> Self {
        Self {
            posts,
            meta,
            taxonomy,
            users,
        }
    }

    /// Filtered, paginated listing with author summary, meta and approved
    /// comment count per item.
    pub fn list_posts(&self, query: &PostListQuery) -> ContentServiceResult<Vec<PostListItem>> {
        query.validate()?;
        let posts = self.posts.list_posts(query)?;

        let mut items = Vec::with_capacity(posts.len());
        for post in posts {
            let author = self.users.author_summary(post.author_id)?;
            let meta = if query.include_meta {
                self.meta.get_all(MetaOwner::Post(post.id))?
            } else {
                MetaMap::new()
            };
            let approved_comment_count = self.posts.count_approved_comments(post.id)?;
            items.push(PostListItem {
                post,
                author,
                meta,
                approved_comment_count,
            });
        }
        Ok(items)
    }

    /// Published post of `post_type` with `slug`, fully enriched.
    pub fn get_post_by_slug(
        &self,
        slug: &str,
        post_type: &str,
    ) -> ContentServiceResult<Option<PostDetail>> {
        let Some(post) = self.posts.find_by_slug(slug, post_type)? else {
            return Ok(None);
        };

        let author = self.users.author_detail(post.author_id)?;
        let meta = self.meta.get_all(MetaOwner::Post(post.id))?;
        let comments = self.posts.approved_comment_threads(post.id)?;
        let terms = self.taxonomy.list_relationships_for_object(post.id, None)?;
        Ok(Some(PostDetail {
            post,
            author,
            meta,
            comments,
            terms,
        }))
    }

    /// Substring search over title, content and excerpt of published posts.
    pub fn search(&self, query: &SearchQuery) -> ContentServiceResult<Vec<PostSearchItem>> {
        query.validate()?;
        let posts = self.posts.search_posts(query)?;

        let mut items = Vec::with_capacity(posts.len());
        for post in posts {
            let author = self.users.author_summary(post.author_id)?;
            items.push(PostSearchItem { post, author });
        }
        Ok(items)
    }

    /// Memberships of a post in `taxonomy` (`category` when `None`).
    pub fn get_post_terms(
        &self,
        post_id: i64,
        taxonomy: Option<&str>,
    ) -> ContentServiceResult<Vec<TermRelationship>> {
        self.taxonomy
            .list_relationships_for_object(post_id, Some(taxonomy.unwrap_or(TAXONOMY_CATEGORY)))
            .map_err(Into::into)
    }
}

/// Parses caller-supplied sort strings for [`PostListQuery`].
pub fn parse_post_sort(
    field: &str,
    order: &str,
) -> Result<(PostSortField, SortOrder), InvalidFilterValue> {
    Ok((field.parse()?, order.parse()?))
}
