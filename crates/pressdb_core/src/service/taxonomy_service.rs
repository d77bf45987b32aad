//! Taxonomy graph use-case service.
//!
//! # Responsibility
//! - Validate term and hierarchy input above the repository layer.
//! - Provide term creation, parent moves, membership and listing operations.
//!
//! # Invariants
//! - A parent must exist and belong to the same taxonomy.
//! - Parent moves must not create cycles.
//! - Slugs are lowercase ASCII words joined by `-`.

use crate::model::taxonomy::{
    NewTermTaxonomy, TermListQuery, TermRelationship, TermTaxonomy, TermTaxonomyId,
    TAXONOMY_CATEGORY,
};
use crate::repo::taxonomy_repo::TaxonomyRepository;
use crate::repo::{ErrorKind, RepoError};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

static NON_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug separator regex"));

/// Errors from taxonomy service operations.
#[derive(Debug)]
pub enum TaxonomyServiceError {
    /// Taxonomy name is blank.
    InvalidTaxonomy,
    /// Term name is blank after trim.
    InvalidName,
    /// Slug has no usable characters after normalization.
    InvalidSlug(String),
    /// The slug is already scoped into this taxonomy.
    TermExists { taxonomy: String, slug: String },
    /// Target term-taxonomy does not exist.
    TermTaxonomyNotFound(TermTaxonomyId),
    /// Parent term-taxonomy does not exist.
    ParentNotFound(TermTaxonomyId),
    /// Parent lives in another taxonomy.
    ParentTaxonomyMismatch {
        parent: TermTaxonomyId,
        expected: String,
        actual: String,
    },
    /// Parent move would create a cycle.
    CycleDetected {
        term_taxonomy_id: TermTaxonomyId,
        parent: TermTaxonomyId,
    },
    /// Repository-level failure.
    Repo(RepoError),
}

impl TaxonomyServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidTaxonomy
            | Self::InvalidName
            | Self::InvalidSlug(_)
            | Self::ParentNotFound(_)
            | Self::ParentTaxonomyMismatch { .. }
            | Self::CycleDetected { .. } => ErrorKind::InvalidFilter,
            Self::TermExists { .. } => ErrorKind::ConstraintViolation,
            Self::TermTaxonomyNotFound(_) => ErrorKind::NotFound,
            Self::Repo(err) => err.kind(),
        }
    }
}

impl Display for TaxonomyServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTaxonomy => write!(f, "taxonomy must not be blank"),
            Self::InvalidName => write!(f, "term name must not be blank"),
            Self::InvalidSlug(slug) => write!(f, "invalid term slug `{slug}`"),
            Self::TermExists { taxonomy, slug } => {
                write!(f, "term `{slug}` already exists in taxonomy `{taxonomy}`")
            }
            Self::TermTaxonomyNotFound(id) => write!(f, "term_taxonomy not found: {id}"),
            Self::ParentNotFound(id) => write!(f, "parent term_taxonomy not found: {id}"),
            Self::ParentTaxonomyMismatch {
                parent,
                expected,
                actual,
            } => write!(
                f,
                "parent {parent} belongs to taxonomy `{actual}`, expected `{expected}`"
            ),
            Self::CycleDetected {
                term_taxonomy_id,
                parent,
            } => write!(
                f,
                "parent change would create cycle: {term_taxonomy_id} under {parent}"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaxonomyServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaxonomyServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                entity: "term_taxonomy",
                id,
            } => Self::TermTaxonomyNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type TaxonomyServiceResult<T> = Result<T, TaxonomyServiceError>;

/// Taxonomy graph service facade.
pub struct TaxonomyService<R: TaxonomyRepository> {
    repo: R,
}

impl<R: TaxonomyRepository> TaxonomyService<R> {
    /// Creates service from repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Scopes a term into a taxonomy, creating the term when its slug is new.
    pub fn insert_term(&self, request: &NewTermTaxonomy) -> TaxonomyServiceResult<TermTaxonomy> {
        let taxonomy = request.taxonomy.trim();
        if taxonomy.is_empty() {
            return Err(TaxonomyServiceError::InvalidTaxonomy);
        }
        let name = request.name.trim();
        if name.is_empty() {
            return Err(TaxonomyServiceError::InvalidName);
        }

        let raw_slug = request.slug.as_deref().unwrap_or(name);
        let slug = slugify(raw_slug);
        if slug.is_empty() {
            return Err(TaxonomyServiceError::InvalidSlug(raw_slug.to_string()));
        }

        if let Some(parent) = request.parent {
            self.ensure_parent_in_taxonomy(parent, taxonomy)?;
        }

        if self.repo.find_term_taxonomy(&slug, taxonomy)?.is_some() {
            return Err(TaxonomyServiceError::TermExists {
                taxonomy: taxonomy.to_string(),
                slug,
            });
        }

        let term = match self.repo.find_term_by_slug(&slug)? {
            Some(term) => term,
            None => self.repo.create_term(name, &slug)?,
        };
        let created = self.repo.create_term_taxonomy(
            term.term_id,
            taxonomy,
            request.description.as_str(),
            request.parent,
        )?;
        info!(
            "event=term_insert module=taxonomy status=ok term_id={} term_taxonomy_id={}",
            term.term_id, created.term_taxonomy_id
        );
        Ok(created)
    }

    pub fn get_term_taxonomy(
        &self,
        term_taxonomy_id: TermTaxonomyId,
    ) -> TaxonomyServiceResult<Option<TermTaxonomy>> {
        self.repo
            .get_term_taxonomy(term_taxonomy_id)
            .map_err(Into::into)
    }

    pub fn find_term(
        &self,
        slug: &str,
        taxonomy: &str,
    ) -> TaxonomyServiceResult<Option<TermTaxonomy>> {
        self.repo
            .find_term_taxonomy(slug, taxonomy)
            .map_err(Into::into)
    }

    /// Moves a term-taxonomy under `parent`, or to the root with `None`.
    pub fn set_parent(
        &self,
        term_taxonomy_id: TermTaxonomyId,
        parent: Option<TermTaxonomyId>,
    ) -> TaxonomyServiceResult<()> {
        let node = self
            .repo
            .get_term_taxonomy(term_taxonomy_id)?
            .ok_or(TaxonomyServiceError::TermTaxonomyNotFound(term_taxonomy_id))?;

        if let Some(parent) = parent {
            if parent == term_taxonomy_id {
                return Err(TaxonomyServiceError::CycleDetected {
                    term_taxonomy_id,
                    parent,
                });
            }
            self.ensure_parent_in_taxonomy(parent, &node.taxonomy)?;
            if self.would_create_cycle(term_taxonomy_id, parent)? {
                return Err(TaxonomyServiceError::CycleDetected {
                    term_taxonomy_id,
                    parent,
                });
            }
        }

        // The repository re-checks inside its write transaction.
        self.repo
            .update_parent(term_taxonomy_id, parent)
            .map_err(|err| match err {
                RepoError::InvalidFilter(_) => TaxonomyServiceError::CycleDetected {
                    term_taxonomy_id,
                    parent: parent.unwrap_or_default(),
                },
                other => other.into(),
            })
    }

    /// Lists a taxonomy's terms. See [`TermListQuery`] for defaults.
    pub fn list_terms(
        &self,
        taxonomy: &str,
        query: &TermListQuery,
    ) -> TaxonomyServiceResult<Vec<TermTaxonomy>> {
        self.repo
            .list_terms_by_taxonomy(taxonomy, query)
            .map_err(Into::into)
    }

    /// Memberships of `object_id` in `taxonomy` (`category` when `None`).
    pub fn object_terms(
        &self,
        object_id: i64,
        taxonomy: Option<&str>,
    ) -> TaxonomyServiceResult<Vec<TermRelationship>> {
        self.repo
            .list_relationships_for_object(object_id, Some(taxonomy.unwrap_or(TAXONOMY_CATEGORY)))
            .map_err(Into::into)
    }

    /// Memberships of `object_id` across every taxonomy.
    pub fn all_object_terms(&self, object_id: i64) -> TaxonomyServiceResult<Vec<TermRelationship>> {
        self.repo
            .list_relationships_for_object(object_id, None)
            .map_err(Into::into)
    }

    pub fn attach(
        &self,
        object_id: i64,
        term_taxonomy_id: TermTaxonomyId,
        term_order: i64,
    ) -> TaxonomyServiceResult<bool> {
        self.repo
            .attach(object_id, term_taxonomy_id, term_order)
            .map_err(Into::into)
    }

    pub fn detach(
        &self,
        object_id: i64,
        term_taxonomy_id: TermTaxonomyId,
    ) -> TaxonomyServiceResult<bool> {
        self.repo
            .detach(object_id, term_taxonomy_id)
            .map_err(Into::into)
    }

    /// Replaces the memberships of `object_id` within `taxonomy`. Order in
    /// `term_taxonomy_ids` becomes `term_order`.
    pub fn set_object_terms(
        &self,
        object_id: i64,
        taxonomy: &str,
        term_taxonomy_ids: &[TermTaxonomyId],
    ) -> TaxonomyServiceResult<()> {
        if taxonomy.trim().is_empty() {
            return Err(TaxonomyServiceError::InvalidTaxonomy);
        }
        self.repo
            .set_object_terms(object_id, taxonomy, term_taxonomy_ids)
            .map_err(Into::into)
    }

    pub fn recount(&self, term_taxonomy_id: TermTaxonomyId) -> TaxonomyServiceResult<i64> {
        self.repo.recount(term_taxonomy_id).map_err(Into::into)
    }

    /// Deletes a term-taxonomy; direct children move to its parent.
    pub fn delete_term(&self, term_taxonomy_id: TermTaxonomyId) -> TaxonomyServiceResult<bool> {
        self.repo
            .delete_term_taxonomy(term_taxonomy_id)
            .map_err(Into::into)
    }

    fn ensure_parent_in_taxonomy(
        &self,
        parent: TermTaxonomyId,
        taxonomy: &str,
    ) -> TaxonomyServiceResult<()> {
        let parent_row = self
            .repo
            .get_term_taxonomy(parent)?
            .ok_or(TaxonomyServiceError::ParentNotFound(parent))?;
        if parent_row.taxonomy != taxonomy {
            return Err(TaxonomyServiceError::ParentTaxonomyMismatch {
                parent,
                expected: taxonomy.to_string(),
                actual: parent_row.taxonomy,
            });
        }
        Ok(())
    }

    fn would_create_cycle(
        &self,
        term_taxonomy_id: TermTaxonomyId,
        candidate_parent: TermTaxonomyId,
    ) -> TaxonomyServiceResult<bool> {
        let mut visited = HashSet::new();
        let mut cursor = Some(candidate_parent);
        while let Some(current) = cursor {
            if current == term_taxonomy_id {
                return Ok(true);
            }
            if !visited.insert(current) {
                return Ok(true);
            }

            let node = self
                .repo
                .get_term_taxonomy(current)?
                .ok_or(TaxonomyServiceError::ParentNotFound(current))?;
            cursor = node.parent;
        }
        Ok(false)
    }
}

/// Lowercases `value` and joins its ASCII alphanumeric runs with `-`.
pub fn slugify(value: &str) -> String {
    let lowered = value.trim().to_ascii_lowercase();
    NON_SLUG_RE
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
