//! Terms, taxonomy-scoped terms and object memberships.
//!
//! # Invariants
//! - `(term_id, taxonomy)` is unique.
//! - A term-taxonomy parent lives in the same taxonomy and parent links form
//!   a forest.
//! - `count` equals the number of relationships referencing the row.

use super::{InvalidFilterValue, SortOrder};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub type TermId = i64;
pub type TermTaxonomyId = i64;

pub const TAXONOMY_CATEGORY: &str = "category";
pub const TAXONOMY_TAG: &str = "post_tag";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub term_id: TermId,
    pub name: String,
    pub slug: String,
    pub term_group: i64,
}

/// A term scoped into one taxonomy, joined with its term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermTaxonomy {
    pub term_taxonomy_id: TermTaxonomyId,
    pub taxonomy: String,
    pub description: String,
    pub parent: Option<TermTaxonomyId>,
    pub count: i64,
    pub term: Term,
}

/// Membership of an object in a term-taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRelationship {
    pub object_id: i64,
    pub term_order: i64,
    pub term_taxonomy: TermTaxonomy,
}

/// Sort keys for term listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermOrderBy {
    #[default]
    Name,
    Count,
    Id,
}

impl TermOrderBy {
    pub(crate) fn column(self) -> &'static str {
        match self {
            Self::Name => "t.name COLLATE NOCASE",
            Self::Count => "tt.count",
            Self::Id => "tt.term_taxonomy_id",
        }
    }
}

impl FromStr for TermOrderBy {
    type Err = InvalidFilterValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "count" => Ok(Self::Count),
            "id" => Ok(Self::Id),
            _ => Err(InvalidFilterValue::new("order_by", value)),
        }
    }
}

/// Parent restriction for term listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParentFilter {
    /// No restriction.
    #[default]
    Any,
    /// Only rows without a parent.
    Root,
    /// Only direct children of the given term-taxonomy.
    ChildrenOf(TermTaxonomyId),
}

/// Options for [`crate::repo::taxonomy_repo::TaxonomyRepository::list_terms_by_taxonomy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermListQuery {
    /// Skip rows whose count is zero.
    pub hide_empty: bool,
    pub parent: ParentFilter,
    pub order_by: TermOrderBy,
    pub order: SortOrder,
}

impl Default for TermListQuery {
    fn default() -> Self {
        Self {
            hide_empty: true,
            parent: ParentFilter::Any,
            order_by: TermOrderBy::Name,
            order: SortOrder::Asc,
        }
    }
}

/// Write model for [`crate::service::taxonomy_service::TaxonomyService::insert_term`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTermTaxonomy {
    pub name: String,
    /// Derived from `name` when absent.
    pub slug: Option<String>,
    pub taxonomy: String,
    pub description: String,
    pub parent: Option<TermTaxonomyId>,
}
