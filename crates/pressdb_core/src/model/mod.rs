//! Domain model for the content schema.
//!
//! # Responsibility
//! - Define the read/write shapes shared by repositories and services.
//! - Own the small closed vocabularies (sort fields, sort order, autoload)
//!   and their string parsing.
//!
//! # Invariants
//! - Identifiers are opaque 64-bit integers assigned by the store.
//! - Timestamps are Unix epoch milliseconds.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub mod comment;
pub mod meta;
pub mod option;
pub mod post;
pub mod taxonomy;
pub mod user;

/// Caller-supplied filter value outside the allowed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidFilterValue {
    pub field: &'static str,
    pub value: String,
}

impl InvalidFilterValue {
    pub fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

impl Display for InvalidFilterValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid value `{}` for `{}`", self.value, self.field)
    }
}

impl Error for InvalidFilterValue {}

/// Sort direction shared by post and term listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = InvalidFilterValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(InvalidFilterValue::new("order", value)),
        }
    }
}
