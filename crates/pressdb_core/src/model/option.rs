//! Site-wide options.

use super::InvalidFilterValue;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Hint telling callers whether an option belongs in the eager-loaded set.
/// Not enforced by the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Autoload {
    #[default]
    Yes,
    No,
}

impl Autoload {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

impl FromStr for Autoload {
    type Err = InvalidFilterValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" | "on" | "true" => Ok(Self::Yes),
            "no" | "off" | "false" => Ok(Self::No),
            _ => Err(InvalidFilterValue::new("autoload", value)),
        }
    }
}

/// One persisted option row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteOption {
    pub name: String,
    pub value: String,
    pub autoload: Autoload,
}
