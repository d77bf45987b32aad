//! Open-schema key/value attributes attached to posts and users.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Meta entries folded into a key -> value mapping.
pub type MetaMap = BTreeMap<String, String>;

/// Entity owning a set of meta entries.
///
/// Each owner kind is stored in its own table so the store can enforce the
/// owner foreign key and cascade deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum MetaOwner {
    Post(i64),
    User(i64),
}

impl MetaOwner {
    /// Raw owner id, regardless of kind.
    pub fn id(self) -> i64 {
        match self {
            Self::Post(id) | Self::User(id) => id,
        }
    }

    pub(crate) fn table(self) -> &'static str {
        match self {
            Self::Post(_) => "post_meta",
            Self::User(_) => "user_meta",
        }
    }

    pub(crate) fn owner_column(self) -> &'static str {
        match self {
            Self::Post(_) => "post_id",
            Self::User(_) => "user_id",
        }
    }
}

/// One persisted meta row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaEntry {
    pub meta_id: i64,
    pub owner: MetaOwner,
    pub key: String,
    pub value: String,
}
