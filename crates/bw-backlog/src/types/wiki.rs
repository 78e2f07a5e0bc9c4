//! Backlog wiki page types.

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Wiki page with content.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WikiPage {
    /// Page ID.
    pub id: u64,
    /// Owning project ID.
    pub project_id: u64,
    /// Page name (also its path under the project wiki).
    pub name: String,
    /// Markdown content.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    /// Page tags.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
    /// Creation timestamp (ISO 8601).
    #[serde(default, deserialize_with = "null_as_default")]
    pub created: String,
    /// Last update timestamp (ISO 8601).
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated: String,
}

impl WikiPage {
    /// Tag names in API order.
    #[must_use]
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }
}

/// Wiki page tag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Tag {
    /// Tag ID.
    #[serde(default)]
    pub id: u64,
    /// Tag name.
    pub name: String,
}

/// Entry of the wiki page list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WikiSummary {
    /// Page ID.
    pub id: u64,
    /// Page name.
    pub name: String,
}
