//! Backlog project types.

use serde::Deserialize;

/// Backlog project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Numeric project ID.
    pub id: u64,
    /// Project key (e.g. `PROJ`).
    pub project_key: String,
    /// Display name.
    pub name: String,
}
