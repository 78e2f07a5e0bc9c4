//! Project operations for Backlog API.

use tracing::info;

use super::{BacklogClient, read_json};
use crate::error::BacklogError;
use crate::types::Project;

impl BacklogClient {
    /// Get project by key or numeric ID.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogError::HttpResponse`] with status 404 for an unknown key.
    pub fn get_project(&self, project: &str) -> Result<Project, BacklogError> {
        let url = format!("{}/projects/{}", self.api_url(), project);

        info!(project, "Getting project");

        let response = self
            .agent
            .get(&url)
            .query("apiKey", &self.api_key)
            .header("Accept", "application/json")
            .call()?;

        read_json(response)
    }
}
