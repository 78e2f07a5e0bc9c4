//! Wiki store abstraction.
//!
//! [`WikiStore`] is what the upload pipeline talks to. [`BacklogClient`]
//! implements it over HTTP; tests use an in-memory store.

use std::path::Path;

use tracing::info;

use crate::client::BacklogClient;
use crate::error::BacklogError;
use crate::types::{Attachment, LinkedAttachment, Project, WikiPage, WikiSummary};

/// Remote wiki operations used by the upload pipeline.
pub trait WikiStore {
    /// Upload a file to the space attachment area.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogError`] if the file cannot be read or the upload fails.
    fn upload_attachment(&self, path: &Path) -> Result<Attachment, BacklogError>;

    /// List pages of a project.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogError`] if the request fails.
    fn list_pages(&self, project: &str) -> Result<Vec<WikiSummary>, BacklogError>;

    /// Get a page with its content.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogError`] if the request fails.
    fn get_page(&self, page_id: u64) -> Result<WikiPage, BacklogError>;

    /// Get a project by key.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogError`] if the request fails.
    fn get_project(&self, project: &str) -> Result<Project, BacklogError>;

    /// Create a page.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogError`] if the request fails.
    fn create_page(
        &self,
        project_id: u64,
        name: &str,
        content: &str,
    ) -> Result<WikiPage, BacklogError>;

    /// Replace page content wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogError`] if the request fails.
    fn update_page(&self, page_id: u64, content: &str) -> Result<WikiPage, BacklogError>;

    /// Link space attachments to a page, returning page-scoped attachments.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogError`] if the request fails.
    fn link_attachments(
        &self,
        page_id: u64,
        attachment_ids: &[u64],
    ) -> Result<Vec<LinkedAttachment>, BacklogError>;

    /// Browser URL of a page.
    fn page_url(&self, project: &str, page_name: &str) -> String;

    /// Find a page by exact, case-sensitive name.
    ///
    /// Only the matching page is fetched with content.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogError`] if listing or fetching fails.
    fn find_page_by_name(
        &self,
        project: &str,
        name: &str,
    ) -> Result<Option<WikiPage>, BacklogError> {
        let found = self
            .list_pages(project)?
            .into_iter()
            .find(|page| page.name == name);
        match found {
            Some(summary) => Ok(Some(self.get_page(summary.id)?)),
            None => Ok(None),
        }
    }

    /// Resolve a project key or numeric ID to the numeric ID.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogError`] if the project lookup fails.
    fn resolve_project_id(&self, project: &str) -> Result<u64, BacklogError> {
        if let Ok(id) = project.parse::<u64>() {
            return Ok(id);
        }
        Ok(self.get_project(project)?.id)
    }

    /// Replace the content of the named page, creating it if absent.
    ///
    /// Returns the page and whether it was created.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogError`] if any remote call fails.
    fn create_or_update_page(
        &self,
        project: &str,
        name: &str,
        content: &str,
    ) -> Result<(WikiPage, bool), BacklogError> {
        if let Some(existing) = self.find_page_by_name(project, name)? {
            info!(page_id = existing.id, "Updating existing wiki page");
            let page = self.update_page(existing.id, content)?;
            return Ok((page, false));
        }

        let project_id = self.resolve_project_id(project)?;
        let page = self.create_page(project_id, name, content)?;
        info!(page_id = page.id, "Wiki page created");
        Ok((page, true))
    }
}

impl WikiStore for BacklogClient {
    fn upload_attachment(&self, path: &Path) -> Result<Attachment, BacklogError> {
        BacklogClient::upload_attachment(self, path)
    }

    fn list_pages(&self, project: &str) -> Result<Vec<WikiSummary>, BacklogError> {
        BacklogClient::list_pages(self, project)
    }

    fn get_page(&self, page_id: u64) -> Result<WikiPage, BacklogError> {
        BacklogClient::get_page(self, page_id)
    }

    fn get_project(&self, project: &str) -> Result<Project, BacklogError> {
        BacklogClient::get_project(self, project)
    }

    fn create_page(
        &self,
        project_id: u64,
        name: &str,
        content: &str,
    ) -> Result<WikiPage, BacklogError> {
        BacklogClient::create_page(self, project_id, name, content)
    }

    fn update_page(&self, page_id: u64, content: &str) -> Result<WikiPage, BacklogError> {
        BacklogClient::update_page(self, page_id, content)
    }

    fn link_attachments(
        &self,
        page_id: u64,
        attachment_ids: &[u64],
    ) -> Result<Vec<LinkedAttachment>, BacklogError> {
        BacklogClient::link_attachments(self, page_id, attachment_ids)
    }

    fn page_url(&self, project: &str, page_name: &str) -> String {
        BacklogClient::page_url(self, project, page_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockWikiStore, PageWrite};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_page_by_name_is_case_sensitive() {
        let store = MockWikiStore::new().with_page(1, 10, "Guide", "body");

        assert!(store.find_page_by_name("PROJ", "guide").unwrap().is_none());
        let page = store.find_page_by_name("PROJ", "Guide").unwrap().unwrap();
        assert_eq!(page.content, "body");
    }

    #[test]
    fn test_resolve_project_id_numeric_skips_lookup() {
        let store = MockWikiStore::new();

        assert_eq!(store.resolve_project_id("42").unwrap(), 42);
        assert_eq!(store.remote_calls(), 0);
    }

    #[test]
    fn test_resolve_project_id_by_key() {
        let store = MockWikiStore::new().with_project("PROJ", 10);
        assert_eq!(store.resolve_project_id("PROJ").unwrap(), 10);
    }

    #[test]
    fn test_resolve_project_id_unknown_key() {
        let store = MockWikiStore::new();
        let err = store.resolve_project_id("NOPE").unwrap_err();
        assert!(matches!(err, BacklogError::HttpResponse { status: 404, .. }));
    }

    #[test]
    fn test_create_or_update_creates_missing_page() {
        let store = MockWikiStore::new().with_project("PROJ", 10);

        let (page, created) = store.create_or_update_page("PROJ", "New", "text").unwrap();

        assert!(created);
        assert_eq!(page.project_id, 10);
        assert_eq!(
            store.writes(),
            vec![PageWrite::Create {
                name: "New".to_owned(),
                content: "text".to_owned()
            }]
        );
    }

    #[test]
    fn test_create_or_update_updates_existing_page() {
        let store = MockWikiStore::new().with_page(7, 10, "Guide", "old");

        let (page, created) = store.create_or_update_page("PROJ", "Guide", "new").unwrap();

        assert!(!created);
        assert_eq!(page.id, 7);
        assert_eq!(page.content, "new");
        assert_eq!(
            store.writes(),
            vec![PageWrite::Update {
                page_id: 7,
                content: "new".to_owned()
            }]
        );
    }
}
