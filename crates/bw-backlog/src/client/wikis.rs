//! Wiki page operations for Backlog API.

use tracing::info;

use super::{BacklogClient, read_json};
use crate::error::BacklogError;
use crate::types::{WikiPage, WikiSummary};

impl BacklogClient {
    /// List wiki pages of a project (names only, no content).
    ///
    /// # Errors
    ///
    /// Returns [`BacklogError`] on transport failure or an error status.
    pub fn list_pages(&self, project: &str) -> Result<Vec<WikiSummary>, BacklogError> {
        let url = format!("{}/wikis", self.api_url());

        info!(project, "Listing wiki pages");

        let response = self
            .agent
            .get(&url)
            .query("apiKey", &self.api_key)
            .query("projectIdOrKey", project)
            .header("Accept", "application/json")
            .call()?;

        read_json(response)
    }

    /// Get wiki page by ID, including content.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogError`] on transport failure or an error status.
    pub fn get_page(&self, page_id: u64) -> Result<WikiPage, BacklogError> {
        let url = format!("{}/wikis/{}", self.api_url(), page_id);

        info!(page_id, "Getting wiki page");

        let response = self
            .agent
            .get(&url)
            .query("apiKey", &self.api_key)
            .header("Accept", "application/json")
            .call()?;

        read_json(response)
    }

    /// Create a wiki page without notifying watchers.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogError`] on transport failure or an error status.
    pub fn create_page(
        &self,
        project_id: u64,
        name: &str,
        content: &str,
    ) -> Result<WikiPage, BacklogError> {
        let url = format!("{}/wikis", self.api_url());
        let project_id = project_id.to_string();

        info!(project_id = %project_id, page = name, "Creating wiki page");

        let response = self
            .agent
            .post(&url)
            .query("apiKey", &self.api_key)
            .header("Accept", "application/json")
            .send_form([
                ("projectId", project_id.as_str()),
                ("name", name),
                ("content", content),
                ("mailNotify", "false"),
            ])?;

        let page: WikiPage = read_json(response)?;
        info!(page_id = page.id, "Created wiki page");
        Ok(page)
    }

    /// Replace the content of a wiki page without notifying watchers.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogError`] on transport failure or an error status.
    pub fn update_page(&self, page_id: u64, content: &str) -> Result<WikiPage, BacklogError> {
        let url = format!("{}/wikis/{}", self.api_url(), page_id);

        info!(page_id, bytes = content.len(), "Updating wiki page");

        let response = self
            .agent
            .patch(&url)
            .query("apiKey", &self.api_key)
            .header("Accept", "application/json")
            .send_form([("content", content), ("mailNotify", "false")])?;

        read_json(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;

    const PAGE_JSON: &str = r##"{"id": 5, "projectId": 10, "name": "Guide", "content": "# Guide", "tags": []}"##;

    fn api_key() -> Matcher {
        Matcher::UrlEncoded("apiKey".into(), "secret".into())
    }

    #[test]
    fn test_list_pages() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/api/v2/wikis")
            .match_query(Matcher::AllOf(vec![
                api_key(),
                Matcher::UrlEncoded("projectIdOrKey".into(), "PROJ".into()),
            ]))
            .with_status(200)
            .with_body(r#"[{"id": 1, "name": "Home"}, {"id": 2, "name": "Guide"}]"#)
            .create();
        let client = BacklogClient::new(&server.url(), "secret");

        let pages = client.list_pages("PROJ").unwrap();

        mock.assert();
        assert_eq!(
            pages,
            vec![
                WikiSummary {
                    id: 1,
                    name: "Home".to_owned()
                },
                WikiSummary {
                    id: 2,
                    name: "Guide".to_owned()
                },
            ]
        );
    }

    #[test]
    fn test_get_page() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/api/v2/wikis/5")
            .match_query(api_key())
            .with_status(200)
            .with_body(PAGE_JSON)
            .create();
        let client = BacklogClient::new(&server.url(), "secret");

        let page = client.get_page(5).unwrap();

        mock.assert();
        assert_eq!(page.name, "Guide");
        assert_eq!(page.content, "# Guide");
    }

    #[test]
    fn test_get_page_not_found() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/api/v2/wikis/5")
            .match_query(api_key())
            .with_status(404)
            .with_body("No wiki")
            .create();
        let client = BacklogClient::new(&server.url(), "secret");

        let err = client.get_page(5).unwrap_err();

        assert!(matches!(err, BacklogError::HttpResponse { status: 404, .. }));
    }

    #[test]
    fn test_create_page_sends_form() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/v2/wikis")
            .match_query(api_key())
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("projectId".into(), "10".into()),
                Matcher::UrlEncoded("name".into(), "Guide".into()),
                Matcher::UrlEncoded("content".into(), "# Guide & more".into()),
                Matcher::UrlEncoded("mailNotify".into(), "false".into()),
            ]))
            .with_status(201)
            .with_body(PAGE_JSON)
            .create();
        let client = BacklogClient::new(&server.url(), "secret");

        let page = client.create_page(10, "Guide", "# Guide & more").unwrap();

        mock.assert();
        assert_eq!(page.id, 5);
    }

    #[test]
    fn test_update_page_uses_patch() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("PATCH", "/api/v2/wikis/5")
            .match_query(api_key())
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("content".into(), "![image][a.png]".into()),
                Matcher::UrlEncoded("mailNotify".into(), "false".into()),
            ]))
            .with_status(200)
            .with_body(PAGE_JSON)
            .create();
        let client = BacklogClient::new(&server.url(), "secret");

        client.update_page(5, "![image][a.png]").unwrap();

        mock.assert();
    }

    #[test]
    fn test_invalid_json_is_json_error() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/api/v2/wikis/5")
            .match_query(api_key())
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create();
        let client = BacklogClient::new(&server.url(), "secret");

        let err = client.get_page(5).unwrap_err();

        assert!(matches!(err, BacklogError::Json(_)));
    }
}
