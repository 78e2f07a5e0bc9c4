//! Backlog REST API v2 client.
//!
//! Provides sync HTTP client for the Backlog API, authenticated with an API
//! key passed as the `apiKey` query parameter.

mod attachments;
mod projects;
mod wikis;

use std::time::Duration;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::de::DeserializeOwned;
use ureq::Agent;
use ureq::http::Response;

use crate::error::BacklogError;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Characters escaped in wiki page URLs. `/` stays literal since page names
/// use it for hierarchy.
const PAGE_PATH_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Backlog REST API client.
pub struct BacklogClient {
    agent: Agent,
    base_url: String,
    api_key: String,
}

impl BacklogClient {
    /// Create client for a space.
    ///
    /// # Arguments
    /// * `base_url` - Space URL, e.g. `https://myspace.backlog.jp`
    /// * `api_key` - Personal API key
    #[must_use]
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
        }
    }

    /// Get the API base URL.
    fn api_url(&self) -> String {
        format!("{}/api/v2", self.base_url)
    }

    /// Get the space URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Browser URL of a wiki page.
    #[must_use]
    pub fn page_url(&self, project: &str, page_name: &str) -> String {
        format!(
            "{}/wiki/{}/{}",
            self.base_url,
            utf8_percent_encode(project, PAGE_PATH_ENCODE_SET),
            utf8_percent_encode(page_name, PAGE_PATH_ENCODE_SET)
        )
    }
}

/// Decode a JSON response, mapping error statuses to [`BacklogError::HttpResponse`].
fn read_json<T: DeserializeOwned>(response: Response<ureq::Body>) -> Result<T, BacklogError> {
    let status = response.status().as_u16();
    let mut body_reader = response.into_body();

    if !(200..300).contains(&status) {
        let error_body = body_reader
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(BacklogError::HttpResponse {
            status,
            body: error_body,
        });
    }

    let text = body_reader.read_to_string()?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = BacklogClient::new("https://space.backlog.jp/", "key");
        assert_eq!(client.base_url(), "https://space.backlog.jp");
        assert_eq!(client.api_url(), "https://space.backlog.jp/api/v2");
    }

    #[test]
    fn test_page_url_keeps_slashes() {
        let client = BacklogClient::new("https://space.backlog.jp", "key");

        assert_eq!(
            client.page_url("PROJ", "Design/Screen Spec"),
            "https://space.backlog.jp/wiki/PROJ/Design/Screen%20Spec"
        );
        assert_eq!(
            client.page_url("PROJ", "画面設計"),
            "https://space.backlog.jp/wiki/PROJ/%E7%94%BB%E9%9D%A2%E8%A8%AD%E8%A8%88"
        );
    }
}
