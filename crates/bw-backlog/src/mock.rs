//! Mock wiki store for testing.
//!
//! Provides [`MockWikiStore`] for unit testing the upload pipeline without a
//! Backlog server.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::error::BacklogError;
use crate::store::WikiStore;
use crate::types::{Attachment, LinkedAttachment, Project, WikiPage, WikiSummary};

/// Offset added to space attachment ids when they are linked to a page.
const LINKED_ID_OFFSET: u64 = 1000;

/// Page write recorded by [`MockWikiStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageWrite {
    /// `create_page` call.
    Create {
        /// Page name.
        name: String,
        /// Content sent.
        content: String,
    },
    /// `update_page` call.
    Update {
        /// Target page.
        page_id: u64,
        /// Content sent.
        content: String,
    },
}

impl PageWrite {
    /// Content sent by this write.
    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::Create { content, .. } | Self::Update { content, .. } => content,
        }
    }
}

/// In-memory wiki store that records every call.
///
/// Use the builder methods to seed projects and pages or inject failures.
///
/// # Example
///
/// ```ignore
/// use bw_backlog::{MockWikiStore, WikiStore};
///
/// let store = MockWikiStore::new()
///     .with_project("PROJ", 10)
///     .with_page(1, 10, "Guide", "# Guide");
///
/// let page = store.find_page_by_name("PROJ", "Guide").unwrap();
/// assert!(page.is_some());
/// ```
///
/// # Panics
///
/// Methods panic if an internal lock is poisoned.
#[derive(Debug, Default)]
pub struct MockWikiStore {
    projects: HashMap<String, u64>,
    failing_uploads: HashSet<String>,
    fail_link: bool,
    fail_updates: bool,
    pages: RwLock<Vec<WikiPage>>,
    attachments: RwLock<HashMap<u64, String>>,
    uploads: RwLock<Vec<PathBuf>>,
    writes: RwLock<Vec<PageWrite>>,
    links: RwLock<Vec<(u64, Vec<u64>)>>,
    next_id: AtomicU64,
    calls: AtomicUsize,
}

impl MockWikiStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            ..Default::default()
        }
    }

    /// Register a project key.
    #[must_use]
    pub fn with_project(mut self, key: &str, id: u64) -> Self {
        self.projects.insert(key.to_owned(), id);
        self
    }

    /// Seed an existing page.
    #[must_use]
    pub fn with_page(self, id: u64, project_id: u64, name: &str, content: &str) -> Self {
        self.pages.write().unwrap().push(WikiPage {
            id,
            project_id,
            name: name.to_owned(),
            content: content.to_owned(),
            tags: Vec::new(),
            created: String::new(),
            updated: String::new(),
        });
        self
    }

    /// Make uploads of files with this name fail.
    #[must_use]
    pub fn failing_upload(mut self, file_name: &str) -> Self {
        self.failing_uploads.insert(file_name.to_owned());
        self
    }

    /// Make `link_attachments` fail.
    #[must_use]
    pub fn failing_link(mut self) -> Self {
        self.fail_link = true;
        self
    }

    /// Make `update_page` fail.
    #[must_use]
    pub fn failing_updates(mut self) -> Self {
        self.fail_updates = true;
        self
    }

    /// Files passed to successful uploads, in call order.
    #[must_use]
    pub fn uploads(&self) -> Vec<PathBuf> {
        self.uploads.read().unwrap().clone()
    }

    /// Page writes, in call order.
    #[must_use]
    pub fn writes(&self) -> Vec<PageWrite> {
        self.writes.read().unwrap().clone()
    }

    /// `(page_id, attachment_ids)` of each link call.
    #[must_use]
    pub fn links(&self) -> Vec<(u64, Vec<u64>)> {
        self.links.read().unwrap().clone()
    }

    /// Number of remote operations attempted.
    #[must_use]
    pub fn remote_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn injected(body: &str) -> BacklogError {
        BacklogError::HttpResponse {
            status: 500,
            body: body.to_owned(),
        }
    }

    fn not_found(what: &str) -> BacklogError {
        BacklogError::HttpResponse {
            status: 404,
            body: format!("{what} not found"),
        }
    }
}

impl WikiStore for MockWikiStore {
    fn upload_attachment(&self, path: &Path) -> Result<Attachment, BacklogError> {
        self.record_call();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.failing_uploads.contains(&name) {
            return Err(Self::injected("upload rejected"));
        }
        let size = std::fs::metadata(path)?.len();

        let id = self.next_id();
        self.attachments.write().unwrap().insert(id, name.clone());
        self.uploads.write().unwrap().push(path.to_path_buf());
        Ok(Attachment { id, name, size })
    }

    fn list_pages(&self, _project: &str) -> Result<Vec<WikiSummary>, BacklogError> {
        self.record_call();
        Ok(self
            .pages
            .read()
            .unwrap()
            .iter()
            .map(|p| WikiSummary {
                id: p.id,
                name: p.name.clone(),
            })
            .collect())
    }

    fn get_page(&self, page_id: u64) -> Result<WikiPage, BacklogError> {
        self.record_call();
        self.pages
            .read()
            .unwrap()
            .iter()
            .find(|p| p.id == page_id)
            .cloned()
            .ok_or_else(|| Self::not_found("page"))
    }

    fn get_project(&self, project: &str) -> Result<Project, BacklogError> {
        self.record_call();
        self.projects
            .get(project)
            .map(|&id| Project {
                id,
                project_key: project.to_owned(),
                name: project.to_owned(),
            })
            .ok_or_else(|| Self::not_found("project"))
    }

    fn create_page(
        &self,
        project_id: u64,
        name: &str,
        content: &str,
    ) -> Result<WikiPage, BacklogError> {
        self.record_call();
        self.writes.write().unwrap().push(PageWrite::Create {
            name: name.to_owned(),
            content: content.to_owned(),
        });
        let page = WikiPage {
            id: self.next_id() + 100,
            project_id,
            name: name.to_owned(),
            content: content.to_owned(),
            tags: Vec::new(),
            created: String::new(),
            updated: String::new(),
        };
        self.pages.write().unwrap().push(page.clone());
        Ok(page)
    }

    fn update_page(&self, page_id: u64, content: &str) -> Result<WikiPage, BacklogError> {
        self.record_call();
        self.writes.write().unwrap().push(PageWrite::Update {
            page_id,
            content: content.to_owned(),
        });
        if self.fail_updates {
            return Err(Self::injected("update rejected"));
        }
        let mut pages = self.pages.write().unwrap();
        let page = pages
            .iter_mut()
            .find(|p| p.id == page_id)
            .ok_or_else(|| Self::not_found("page"))?;
        content.clone_into(&mut page.content);
        Ok(page.clone())
    }

    fn link_attachments(
        &self,
        page_id: u64,
        attachment_ids: &[u64],
    ) -> Result<Vec<LinkedAttachment>, BacklogError> {
        self.record_call();
        self.links
            .write()
            .unwrap()
            .push((page_id, attachment_ids.to_vec()));
        if self.fail_link {
            return Err(Self::injected("link rejected"));
        }
        let attachments = self.attachments.read().unwrap();
        attachment_ids
            .iter()
            .map(|id| {
                attachments
                    .get(id)
                    .map(|name| LinkedAttachment {
                        id: id + LINKED_ID_OFFSET,
                        name: name.clone(),
                    })
                    .ok_or_else(|| Self::not_found("attachment"))
            })
            .collect()
    }

    fn page_url(&self, project: &str, page_name: &str) -> String {
        format!("https://mock.backlog.test/wiki/{project}/{page_name}")
    }
}
