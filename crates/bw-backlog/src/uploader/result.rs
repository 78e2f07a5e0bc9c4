//! Result types for upload operations.

use std::fmt;

/// What kind of item an [`ItemFailure`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// Local image file.
    Image,
    /// Mermaid diagram block.
    Diagram,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => f.write_str("image"),
            Self::Diagram => f.write_str("diagram"),
        }
    }
}

/// An image or diagram that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// Item kind.
    pub kind: ItemKind,
    /// Filename or diagram name.
    pub name: String,
    /// Failure description.
    pub message: String,
}

/// Result of a successful upload.
#[derive(Debug)]
pub struct UploadResult {
    /// Page ID.
    pub page_id: u64,
    /// Page name.
    pub page_name: String,
    /// URL to view the page.
    pub url: String,
    /// Whether the page was newly created.
    pub created: bool,
    /// Distinct image files uploaded.
    pub images_uploaded: usize,
    /// Rendered diagrams uploaded.
    pub diagrams_uploaded: usize,
    /// Distinct attachment names linked to the page.
    pub attachments_linked: usize,
    /// Occurrences rewritten to embed tags.
    pub replacements: usize,
    /// Whether the rewritten content was saved.
    pub rewritten: bool,
    /// Images and diagrams that were skipped.
    pub failures: Vec<ItemFailure>,
    /// Non-fatal problems after the first page write.
    pub warnings: Vec<String>,
}

/// Result of a dry-run (no remote calls, no rendering).
#[derive(Debug)]
pub struct DryRunResult {
    /// Page name that would be written.
    pub page_name: String,
    /// URL the page would have.
    pub url: String,
    /// Image references resolving to local files.
    pub image_references: usize,
    /// Distinct local image files.
    pub image_files: usize,
    /// Mermaid blocks found.
    pub diagram_blocks: usize,
    /// Whether a renderer is available for the blocks.
    pub renders_diagrams: bool,
}
