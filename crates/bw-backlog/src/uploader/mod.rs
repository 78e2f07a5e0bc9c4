//! Markdown upload workflow.
//!
//! This module provides the [`WikiUploader`] struct that encapsulates the
//! entire workflow for publishing a Markdown file to a Backlog wiki page:
//!
//! 1. Read the document and scan it for local images and Mermaid blocks
//! 2. Render diagrams to images in a scratch directory
//! 3. Create or update the page with the original (sanitized) text
//! 4. Upload each distinct image and every rendered diagram
//! 5. Link the uploads to the page
//! 6. Rewrite references to `![image][name]` and save the page again
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use bw_backlog::BacklogClient;
//! use bw_backlog::uploader::{UploadConfig, WikiUploader};
//! use bw_mermaid::{MermaidRenderer, RenderOptions};
//!
//! let client = BacklogClient::new("https://myspace.backlog.jp", "api-key");
//! let renderer = MermaidRenderer::new()?;
//! let config = UploadConfig {
//!     project: "PROJ".to_owned(),
//!     render_options: RenderOptions::default(),
//! };
//! let uploader = WikiUploader::new(&client, config).renderer(&renderer);
//!
//! let result = uploader.upload(Path::new("docs/guide.md"), None)?;
//! println!("{}", result.url);
//! # Ok(())
//! # }
//! ```

mod error;
mod events;
mod executor;
mod result;
pub mod rewrite;
pub mod sanitize;

pub use error::UploadError;
pub use events::{ProgressListener, UploadEvent};
pub use executor::WikiUploader;
pub use result::{DryRunResult, ItemFailure, ItemKind, UploadResult};

use bw_mermaid::RenderOptions;

/// Configuration for uploading Markdown to a wiki.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Project key or numeric ID.
    pub project: String,
    /// Options passed to the diagram renderer.
    pub render_options: RenderOptions,
}
