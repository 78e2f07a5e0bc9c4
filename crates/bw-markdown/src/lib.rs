//! Markdown scanning for the Backlog Wiki uploader.
//!
//! Finds the pieces of a document that need remote resources:
//! - [`extract_images`]: inline images `![alt](path)`
//! - [`extract_diagram_blocks`]: fenced ```` ```mermaid ```` blocks
//! - [`extract_title`]: first `# ` heading
//!
//! All extractors are pure functions from text to match records with byte
//! spans. Malformed syntax is never an error, it simply does not match.
//!
//! [`Document`] wraps a source file with its base directory so local image
//! references can be resolved, and [`discover`] finds Markdown files for
//! batch uploads.

mod analysis;
pub mod discover;
mod document;
mod error;
mod scan;

pub use analysis::{Analysis, ImageInfo, analyze};
pub use discover::{DiscoverOptions, find_markdown_files};
pub use document::Document;
pub use error::ScanError;
pub use scan::{
    DiagramBlock, ImageReference, extract_diagram_blocks, extract_images, extract_title,
    resolve_local_path,
};
