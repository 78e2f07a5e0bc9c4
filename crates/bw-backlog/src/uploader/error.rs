//! Error types for upload operations.

use bw_markdown::ScanError;

use crate::error::BacklogError;

/// Error that aborts an upload.
///
/// Only failures up to and including the first page write are fatal; later
/// per-item problems are reported in the result instead.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Source document could not be read.
    #[error("{0}")]
    Scan(#[from] ScanError),

    /// Backlog API error.
    #[error("Backlog API error: {0}")]
    Remote(#[from] BacklogError),

    /// IO error (scratch directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
