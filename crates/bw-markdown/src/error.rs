//! Scanner error types.

use std::path::PathBuf;

/// Error while reading or discovering Markdown sources.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Source file or directory does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// I/O error while reading a source.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Invalid include/exclude glob pattern.
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}
