//! CLI error types.

use bw_backlog::uploader::UploadError;
use bw_config::ConfigError;
use bw_markdown::ScanError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Scan(#[from] ScanError),

    #[error("{0}")]
    Upload(#[from] UploadError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),

    #[error("{failed} of {total} file(s) failed")]
    Batch { failed: usize, total: usize },
}
