//! Error types for Backlog integration.

/// Error from Backlog API operations.
#[derive(Debug, thiserror::Error)]
pub enum BacklogError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// JSON deserialization error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}
