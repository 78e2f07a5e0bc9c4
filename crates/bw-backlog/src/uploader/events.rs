//! Progress events emitted during an upload.

/// Something the upload pipeline just did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    /// Document scanned.
    Scanned {
        /// Page name that will be written.
        page_name: String,
        /// Image references resolving to local files.
        local_images: usize,
        /// Mermaid blocks found.
        diagrams: usize,
    },
    /// Diagram rendered to an image.
    DiagramRendered {
        /// Block index in the document.
        index: usize,
        /// Output filename.
        file_name: String,
    },
    /// Diagram could not be rendered; its block stays as text.
    DiagramFailed {
        /// Block index in the document.
        index: usize,
        /// Failure description.
        message: String,
    },
    /// First page write finished.
    PageWritten {
        /// Page ID.
        page_id: u64,
        /// Whether the page was newly created.
        created: bool,
    },
    /// File uploaded to the space attachment area.
    AttachmentUploaded {
        /// Uploaded filename.
        file_name: String,
        /// Space attachment ID.
        attachment_id: u64,
    },
    /// Reference reuses an earlier upload of the same file.
    AttachmentReused {
        /// Reference as written in the document.
        reference: String,
        /// Space attachment ID.
        attachment_id: u64,
    },
    /// Upload failed; the reference stays unchanged.
    AttachmentFailed {
        /// Filename that failed.
        file_name: String,
        /// Failure description.
        message: String,
    },
    /// Attachments linked to the page.
    AttachmentsLinked {
        /// Number of linked attachments.
        count: usize,
    },
    /// Linking failed; content will not be rewritten.
    LinkFailed {
        /// Failure description.
        message: String,
    },
    /// Rewritten content saved.
    ContentRewritten {
        /// Occurrences replaced.
        replacements: usize,
    },
    /// Rewritten content could not be saved.
    RewriteFailed {
        /// Failure description.
        message: String,
    },
}

/// Receives [`UploadEvent`]s as they happen.
pub trait ProgressListener {
    /// Handle one event.
    fn on_event(&self, event: &UploadEvent);
}

impl<F: Fn(&UploadEvent)> ProgressListener for F {
    fn on_event(&self, event: &UploadEvent) {
        self(event);
    }
}

/// Listener that ignores every event.
pub(crate) struct Silent;

impl ProgressListener for Silent {
    fn on_event(&self, _event: &UploadEvent) {}
}
