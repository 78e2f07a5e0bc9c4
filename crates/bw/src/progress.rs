//! Upload progress display.

use bw_backlog::uploader::{ProgressListener, UploadEvent};

use crate::output::Output;

/// Prints upload events as indented progress lines.
pub(crate) struct UploadProgress<'a> {
    output: &'a Output,
}

impl<'a> UploadProgress<'a> {
    pub(crate) fn new(output: &'a Output) -> Self {
        Self { output }
    }
}

impl ProgressListener for UploadProgress<'_> {
    fn on_event(&self, event: &UploadEvent) {
        match describe(event) {
            Some(Line::Info(msg)) => self.output.info(&msg),
            Some(Line::Warning(msg)) => self.output.warning(&msg),
            None => {}
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Line {
    Info(String),
    Warning(String),
}

fn describe(event: &UploadEvent) -> Option<Line> {
    let line = match event {
        UploadEvent::Scanned {
            page_name,
            local_images,
            diagrams,
        } => Line::Info(format!(
            "Page \"{page_name}\": {local_images} local image(s), {diagrams} diagram(s)"
        )),
        UploadEvent::DiagramRendered { file_name, .. } => {
            Line::Info(format!("  Rendered {file_name}"))
        }
        UploadEvent::DiagramFailed { index, message } => {
            Line::Warning(format!("  Diagram #{} failed to render: {message}", index + 1))
        }
        UploadEvent::PageWritten { page_id, created } => {
            let verb = if *created { "Created" } else { "Updated" };
            Line::Info(format!("  {verb} page {page_id}"))
        }
        UploadEvent::AttachmentUploaded { file_name, .. } => {
            Line::Info(format!("  Uploaded {file_name}"))
        }
        UploadEvent::AttachmentReused { .. } => return None,
        UploadEvent::AttachmentFailed { file_name, message } => {
            Line::Warning(format!("  Failed to upload {file_name}: {message}"))
        }
        UploadEvent::AttachmentsLinked { count } => {
            Line::Info(format!("  Linked {count} attachment(s)"))
        }
        UploadEvent::LinkFailed { message } => {
            Line::Warning(format!("  Failed to link attachments: {message}"))
        }
        UploadEvent::ContentRewritten { replacements } => {
            Line::Info(format!("  Rewrote {replacements} reference(s)"))
        }
        UploadEvent::RewriteFailed { message } => {
            Line::Warning(format!("  Failed to save rewritten page: {message}"))
        }
    };
    Some(line)
}
