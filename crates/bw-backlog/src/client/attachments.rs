//! Attachment operations for Backlog API.

use std::path::Path;

use rand::RngExt;
use tracing::info;

use super::{BacklogClient, read_json};
use crate::error::BacklogError;
use crate::types::{Attachment, LinkedAttachment};

impl BacklogClient {
    /// Upload a file to the space attachment area.
    ///
    /// The returned id is space-scoped; link it to a page with
    /// [`link_attachments`](Self::link_attachments).
    ///
    /// # Errors
    ///
    /// Returns [`BacklogError::Io`] if the file cannot be read, otherwise
    /// [`BacklogError`] on transport failure or an error status.
    pub fn upload_attachment(&self, path: &Path) -> Result<Attachment, BacklogError> {
        let filename = path
            .file_name()
            .map_or_else(|| "attachment".to_owned(), |n| n.to_string_lossy().into_owned());
        let data = std::fs::read(path)?;
        let url = format!("{}/space/attachment", self.api_url());

        info!(file = %filename, bytes = data.len(), "Uploading attachment");

        // Build multipart form data manually
        let boundary = format!("----BwFormBoundary{:016x}", rand::rng().random::<u64>());
        let body = multipart_body(&boundary, &filename, content_type_for(path), &data);

        let response = self
            .agent
            .post(&url)
            .query("apiKey", &self.api_key)
            .header(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .header("Accept", "application/json")
            .send(&body[..])?;

        let attachment: Attachment = read_json(response)?;
        info!(file = %attachment.name, id = attachment.id, "Attachment uploaded");
        Ok(attachment)
    }

    /// Link uploaded attachments to a wiki page.
    ///
    /// Returns the page-scoped attachments, which replace the space-scoped ids.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogError`] on transport failure or an error status.
    pub fn link_attachments(
        &self,
        page_id: u64,
        attachment_ids: &[u64],
    ) -> Result<Vec<LinkedAttachment>, BacklogError> {
        let url = format!("{}/wikis/{}/attachments", self.api_url(), page_id);
        let ids: Vec<String> = attachment_ids.iter().map(u64::to_string).collect();

        info!(page_id, count = ids.len(), "Linking attachments");

        let response = self
            .agent
            .post(&url)
            .query("apiKey", &self.api_key)
            .header("Accept", "application/json")
            .send_form(ids.iter().map(|id| ("attachmentId[]", id.as_str())))?;

        read_json(response)
    }
}

fn multipart_body(boundary: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let filename = filename.replace('"', "%22");
    let mut body = Vec::with_capacity(data.len() + 256);

    // Add file part
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");

    // End boundary
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

/// Guess a MIME type from the file extension.
fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}
