//! Wiki uploader implementation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use bw_markdown::{DiagramBlock, Document, ImageReference};
use bw_mermaid::{DiagramRenderer, diagram_file_stem};
use tracing::{info, warn};

use crate::store::WikiStore;

use super::UploadConfig;
use super::error::UploadError;
use super::events::{ProgressListener, Silent, UploadEvent};
use super::result::{DryRunResult, ItemFailure, ItemKind, UploadResult};
use super::rewrite::{Replacement, rewrite_references};
use super::sanitize::remove_emojis;

/// Diagram rendered into the scratch directory.
struct RenderedDiagram {
    original_text: String,
    path: PathBuf,
}

/// Uploads collected for linking and rewriting.
#[derive(Default)]
struct Uploads {
    attachment_ids: Vec<u64>,
    replacements: Vec<Replacement>,
    images: usize,
    diagrams: usize,
}

/// Publishes Markdown files to Backlog wiki pages.
pub struct WikiUploader<'a> {
    store: &'a dyn WikiStore,
    renderer: Option<&'a dyn DiagramRenderer>,
    listener: &'a dyn ProgressListener,
    config: UploadConfig,
}

impl<'a> WikiUploader<'a> {
    /// Create an uploader without a diagram renderer.
    #[must_use]
    pub fn new(store: &'a dyn WikiStore, config: UploadConfig) -> Self {
        Self {
            store,
            renderer: None,
            listener: &Silent,
            config,
        }
    }

    /// Render Mermaid blocks with `renderer`.
    ///
    /// Without one, blocks are left as code in the page.
    #[must_use]
    pub fn renderer(mut self, renderer: &'a dyn DiagramRenderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Report progress to `listener`.
    #[must_use]
    pub fn listener(mut self, listener: &'a dyn ProgressListener) -> Self {
        self.listener = listener;
        self
    }

    /// Upload a Markdown file to the wiki.
    ///
    /// The page is written twice: once with the original text so it exists,
    /// then again with image and diagram references rewritten to embeds of
    /// the linked attachments. The second write is skipped when nothing was
    /// linked.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the document cannot be read
    /// - the scratch directory cannot be created
    /// - the first page write (or the lookups before it) fails
    ///
    /// Failures after the first write are reported in the result.
    pub fn upload(
        &self,
        path: &Path,
        page_name: Option<&str>,
    ) -> Result<UploadResult, UploadError> {
        let doc = Document::read(path)?;
        let page_name = doc.page_name(page_name);
        info!(file = %path.display(), page = %page_name, "Uploading document");

        let images = doc.local_images();
        let blocks = doc.diagram_blocks();
        self.emit(UploadEvent::Scanned {
            page_name: page_name.clone(),
            local_images: images.len(),
            diagrams: blocks.len(),
        });

        let mut failures = Vec::new();
        let mut warnings = Vec::new();

        let scratch = match self.renderer {
            Some(_) if !blocks.is_empty() => Some(
                tempfile::Builder::new()
                    .prefix("bw-diagrams-")
                    .tempdir()?,
            ),
            _ => None,
        };
        let diagrams = match (self.renderer, &scratch) {
            (Some(renderer), Some(dir)) => {
                self.render_diagrams(renderer, &blocks, dir.path(), &mut failures)
            }
            _ => {
                if !blocks.is_empty() {
                    warn!(count = blocks.len(), "No diagram renderer, leaving Mermaid blocks as code");
                }
                Vec::new()
            }
        };

        let (page, created) = self.store.create_or_update_page(
            &self.config.project,
            &page_name,
            &remove_emojis(doc.text()),
        )?;
        self.emit(UploadEvent::PageWritten {
            page_id: page.id,
            created,
        });

        let mut uploads = Uploads::default();
        self.upload_images(&images, &mut uploads, &mut failures);
        self.upload_diagrams(&diagrams, &mut uploads, &mut failures);

        let linked = self.link(page.id, &uploads.attachment_ids, &mut warnings);

        let mut rewritten = false;
        let mut replacements = 0;
        if !linked.is_empty() {
            let rewrite = rewrite_references(doc.text(), &uploads.replacements, &linked);
            match self
                .store
                .update_page(page.id, &remove_emojis(&rewrite.content))
            {
                Ok(_) => {
                    rewritten = true;
                    replacements = rewrite.replacements;
                    info!(page_id = page.id, replacements, "Rewrote attachment references");
                    self.emit(UploadEvent::ContentRewritten { replacements });
                }
                Err(e) => {
                    warn!(page_id = page.id, error = %e, "Failed to save rewritten content");
                    warnings.push(format!("Failed to save rewritten content: {e}"));
                    self.emit(UploadEvent::RewriteFailed {
                        message: e.to_string(),
                    });
                }
            }
        }

        if let Some(dir) = scratch
            && let Err(e) = dir.close()
        {
            warn!(error = %e, "Failed to remove scratch directory");
        }

        Ok(UploadResult {
            page_id: page.id,
            url: self.store.page_url(&self.config.project, &page_name),
            page_name,
            created,
            images_uploaded: uploads.images,
            diagrams_uploaded: uploads.diagrams,
            attachments_linked: linked.len(),
            replacements,
            rewritten,
            failures,
            warnings,
        })
    }

    /// Report what an upload would do, without rendering or remote calls.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Scan`] if the document cannot be read.
    pub fn dry_run(
        &self,
        path: &Path,
        page_name: Option<&str>,
    ) -> Result<DryRunResult, UploadError> {
        let doc = Document::read(path)?;
        let page_name = doc.page_name(page_name);
        let images = doc.local_images();
        let mut files: Vec<&PathBuf> = images.iter().map(|(_, resolved)| resolved).collect();
        files.sort();
        files.dedup();

        Ok(DryRunResult {
            url: self.store.page_url(&self.config.project, &page_name),
            page_name,
            image_references: images.len(),
            image_files: files.len(),
            diagram_blocks: doc.diagram_blocks().len(),
            renders_diagrams: self.renderer.is_some(),
        })
    }

    fn emit(&self, event: UploadEvent) {
        self.listener.on_event(&event);
    }

    fn render_diagrams(
        &self,
        renderer: &dyn DiagramRenderer,
        blocks: &[DiagramBlock],
        output_dir: &Path,
        failures: &mut Vec<ItemFailure>,
    ) -> Vec<RenderedDiagram> {
        let items: Vec<(String, String)> = blocks
            .iter()
            .enumerate()
            .map(|(i, block)| (block.source.clone(), diagram_file_stem(&block.source, i)))
            .collect();
        let results = renderer.render_many(&items, output_dir, &self.config.render_options);

        let mut rendered = Vec::new();
        for (index, ((block, (_, name)), result)) in
            blocks.iter().zip(&items).zip(results).enumerate()
        {
            match result {
                Ok(path) => {
                    self.emit(UploadEvent::DiagramRendered {
                        index,
                        file_name: file_name(&path),
                    });
                    rendered.push(RenderedDiagram {
                        original_text: block.original_text.clone(),
                        path,
                    });
                }
                Err(e) => {
                    warn!(diagram = %name, error = %e, "Failed to render diagram");
                    self.emit(UploadEvent::DiagramFailed {
                        index,
                        message: e.to_string(),
                    });
                    failures.push(ItemFailure {
                        kind: ItemKind::Diagram,
                        name: name.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }
        rendered
    }

    /// Upload each distinct image file once; every reference to it shares the attachment.
    fn upload_images(
        &self,
        images: &[(ImageReference, PathBuf)],
        uploads: &mut Uploads,
        failures: &mut Vec<ItemFailure>,
    ) {
        // resolved path -> attachment (None if the upload failed)
        let mut seen: HashMap<&Path, Option<(u64, String)>> = HashMap::new();

        for (reference, resolved) in images {
            if let Some(previous) = seen.get(resolved.as_path()) {
                if let Some((id, name)) = previous {
                    self.emit(UploadEvent::AttachmentReused {
                        reference: reference.original_text.clone(),
                        attachment_id: *id,
                    });
                    uploads.replacements.push(Replacement {
                        original_text: reference.original_text.clone(),
                        attachment_name: name.clone(),
                    });
                }
                continue;
            }

            match self.store.upload_attachment(resolved) {
                Ok(attachment) => {
                    self.emit(UploadEvent::AttachmentUploaded {
                        file_name: attachment.name.clone(),
                        attachment_id: attachment.id,
                    });
                    uploads.attachment_ids.push(attachment.id);
                    uploads.images += 1;
                    uploads.replacements.push(Replacement {
                        original_text: reference.original_text.clone(),
                        attachment_name: attachment.name.clone(),
                    });
                    seen.insert(resolved.as_path(), Some((attachment.id, attachment.name)));
                }
                Err(e) => {
                    let name = file_name(resolved);
                    warn!(file = %name, error = %e, "Failed to upload image");
                    self.emit(UploadEvent::AttachmentFailed {
                        file_name: name.clone(),
                        message: e.to_string(),
                    });
                    failures.push(ItemFailure {
                        kind: ItemKind::Image,
                        name,
                        message: e.to_string(),
                    });
                    seen.insert(resolved.as_path(), None);
                }
            }
        }
    }

    fn upload_diagrams(
        &self,
        diagrams: &[RenderedDiagram],
        uploads: &mut Uploads,
        failures: &mut Vec<ItemFailure>,
    ) {
        for diagram in diagrams {
            match self.store.upload_attachment(&diagram.path) {
                Ok(attachment) => {
                    self.emit(UploadEvent::AttachmentUploaded {
                        file_name: attachment.name.clone(),
                        attachment_id: attachment.id,
                    });
                    uploads.attachment_ids.push(attachment.id);
                    uploads.diagrams += 1;
                    uploads.replacements.push(Replacement {
                        original_text: diagram.original_text.clone(),
                        attachment_name: attachment.name,
                    });
                }
                Err(e) => {
                    let name = file_name(&diagram.path);
                    warn!(file = %name, error = %e, "Failed to upload diagram");
                    self.emit(UploadEvent::AttachmentFailed {
                        file_name: name.clone(),
                        message: e.to_string(),
                    });
                    failures.push(ItemFailure {
                        kind: ItemKind::Diagram,
                        name,
                        message: e.to_string(),
                    });
                }
            }
        }
    }

    /// Link uploads to the page, returning attachment name -> page-scoped id.
    ///
    /// A failure yields an empty map, which skips the rewrite.
    fn link(
        &self,
        page_id: u64,
        attachment_ids: &[u64],
        warnings: &mut Vec<String>,
    ) -> HashMap<String, u64> {
        let mut unique = Vec::with_capacity(attachment_ids.len());
        for id in attachment_ids {
            if !unique.contains(id) {
                unique.push(*id);
            }
        }
        if unique.is_empty() {
            return HashMap::new();
        }

        match self.store.link_attachments(page_id, &unique) {
            Ok(linked) => {
                info!(page_id, count = linked.len(), "Linked attachments");
                self.emit(UploadEvent::AttachmentsLinked {
                    count: linked.len(),
                });
                linked.into_iter().map(|a| (a.name, a.id)).collect()
            }
            Err(e) => {
                warn!(page_id, error = %e, "Failed to link attachments");
                warnings.push(format!("Failed to link attachments: {e}"));
                self.emit(UploadEvent::LinkFailed {
                    message: e.to_string(),
                });
                HashMap::new()
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
