//! Document summary used by `bw analyze` and dry runs.

use serde::Serialize;

use crate::document::Document;
use crate::scan::resolve_local_path;

/// Maximum characters of diagram source shown in a preview.
const PREVIEW_CHARS: usize = 100;

/// Summary of what an upload would touch.
#[derive(Debug, Serialize)]
pub struct Analysis {
    /// Source file.
    pub file: String,
    /// Page name the upload would use (no override).
    pub page_name: String,
    /// All image references.
    pub total_images: usize,
    /// References resolving to local files.
    pub local_images: usize,
    /// References that are remote or missing.
    pub external_images: usize,
    /// Mermaid blocks.
    pub mermaid_blocks: usize,
    /// Per-reference details.
    pub images: Vec<ImageInfo>,
    /// Diagram sources, truncated.
    pub mermaid_previews: Vec<String>,
}

/// One image reference in an [`Analysis`].
#[derive(Debug, Serialize)]
pub struct ImageInfo {
    /// Alt text.
    pub alt: String,
    /// Path as written.
    pub path: String,
    /// Whether it resolves to a local file.
    pub exists: bool,
}

/// Analyze a document without touching the network.
#[must_use]
pub fn analyze(doc: &Document) -> Analysis {
    let images: Vec<ImageInfo> = doc
        .images()
        .into_iter()
        .map(|img| {
            let exists = resolve_local_path(doc.base_dir(), &img.path).is_some();
            ImageInfo {
                alt: img.alt_text,
                path: img.path,
                exists,
            }
        })
        .collect();
    let local_images = images.iter().filter(|i| i.exists).count();
    let blocks = doc.diagram_blocks();

    Analysis {
        file: doc.path().display().to_string(),
        page_name: doc.page_name(None),
        total_images: images.len(),
        local_images,
        external_images: images.len() - local_images,
        mermaid_blocks: blocks.len(),
        mermaid_previews: blocks.iter().map(|b| preview(&b.source)).collect(),
        images,
    }
}

fn preview(source: &str) -> String {
    if source.chars().count() > PREVIEW_CHARS {
        let head: String = source.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        source.to_owned()
    }
}
