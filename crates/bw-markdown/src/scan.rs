//! Pattern-based extraction of images, Mermaid blocks and titles.

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// Inline image: `![alt](path)`. A backslash-escaped `\)` stays in the path.
static IMAGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(((?:\\.|[^)\\])+)\)").unwrap());

/// Fenced Mermaid block, lazily matched to the nearest closing fence.
static MERMAID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```mermaid\s*\n(.*?)\n```").unwrap());

/// Top-level heading at the start of a line.
static TITLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#[ \t]+(.+)$").unwrap());

/// Prefixes marking a reference as remote.
const URL_PREFIXES: [&str; 3] = ["http://", "https://", "//"];

/// One occurrence of an inline image in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// Exact matched text, e.g. `![alt](./img.png)`.
    pub original_text: String,
    /// Alt text between the brackets.
    pub alt_text: String,
    /// Referenced path as written.
    pub path: String,
    /// Byte span of `original_text` in the source.
    pub span: Range<usize>,
}

/// A fenced Mermaid code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramBlock {
    /// Exact matched text including both fences.
    pub original_text: String,
    /// Diagram source, trimmed.
    pub source: String,
    /// Byte span of `original_text` in the source.
    pub span: Range<usize>,
}

/// Find all inline images in occurrence order.
///
/// Every occurrence is reported, so a path referenced twice yields two
/// references sharing the same `path`.
#[must_use]
pub fn extract_images(text: &str) -> Vec<ImageReference> {
    IMAGE_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(ImageReference {
                original_text: whole.as_str().to_owned(),
                alt_text: caps[1].to_owned(),
                path: caps[2].to_owned(),
                span: whole.range(),
            })
        })
        .collect()
}

/// Find all ```` ```mermaid ```` blocks in occurrence order.
#[must_use]
pub fn extract_diagram_blocks(text: &str) -> Vec<DiagramBlock> {
    MERMAID_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(DiagramBlock {
                original_text: whole.as_str().to_owned(),
                source: caps[1].trim().to_owned(),
                span: whole.range(),
            })
        })
        .collect()
}

/// Title from the first non-empty `# ` heading, trimmed.
///
/// Later top-level headings are ignored.
#[must_use]
pub fn extract_title(text: &str) -> Option<String> {
    TITLE_PATTERN
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_owned())
        .find(|title| !title.is_empty())
}

/// Resolve an image reference against the document directory.
///
/// Returns `None` for remote references (`http://`, `https://`, `//`) and
/// for paths that do not exist. Existing paths are returned canonicalized.
#[must_use]
pub fn resolve_local_path(base_dir: &Path, reference: &str) -> Option<PathBuf> {
    if URL_PREFIXES
        .iter()
        .any(|prefix| reference.starts_with(prefix))
    {
        return None;
    }
    base_dir.join(reference).canonicalize().ok()
}
