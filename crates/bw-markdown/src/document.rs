//! Markdown source document.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::ScanError;
use crate::scan::{
    DiagramBlock, ImageReference, extract_diagram_blocks, extract_images, extract_title,
    resolve_local_path,
};

/// A Markdown file read into memory.
///
/// The text is never modified; rewrites produce new strings.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    base_dir: PathBuf,
    text: String,
}

impl Document {
    /// Read a document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NotFound`] if the file does not exist and
    /// [`ScanError::Io`] for any other read failure.
    pub fn read(path: &Path) -> Result<Self, ScanError> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                ScanError::NotFound(path.to_path_buf())
            } else {
                ScanError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Ok(Self::from_text(path, text))
    }

    /// Create a document from in-memory text.
    ///
    /// `path` is only used to derive the base directory and filename stem.
    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let path = path.into();
        let base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self {
            path,
            base_dir,
            text: text.into(),
        }
    }

    /// Source path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory relative image references are resolved against.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Raw text as read.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Title from the first `# ` heading.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        extract_title(&self.text)
    }

    /// Filename without extension.
    #[must_use]
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Page name: explicit override, else title, else filename stem.
    #[must_use]
    pub fn page_name(&self, override_name: Option<&str>) -> String {
        override_name
            .filter(|name| !name.trim().is_empty())
            .map(str::to_owned)
            .or_else(|| self.title())
            .unwrap_or_else(|| self.stem())
    }

    /// All image references, local or not.
    #[must_use]
    pub fn images(&self) -> Vec<ImageReference> {
        extract_images(&self.text)
    }

    /// Image references that resolve to existing local files.
    #[must_use]
    pub fn local_images(&self) -> Vec<(ImageReference, PathBuf)> {
        self.images()
            .into_iter()
            .filter_map(|img| {
                let resolved = resolve_local_path(&self.base_dir, &img.path);
                if resolved.is_none() {
                    tracing::debug!(path = %img.path, "Skipping unresolved or remote image");
                }
                resolved.map(|path| (img, path))
            })
            .collect()
    }

    /// Mermaid blocks.
    #[must_use]
    pub fn diagram_blocks(&self) -> Vec<DiagramBlock> {
        extract_diagram_blocks(&self.text)
    }
}
