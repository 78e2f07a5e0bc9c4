//! Markdown file discovery for batch uploads.
//!
//! Walks a directory and returns Markdown files filtered by include and
//! exclude glob patterns. Patterns match either the path relative to the
//! root (using `/` separators) or the bare filename.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::error::ScanError;

/// Extensions treated as Markdown.
const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Options controlling directory walking.
#[derive(Debug, Clone, Default)]
pub struct DiscoverOptions {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Maximum directory depth when recursive (1 = root only).
    pub max_depth: Option<usize>,
    /// Keep only files matching at least one pattern (empty = all).
    pub include: Vec<String>,
    /// Drop files matching any pattern.
    pub exclude: Vec<String>,
}

struct Filters {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl Filters {
    fn new(options: &DiscoverOptions) -> Result<Self, ScanError> {
        let compile = |patterns: &[String]| -> Result<Vec<Pattern>, ScanError> {
            patterns
                .iter()
                .map(|p| Pattern::new(p).map_err(ScanError::from))
                .collect()
        };
        Ok(Self {
            include: compile(&options.include)?,
            exclude: compile(&options.exclude)?,
        })
    }

    fn accepts(&self, relative: &str, file_name: &str) -> bool {
        let matches = |p: &Pattern| p.matches(relative) || p.matches(file_name);
        let included = self.include.is_empty() || self.include.iter().any(matches);
        included && !self.exclude.iter().any(matches)
    }
}

/// Find Markdown files under `root`, sorted by path.
///
/// A file path is returned as-is, without filtering.
///
/// # Errors
///
/// Returns [`ScanError::NotFound`] if `root` does not exist and
/// [`ScanError::Pattern`] for an invalid glob.
pub fn find_markdown_files(
    root: &Path,
    options: &DiscoverOptions,
) -> Result<Vec<PathBuf>, ScanError> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.is_dir() {
        return Err(ScanError::NotFound(root.to_path_buf()));
    }

    let filters = Filters::new(options)?;
    let max_depth = if options.recursive {
        options.max_depth.unwrap_or(usize::MAX)
    } else {
        1
    };

    let mut files = Vec::new();
    walk(root, root, 1, max_depth, &filters, &mut files);
    files.sort();

    tracing::debug!(root = %root.display(), count = files.len(), "Discovered markdown files");
    Ok(files)
}

fn walk(
    root: &Path,
    dir: &Path,
    depth: usize,
    max_depth: usize,
    filters: &Filters,
    files: &mut Vec<PathBuf>,
) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %dir.display(), error = %e, "Failed to read directory");
            return;
        }
    };

    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());

        if is_dir {
            if depth < max_depth {
                walk(root, &path, depth + 1, max_depth, filters, files);
            }
            continue;
        }

        let is_markdown = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| MARKDOWN_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if !is_markdown {
            continue;
        }

        let relative = relative_path(root, &path);
        if filters.accepts(&relative, &name) {
            files.push(path);
        }
    }
}

/// Relative path with `/` separators.
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("guide/deep")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        for file in [
            "index.md",
            "notes.markdown",
            "image.png",
            "guide/setup.md",
            "guide/draft-setup.md",
            "guide/deep/internals.md",
            ".git/HEAD.md",
        ] {
            fs::write(root.join(file), "# x").unwrap();
        }
        dir
    }

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files.iter().map(|f| relative_path(root, f)).collect()
    }

    #[test]
    fn test_non_recursive() {
        let dir = fixture();

        let files = find_markdown_files(dir.path(), &DiscoverOptions::default()).unwrap();

        assert_eq!(names(dir.path(), &files), vec!["index.md", "notes.markdown"]);
    }

    #[test]
    fn test_recursive_skips_hidden() {
        let dir = fixture();
        let options = DiscoverOptions {
            recursive: true,
            ..Default::default()
        };

        let files = find_markdown_files(dir.path(), &options).unwrap();

        assert_eq!(
            names(dir.path(), &files),
            vec![
                "guide/deep/internals.md",
                "guide/draft-setup.md",
                "guide/setup.md",
                "index.md",
                "notes.markdown",
            ]
        );
    }

    #[test]
    fn test_max_depth() {
        let dir = fixture();
        let options = DiscoverOptions {
            recursive: true,
            max_depth: Some(2),
            ..Default::default()
        };

        let files = find_markdown_files(dir.path(), &options).unwrap();

        assert!(!names(dir.path(), &files).contains(&"guide/deep/internals.md".to_owned()));
        assert!(names(dir.path(), &files).contains(&"guide/setup.md".to_owned()));
    }

    #[test]
    fn test_include_and_exclude() {
        let dir = fixture();
        let options = DiscoverOptions {
            recursive: true,
            include: vec!["guide/**/*.md".to_owned()],
            exclude: vec!["draft-*".to_owned()],
            ..Default::default()
        };

        let files = find_markdown_files(dir.path(), &options).unwrap();

        assert_eq!(
            names(dir.path(), &files),
            vec!["guide/deep/internals.md", "guide/setup.md"]
        );
    }

    #[test]
    fn test_file_root_returned_as_is() {
        let dir = fixture();
        let file = dir.path().join("guide/setup.md");

        let files = find_markdown_files(&file, &DiscoverOptions::default()).unwrap();

        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_missing_root() {
        let dir = TempDir::new().unwrap();
        let err = find_markdown_files(&dir.path().join("nope"), &DiscoverOptions::default())
            .unwrap_err();
        assert!(matches!(err, ScanError::NotFound(_)));
    }

    #[test]
    fn test_invalid_pattern() {
        let dir = fixture();
        let options = DiscoverOptions {
            include: vec!["[".to_owned()],
            ..Default::default()
        };
        let err = find_markdown_files(dir.path(), &options).unwrap_err();
        assert!(matches!(err, ScanError::Pattern(_)));
    }
}
