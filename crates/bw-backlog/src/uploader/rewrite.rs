//! Reference rewriting.

use std::collections::HashMap;

/// Backlog embed tag for a linked attachment.
#[must_use]
pub fn embed_tag(attachment_name: &str) -> String {
    format!("![image][{attachment_name}]")
}

/// Matched source text and the attachment that replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    /// Exact text as found in the document.
    pub original_text: String,
    /// Name of the uploaded attachment.
    pub attachment_name: String,
}

/// Text after rewriting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// New content.
    pub content: String,
    /// Occurrences replaced.
    pub replacements: usize,
}

/// Replace every occurrence of each matched text whose attachment is linked.
///
/// Replacements apply in order, each over the output of the previous one.
/// Entries whose attachment name is missing from `linked` are left as-is.
#[must_use]
pub fn rewrite_references(
    text: &str,
    replacements: &[Replacement],
    linked: &HashMap<String, u64>,
) -> Rewrite {
    let mut content = text.to_owned();
    let mut count = 0;

    for replacement in replacements {
        if !linked.contains_key(&replacement.attachment_name) {
            tracing::debug!(attachment = %replacement.attachment_name, "Attachment not linked, keeping reference");
            continue;
        }
        let occurrences = content.matches(replacement.original_text.as_str()).count();
        if occurrences == 0 {
            continue;
        }
        content = content.replace(
            &replacement.original_text,
            &embed_tag(&replacement.attachment_name),
        );
        count += occurrences;
    }

    Rewrite {
        content,
        replacements: count,
    }
}
