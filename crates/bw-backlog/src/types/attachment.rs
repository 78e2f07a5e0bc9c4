//! Backlog attachment types.

use serde::Deserialize;

/// File uploaded to the space-level attachment area.
///
/// The id is space-scoped and only valid until it is linked to a page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Attachment {
    /// Space-scoped attachment ID.
    pub id: u64,
    /// Stored filename.
    pub name: String,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
}

/// Attachment after linking to a wiki page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkedAttachment {
    /// Page-scoped attachment ID.
    pub id: u64,
    /// Filename, used by `![image][name]` embeds.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_attachment_ignores_unknown_fields() {
        let json = r#"{"id": 7, "name": "shot.png", "size": 2048, "createdUser": {"id": 1}}"#;

        let attachment: Attachment = serde_json::from_str(json).unwrap();

        assert_eq!(
            attachment,
            Attachment {
                id: 7,
                name: "shot.png".to_owned(),
                size: 2048,
            }
        );
    }
}
