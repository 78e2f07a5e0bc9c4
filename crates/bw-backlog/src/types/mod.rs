//! Backlog API response types.
//!
//! Only fields that are actually used are declared; serde ignores the rest.

mod attachment;
mod project;
mod wiki;

pub use attachment::{Attachment, LinkedAttachment};
pub use project::Project;
pub use wiki::{Tag, WikiPage, WikiSummary};

use serde::{Deserialize, Deserializer};

/// Treat JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
