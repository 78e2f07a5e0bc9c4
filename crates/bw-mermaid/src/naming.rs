//! File names for rendered diagrams.
//!
//! Names combine the block's position with a short MD5 of its source, so the
//! same document always yields the same names and two blocks never collide.

use md5::{Digest, Md5};

use crate::consts::HASH_PREFIX_LEN;

/// File stem for the diagram at `index`, e.g. `mermaid_0_1a2b3c4d`.
#[must_use]
pub fn diagram_file_stem(source: &str, index: usize) -> String {
    let hash = hex::encode(Md5::digest(source.as_bytes()));
    format!("mermaid_{index}_{}", &hash[..HASH_PREFIX_LEN])
}
