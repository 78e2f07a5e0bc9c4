//! Internal constants for diagram rendering.

use std::time::Duration;

/// Default converter executable.
pub const DEFAULT_COMMAND: &str = "mmdc";

/// Hard ceiling on a single converter run.
pub const RENDER_TIMEOUT: Duration = Duration::from_secs(60);

/// How often a running converter is polled for exit.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Extension of the scratch input file.
pub(crate) const INPUT_EXTENSION: &str = "mmd";

/// Hex characters of the content hash kept in file names.
pub(crate) const HASH_PREFIX_LEN: usize = 8;
