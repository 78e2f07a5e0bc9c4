//! CLI command implementations.

pub(crate) mod analyze;
pub(crate) mod upload;

pub(crate) use analyze::AnalyzeArgs;
pub(crate) use upload::UploadArgs;
