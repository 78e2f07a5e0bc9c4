//! Mermaid diagram rendering for bw.
//!
//! Diagrams are rendered by the external `mmdc` executable
//! (`npm install -g @mermaid-js/mermaid-cli`). Rendering one diagram never
//! fails fatally: every call yields a [`RenderResult`] so a batch can carry on
//! past a bad diagram.
//!
//! # Architecture
//!
//! - [`format`]: output formats and render options
//! - [`renderer`]: the [`DiagramRenderer`] trait and [`MermaidRenderer`]
//! - [`naming`]: content-hash file names for rendered diagrams
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use bw_mermaid::{DiagramRenderer, MermaidRenderer, RenderOptions};
//!
//! let renderer = MermaidRenderer::new()?;
//! let result = renderer.render("graph TD\n A-->B", Path::new("/tmp"), "flow", &RenderOptions::default());
//! # Ok(())
//! # }
//! ```

mod consts;
pub mod format;
pub mod naming;
pub mod renderer;

pub use consts::{DEFAULT_COMMAND, RENDER_TIMEOUT};
pub use format::{ImageFormat, RenderOptions};
pub use naming::diagram_file_stem;
pub use renderer::{DiagramRenderer, MermaidRenderer, RenderError, RenderFailure, RenderResult};
