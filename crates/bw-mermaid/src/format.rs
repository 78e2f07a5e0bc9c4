//! Output formats and render options.

/// Image format produced by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// Raster PNG (default, displays everywhere in Backlog).
    #[default]
    Png,
    /// Vector SVG.
    Svg,
}

impl ImageFormat {
    /// Parse format from a config value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    /// File extension, which is also what the converter keys the format on.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

/// Options passed to the converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Output format.
    pub format: ImageFormat,
    /// Mermaid theme (`default`, `dark`, `forest`, `neutral`).
    pub theme: String,
    /// Background color (`white`, `transparent`, ...).
    pub background: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::Png,
            theme: "default".to_owned(),
            background: "white".to_owned(),
        }
    }
}
