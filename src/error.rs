/// Errors produced while building or rendering a QR symbol.
///
/// Only [`QrError::EmptyPayload`] stops a build. Color and logo problems are
/// reported by the explicit parse functions in [`crate::style`], but the
/// renderers recover from them on their own and never return them.
#[derive(Debug, thiserror::Error)]
pub enum QrError {
    /// The payload string was empty.
    #[error("No data to encode")]
    EmptyPayload,

    /// The foreground color string could not be parsed.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// The embedded logo could not be decoded.
    #[error("Invalid logo data: {0}")]
    InvalidLogo(String),

    /// A shape name outside `square`, `circle`, `rounded`.
    #[error("Unknown shape: {0}")]
    UnknownShape(String),

    /// An error correction level name outside `L`, `M`, `Q`, `H`.
    #[error("Unknown error correction level: {0}")]
    UnknownLevel(String),

    /// The render configuration document was malformed.
    #[error("Invalid render configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Encoding the canvas or writing an image file failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
