//! Rendering configuration: module shapes, foreground color and logo.
//!
//! Everything here is parsed at the configuration boundary. The renderers in
//! [`crate::render`] only ever see a [`ShapeVariant`] and a resolved [`Color`].

use core::fmt;
use core::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::QrError;

/// Shape used to draw one dark module.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeVariant {
    /// A filled cell.
    #[default]
    Square,
    /// A filled circle inscribed in the cell.
    Circle,
    /// A filled cell with corners rounded by a quarter of the cell size.
    Rounded,
}

impl ShapeVariant {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Circle => "circle",
            Self::Rounded => "rounded",
        }
    }
}

impl fmt::Display for ShapeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeVariant {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "square" => Ok(Self::Square),
            "circle" => Ok(Self::Circle),
            "rounded" => Ok(Self::Rounded),
            _ => Err(QrError::UnknownShape(s.to_owned())),
        }
    }
}

/// An opaque RGB color.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Color([u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0]);
    pub const WHITE: Color = Color([255, 255, 255]);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub const fn rgb(self) -> [u8; 3] {
        self.0
    }

    /// Parses a CSS color: `#` hex, `rgb()`, `hsl()`, `hsv()`, `hwb()` or a CSS color name.
    ///
    /// Alpha components are accepted and discarded.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::InvalidColor`] if `s` is not a color.
    pub fn parse(s: &str) -> Result<Self, QrError> {
        let trimmed = s.trim();
        // Hex digits need their `#`.
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(QrError::InvalidColor(s.to_owned()));
        }
        let [r, g, b, _] = csscolorparser::parse(trimmed)
            .map_err(|e| QrError::InvalidColor(format!("{s}: {e}")))?
            .to_rgba8();
        Ok(Self([r, g, b]))
    }

    /// Parses `s`, substituting black when it is not a valid color.
    pub fn parse_or_black(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|err| {
            warn!(color = s, %err, "unparseable foreground color, using black");
            Self::BLACK
        })
    }

    /// Returns the color as `#rrggbb`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0;
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl FromStr for Color {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// How a symbol is drawn.
///
/// Deserializes from JSON with every field optional:
///
/// ```rust
/// use qrcard::style::{RenderConfig, ShapeVariant};
///
/// let config = RenderConfig::from_json(r#"{"color": "navy", "marker_shape": "circle"}"#).unwrap();
/// assert_eq!(config.marker_shape, ShapeVariant::Circle);
/// assert_eq!(config.dot_shape, ShapeVariant::Square);
/// assert_eq!(config.logo_size, 30);
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Foreground color. Values that do not parse are drawn in black.
    pub color: String,
    /// Shape of dark modules inside the three finder patterns.
    pub marker_shape: ShapeVariant,
    /// Shape of every other dark module.
    pub dot_shape: ShapeVariant,
    /// Base64 logo image, optionally with a `data:<type>;base64,` header. Raster output only.
    #[serde(alias = "logo_base64")]
    pub logo: Option<String>,
    /// Logo width and height as a percentage of the canvas. Values above 100 overflow the
    /// canvas and are cropped. Values of zero or below leave the logo out.
    pub logo_size: i32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            color: String::from("#000000"),
            marker_shape: ShapeVariant::Square,
            dot_shape: ShapeVariant::Square,
            logo: None,
            logo_size: 30,
        }
    }
}

impl RenderConfig {
    /// Parses a JSON render configuration. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::Config`] for malformed JSON or an unknown shape name.
    pub fn from_json(s: &str) -> Result<Self, QrError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Resolves the foreground color, falling back to black.
    pub fn foreground(&self) -> Color {
        Color::parse_or_black(&self.color)
    }

    /// Returns the color as written when it parses, otherwise `#000000`.
    pub fn fill(&self) -> &str {
        match Color::parse(&self.color) {
            Ok(_) => &self.color,
            Err(err) => {
                warn!(color = %self.color, %err, "unparseable foreground color, using black");
                "#000000"
            }
        }
    }

    /// Returns the shape for a dark module, depending on whether it lies in a finder pattern.
    pub const fn shape_for(&self, finder: bool) -> ShapeVariant {
        if finder { self.marker_shape } else { self.dot_shape }
    }

    /// Returns the logo's side length in pixels on a canvas of `canvas` pixels, or `None` if
    /// it is not positive.
    pub fn logo_pixels(&self, canvas: u32) -> Option<u32> {
        let side = i64::from(canvas) * i64::from(self.logo_size) / 100;
        u32::try_from(side).ok().filter(|&side| side > 0)
    }
}

/// Decodes a base64 logo, stripping a `data:` URL header if present.
///
/// # Errors
///
/// Returns [`QrError::InvalidLogo`] if the text is not base64 or not a supported image.
pub fn decode_logo(data: &str) -> Result<DynamicImage, QrError> {
    let encoded = data.split_once(',').map_or(data, |(_, rest)| rest);
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| QrError::InvalidLogo(e.to_string()))?;
    image::load_from_memory(&bytes).map_err(|e| QrError::InvalidLogo(e.to_string()))
}
