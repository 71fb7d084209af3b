//! # qrcard
//!
//! A Rust library for turning short contact records into styled QR symbols.
//!
//! `qrcard` builds a QR-style symbol from a text payload (typically an already assembled vCard)
//! and renders it as a 512x512 PNG or as an SVG document. Dark modules can be drawn as squares,
//! circles or rounded squares, with a separate shape for the three finder patterns, and raster
//! output can carry a logo in its center.
//!
//! ## Scope
//!
//! - Byte mode only, versions 1 to 5 (21 to 37 modules).
//! - Four error correction levels, used for capacity lookup and format information.
//! - A single mask pattern (checkerboard).
//! - The error correction stage is a pass-through: symbols carry no Reed-Solomon codewords and
//!   are not guaranteed to scan. Plug a real implementation in through
//!   [`qrcode::ErrorCorrection`].
//!
//! ## Example
//!
//! ```rust
//! use qrcard::helper::generate_svg_string;
//! use qrcard::qrcode::QrCodeEcc;
//! use qrcard::style::{RenderConfig, ShapeVariant};
//!
//! let config = RenderConfig {
//!     color: String::from("#1a73e8"),
//!     marker_shape: ShapeVariant::Rounded,
//!     dot_shape: ShapeVariant::Circle,
//!     ..RenderConfig::default()
//! };
//! let svg = generate_svg_string("BEGIN:VCARD\nFN:Jane Doe\nEND:VCARD", QrCodeEcc::High, &config).unwrap();
//! assert!(svg.artifact.contains("<circle"));
//! ```
//!
//! Build a symbol once and render it both ways:
//!
//! ```rust
//! use qrcard::qrcode::{QrCodeEcc, Symbol};
//! use qrcard::render::{to_png_bytes, to_svg_string};
//! use qrcard::style::RenderConfig;
//!
//! let symbol = Symbol::encode_text("Hello World", QrCodeEcc::High).unwrap();
//! let config = RenderConfig::default();
//! let png = to_png_bytes(&symbol, &config).unwrap();
//! let svg = to_svg_string(&symbol, &config);
//! assert!(!png.is_empty() && svg.ends_with("</svg>"));
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: Symbol construction.
//! - [`render`]: Raster and vector renderers.
//! - [`style`]: Shapes, colors, logo decoding and the render configuration.
//! - [`helper`]: One-call generation and file output.
//! - [`error`]: The crate error type.
#![forbid(unsafe_code)]

pub mod error;
pub mod helper;
pub mod qrcode;
pub mod render;
pub mod style;

pub use error::QrError;
pub use qrcode::{QrCodeEcc, Symbol, Version};
pub use render::Rendered;
pub use style::{RenderConfig, ShapeVariant};
