//! Raster and vector renderers.
//!
//! Both renderers walk the finished symbol in row-major order through [`plan_modules`], so for
//! the same symbol and configuration they draw the same modules with the same shapes. The
//! canvas is always [`CANVAS_SIZE`] pixels square, and the cell size is
//! `CANVAS_SIZE / symbol.size()`, which is usually not an integer.

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbImage, Rgba, RgbaImage};
use tracing::{debug, warn};

use crate::error::QrError;
use crate::qrcode::Symbol;
use crate::style::{decode_logo, RenderConfig, ShapeVariant};

/// Width and height of every rendered image, in pixels.
pub const CANVAS_SIZE: u32 = 512;

/// Logos resizing past this many pixels per side are left out.
const MAX_LOGO_SIDE: u32 = 8 * CANVAS_SIZE;

/// A rendered artifact together with the payload it encodes.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Rendered<T> {
    pub artifact: T,
    pub payload: String,
}

/// One dark module and the shape it is drawn with.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct ModuleDraw {
    pub row: usize,
    pub col: usize,
    /// Inside one of the three 7x7 finder patterns.
    pub finder: bool,
    pub shape: ShapeVariant,
}

/// Yields every dark module of `symbol` in row-major order with its shape.
pub fn plan_modules<'a>(
    symbol: &'a Symbol,
    config: &'a RenderConfig,
) -> impl Iterator<Item = ModuleDraw> + 'a {
    let size = symbol.size();
    (0..size)
        .flat_map(move |row| (0..size).map(move |col| (row, col)))
        .filter(move |&(row, col)| symbol.get_module(row, col))
        .map(move |(row, col)| {
            let finder = symbol.is_finder_module(row, col);
            ModuleDraw {
                row,
                col,
                finder,
                shape: config.shape_for(finder),
            }
        })
}

fn cell_size(symbol: &Symbol) -> f64 {
    f64::from(CANVAS_SIZE) / symbol.size() as f64
}

/// Renders `symbol` onto a white 512x512 canvas.
///
/// An invalid color is drawn as black. A logo that cannot be decoded is left out. Neither
/// case is reported to the caller.
pub fn to_image_buffer(symbol: &Symbol, config: &RenderConfig) -> RgbImage {
    let [r, g, b] = config.foreground().rgb();
    let ink = Rgba([r, g, b, 255]);
    let cell = cell_size(symbol);

    let mut canvas = RgbaImage::from_pixel(CANVAS_SIZE, CANVAS_SIZE, Rgba([255, 255, 255, 255]));
    let mut drawn: usize = 0;
    for draw in plan_modules(symbol, config) {
        let x = draw.col as f64 * cell;
        let y = draw.row as f64 * cell;
        fill_cell(&mut canvas, x, y, cell, draw.shape, ink);
        drawn += 1;
    }

    if let Some(logo) = config.logo.as_deref() {
        match config.logo_pixels(CANVAS_SIZE) {
            Some(side) => composite_logo(&mut canvas, logo, side),
            None => debug!(logo_size = config.logo_size, "logo size is not positive, skipping"),
        }
    }

    debug!(size = symbol.size(), drawn, "raster symbol rendered");
    DynamicImage::ImageRgba8(canvas).into_rgb8()
}

/// Renders `symbol` and encodes it as PNG.
///
/// # Errors
///
/// Returns [`QrError::Image`] if PNG encoding fails.
pub fn to_png_bytes(symbol: &Symbol, config: &RenderConfig) -> Result<Vec<u8>, QrError> {
    let img = to_image_buffer(symbol, config);
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Renders `symbol` as a `data:image/png;base64,...` URL.
///
/// # Errors
///
/// Returns [`QrError::Image`] if PNG encoding fails.
pub fn to_png_data_url(symbol: &Symbol, config: &RenderConfig) -> Result<String, QrError> {
    let png = to_png_bytes(symbol, config)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

/// Fills the pixels whose centers fall inside the shape placed on the cell at `(x, y)`.
fn fill_cell(canvas: &mut RgbaImage, x: f64, y: f64, cell: f64, shape: ShapeVariant, ink: Rgba<u8>) {
    let limit = f64::from(canvas.width().min(canvas.height()));
    let x_end = (x + cell).ceil().min(limit) as u32;
    let y_end = (y + cell).ceil().min(limit) as u32;
    for py in (y.floor() as u32)..y_end {
        for px in (x.floor() as u32)..x_end {
            let cx = f64::from(px) + 0.5;
            let cy = f64::from(py) + 0.5;
            if covers(shape, x, y, cell, cx, cy) {
                canvas.put_pixel(px, py, ink);
            }
        }
    }
}

fn covers(shape: ShapeVariant, x: f64, y: f64, cell: f64, px: f64, py: f64) -> bool {
    if px < x || py < y || px >= x + cell || py >= y + cell {
        return false;
    }
    match shape {
        ShapeVariant::Square => true,
        ShapeVariant::Circle => {
            let r = cell / 2.0;
            let dx = px - (x + r);
            let dy = py - (y + r);
            dx * dx + dy * dy <= r * r
        }
        ShapeVariant::Rounded => {
            // Distance from the inner rectangle shrunk by the corner radius.
            let r = cell / 4.0;
            let dx = (x + r - px).max(px - (x + cell - r)).max(0.0);
            let dy = (y + r - py).max(py - (y + cell - r)).max(0.0);
            dx * dx + dy * dy <= r * r
        }
    }
}

/// Resizes the logo to `side` pixels and overlays it centered. Larger logos are cropped.
fn composite_logo(canvas: &mut RgbaImage, data: &str, side: u32) {
    if side > MAX_LOGO_SIDE {
        warn!(side, max = MAX_LOGO_SIDE, "logo too large, rendering without it");
        return;
    }
    let logo = match decode_logo(data) {
        Ok(logo) => logo,
        Err(err) => {
            warn!(%err, "logo could not be decoded, rendering without it");
            return;
        }
    };
    let logo = imageops::resize(&logo.to_rgba8(), side, side, FilterType::Lanczos3);
    let offset = (i64::from(canvas.width()) - i64::from(side)).div_euclid(2);
    imageops::overlay(canvas, &logo, offset, offset);
}

/// Renders `symbol` as an SVG document with a 512x512 viewport.
///
/// The document is a white background rectangle followed by one element per dark module in
/// row-major order. Logos are not drawn. The fill is the configured color as written, or
/// `#000000` if it does not parse.
pub fn to_svg_string(symbol: &Symbol, config: &RenderConfig) -> String {
    let fill = config.fill();
    let size = CANVAS_SIZE;
    let cell = cell_size(symbol);
    let width = svg_number(cell);

    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += &format!(
        "<svg width=\"{size}\" height=\"{size}\" viewBox=\"0 0 {size} {size}\" xmlns=\"http://www.w3.org/2000/svg\">\n"
    );
    result += &format!("<rect width=\"{size}\" height=\"{size}\" fill=\"white\"/>\n");
    for draw in plan_modules(symbol, config) {
        let x = draw.col as f64 * cell;
        let y = draw.row as f64 * cell;
        result += &match draw.shape {
            ShapeVariant::Circle => {
                let r = cell / 2.0;
                format!(
                    "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{fill}\"/>\n",
                    svg_number(x + r),
                    svg_number(y + r),
                    svg_number(r)
                )
            }
            ShapeVariant::Rounded => format!(
                "<rect x=\"{}\" y=\"{}\" width=\"{width}\" height=\"{width}\" rx=\"{}\" fill=\"{fill}\"/>\n",
                svg_number(x),
                svg_number(y),
                svg_number(cell / 4.0)
            ),
            ShapeVariant::Square => format!(
                "<rect x=\"{}\" y=\"{}\" width=\"{width}\" height=\"{width}\" fill=\"{fill}\"/>\n",
                svg_number(x),
                svg_number(y)
            ),
        };
    }
    result += "</svg>";
    result
}

/// Formats a coordinate with the shortest round-trip digits, keeping `.0` on whole numbers.
fn svg_number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}
