use crate::error::QrError;
use crate::qrcode::{QrCodeEcc, Symbol};
use crate::render::{self, Rendered};
use crate::style::RenderConfig;

use image::RgbImage;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/*---- Utilities ----*/

/// Returns the symbol as block-character art, two characters per module, with `border`
/// light modules on every side. Lines end with `\n`.
pub fn to_text_art(symbol: &Symbol, border: usize) -> String {
    let size = symbol.size();
    let mut result = String::new();
    for y in 0..size + 2 * border {
        for x in 0..size + 2 * border {
            let dark = y >= border && x >= border && symbol.get_module(y - border, x - border);
            let c: char = if dark { '█' } else { ' ' };
            result.push(c);
            result.push(c);
        }
        result.push('\n');
    }
    result
}

/// Renders a symbol as PNG and saves it to a file.
///
/// # Arguments
///
/// * `symbol` - The symbol to render.
/// * `config` - Colors, shapes and logo.
/// * `directory_path` - Optional. The directory the image is written to, created if missing. Defaults to "generated".
/// * `filename` - Optional. The file name without extension. Defaults to a timestamp-based name.
///
/// # Errors
///
/// Returns [`QrError::Io`] if the directory cannot be created and [`QrError::Image`] if the
/// image cannot be written.
///
/// # Example
///
/// ```rust,no_run
/// use qrcard::helper::qr_to_image_and_save;
/// use qrcard::qrcode::{QrCodeEcc, Symbol};
/// use qrcard::style::RenderConfig;
///
/// let symbol = Symbol::encode_text("Hello, World!", QrCodeEcc::High).unwrap();
/// let path = qr_to_image_and_save(&symbol, &RenderConfig::default(), Some("images"), Some("qr_code")).unwrap();
/// assert!(path.ends_with("qr_code.png"));
/// ```
pub fn qr_to_image_and_save(
    symbol: &Symbol,
    config: &RenderConfig,
    directory_path: Option<&str>,
    filename: Option<&str>,
) -> Result<PathBuf, QrError> {
    let file_path = output_path(directory_path, filename, "png")?;
    render::to_image_buffer(symbol, config).save(&file_path)?;
    info!(path = %file_path.display(), "QR image saved");
    Ok(file_path)
}

/// Renders a symbol as SVG and saves it to a file.
///
/// Takes the same directory and file name arguments as [`qr_to_image_and_save`].
///
/// # Errors
///
/// Returns [`QrError::Io`] if the directory or the file cannot be written.
pub fn qr_to_svg_and_save(
    symbol: &Symbol,
    config: &RenderConfig,
    directory_path: Option<&str>,
    filename: Option<&str>,
) -> Result<PathBuf, QrError> {
    let file_path = output_path(directory_path, filename, "svg")?;
    fs::write(&file_path, render::to_svg_string(symbol, config))?;
    info!(path = %file_path.display(), "QR SVG saved");
    Ok(file_path)
}

fn output_path(directory_path: Option<&str>, filename: Option<&str>, extension: &str) -> Result<PathBuf, QrError> {
    let directory_path = directory_path.unwrap_or("generated");
    let filename = match filename {
        Some(name) => name.to_owned(),
        None => {
            let millis = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |since_the_epoch| since_the_epoch.as_millis());
            format!("qr_{millis}")
        }
    };

    fs::create_dir_all(directory_path)?;
    Ok(Path::new(directory_path).join(format!("{filename}.{extension}")))
}

/// Generates a QR image from the provided content and saves it to a file.
///
/// # Arguments
///
/// * `content` - The text to encode.
/// * `ecl` - Error correction level.
/// * `config` - Colors, shapes and logo.
/// * `directory` - Optional. Defaults to "generated".
/// * `filename` - Optional. Defaults to a timestamp-based name.
///
/// # Errors
///
/// Returns [`QrError::EmptyPayload`] for empty content, or the errors of [`qr_to_image_and_save`].
///
/// # Example
///
/// ```rust,no_run
/// use qrcard::helper::generate_image;
/// use qrcard::qrcode::QrCodeEcc;
/// use qrcard::style::RenderConfig;
///
/// generate_image("Hello, World!", QrCodeEcc::High, &RenderConfig::default(), Some("images"), Some("qr_code")).unwrap();
/// ```
pub fn generate_image(
    content: &str,
    ecl: QrCodeEcc,
    config: &RenderConfig,
    directory: Option<&str>,
    filename: Option<&str>,
) -> Result<Rendered<PathBuf>, QrError> {
    let symbol = Symbol::encode_text(content, ecl)?;
    let path = qr_to_image_and_save(&symbol, config, directory, filename)?;
    Ok(Rendered {
        artifact: path,
        payload: content.to_owned(),
    })
}

/// Generates a QR SVG document from the provided content.
///
/// # Errors
///
/// Returns [`QrError::EmptyPayload`] for empty content.
///
/// # Example
///
/// ```
/// use qrcard::helper::generate_svg_string;
/// use qrcard::qrcode::QrCodeEcc;
/// use qrcard::style::RenderConfig;
///
/// let svg = generate_svg_string("Hello, World!", QrCodeEcc::High, &RenderConfig::default()).unwrap();
/// assert!(svg.artifact.starts_with("<?xml"));
/// assert_eq!(svg.payload, "Hello, World!");
/// ```
pub fn generate_svg_string(content: &str, ecl: QrCodeEcc, config: &RenderConfig) -> Result<Rendered<String>, QrError> {
    let symbol = Symbol::encode_text(content, ecl)?;
    Ok(Rendered {
        artifact: render::to_svg_string(&symbol, config),
        payload: content.to_owned(),
    })
}

/// Generates a 512x512 QR image buffer from the provided content.
///
/// # Errors
///
/// Returns [`QrError::EmptyPayload`] for empty content.
///
/// # Example
///
/// ```
/// use qrcard::helper::generate_image_buffer;
/// use qrcard::qrcode::QrCodeEcc;
/// use qrcard::style::RenderConfig;
///
/// let img = generate_image_buffer("Hello, World!", QrCodeEcc::High, &RenderConfig::default()).unwrap();
/// assert_eq!(img.artifact.dimensions(), (512, 512));
/// ```
pub fn generate_image_buffer(content: &str, ecl: QrCodeEcc, config: &RenderConfig) -> Result<Rendered<RgbImage>, QrError> {
    let symbol = Symbol::encode_text(content, ecl)?;
    Ok(Rendered {
        artifact: render::to_image_buffer(&symbol, config),
        payload: content.to_owned(),
    })
}

/// Generates a PNG-encoded QR image from the provided content.
///
/// # Errors
///
/// Returns [`QrError::EmptyPayload`] for empty content and [`QrError::Image`] if encoding fails.
pub fn generate_png(content: &str, ecl: QrCodeEcc, config: &RenderConfig) -> Result<Rendered<Vec<u8>>, QrError> {
    let symbol = Symbol::encode_text(content, ecl)?;
    Ok(Rendered {
        artifact: render::to_png_bytes(&symbol, config)?,
        payload: content.to_owned(),
    })
}

/// Generates a `data:image/png;base64,...` URL from the provided content.
///
/// # Errors
///
/// Returns [`QrError::EmptyPayload`] for empty content and [`QrError::Image`] if encoding fails.
pub fn generate_png_data_url(content: &str, ecl: QrCodeEcc, config: &RenderConfig) -> Result<Rendered<String>, QrError> {
    let symbol = Symbol::encode_text(content, ecl)?;
    Ok(Rendered {
        artifact: render::to_png_data_url(&symbol, config)?,
        payload: content.to_owned(),
    })
}
