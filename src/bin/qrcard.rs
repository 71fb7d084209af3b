//! qrcard - render a contact payload as a styled QR image.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use clap::{Parser, ValueEnum};
use qrcard::helper::{qr_to_image_and_save, qr_to_svg_and_save, to_text_art};
use qrcard::qrcode::{QrCodeEcc, Symbol};
use qrcard::style::{RenderConfig, ShapeVariant};
use tracing_subscriber::EnvFilter;

/// Render a contact payload as a styled QR image
#[derive(Parser, Debug)]
#[command(name = "qrcard", version, about)]
struct Args {
    /// Text to encode (use --payload-file for multi-line vCards)
    #[arg(required_unless_present = "payload_file")]
    payload: Option<String>,

    /// Read the payload from a file instead
    #[arg(long, conflicts_with = "payload")]
    payload_file: Option<PathBuf>,

    /// Error correction level: L, M, Q, H
    #[arg(short, long, default_value = "H")]
    level: QrCodeEcc,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Png)]
    format: Format,

    /// JSON render configuration (color, marker_shape, dot_shape, logo, logo_size)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Foreground color, overrides the configuration file
    #[arg(long)]
    color: Option<String>,

    /// Finder pattern shape: square, circle, rounded
    #[arg(long)]
    marker_shape: Option<ShapeVariant>,

    /// Data module shape: square, circle, rounded
    #[arg(long)]
    dot_shape: Option<ShapeVariant>,

    /// Logo image file composited into PNG output
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "generated")]
    directory: String,

    /// Output file name without extension (defaults to a timestamp)
    #[arg(short = 'o', long)]
    filename: Option<String>,

    /// Also print the symbol as text art
    #[arg(long)]
    ascii: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Png,
    Svg,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let payload = match (&args.payload, &args.payload_file) {
        (_, Some(path)) => {
            fs::read_to_string(path).with_context(|| format!("reading payload from {}", path.display()))?
        }
        (Some(text), None) => text.clone(),
        (None, None) => anyhow::bail!("no payload supplied"),
    };

    let config = load_config(&args)?;
    let symbol = Symbol::encode_text(&payload, args.level)?;

    if args.ascii {
        print!("{}", to_text_art(&symbol, 4));
    }

    let directory = Some(args.directory.as_str());
    let filename = args.filename.as_deref();
    let path = match args.format {
        Format::Png => qr_to_image_and_save(&symbol, &config, directory, filename)?,
        Format::Svg => qr_to_svg_and_save(&symbol, &config, directory, filename)?,
    };
    println!("{}", path.display());
    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<RenderConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text =
                fs::read_to_string(path).with_context(|| format!("reading config from {}", path.display()))?;
            RenderConfig::from_json(&text)?
        }
        None => RenderConfig::default(),
    };

    if let Some(color) = &args.color {
        config.color.clone_from(color);
    }
    if let Some(shape) = args.marker_shape {
        config.marker_shape = shape;
    }
    if let Some(shape) = args.dot_shape {
        config.dot_shape = shape;
    }
    if let Some(path) = &args.logo {
        let bytes = fs::read(path).with_context(|| format!("reading logo from {}", path.display()))?;
        config.logo = Some(STANDARD.encode(bytes));
    }
    Ok(config)
}
