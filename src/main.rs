//! Command-line front end: one source image in, `.icns` and iconset zip out.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use iconforge::{Session, media_type_for_extension};

#[derive(Debug, Parser)]
#[command(
    name = "iconforge",
    about = "Generate macOS .iconset archives and .icns containers from one image"
)]
struct Args {
    /// Source image (PNG, JPEG, GIF, WebP, BMP, TIFF, or SVG).
    input: PathBuf,

    /// Directory the outputs are written to.
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Also write the ten individual PNG variants.
    #[arg(long)]
    emit_pngs: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let file_name = args
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .context("input path has no file name")?
        .to_string();

    // Mirror the image/* upload gate: unrecognized extensions are
    // rejected up front instead of being sniffed.
    let ext = args.input.extension().and_then(|e| e.to_str()).unwrap_or("");
    let media_type = media_type_for_extension(ext).unwrap_or("application/octet-stream");

    let bytes = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let mut session = Session::new();
    let bundle = session.process(&file_name, Some(media_type), &bytes)?;

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;

    let icns_path = args.out_dir.join(bundle.icns_file_name());
    fs::write(&icns_path, &bundle.icns)
        .with_context(|| format!("failed to write {}", icns_path.display()))?;

    let archive_path = args.out_dir.join(bundle.archive_file_name());
    fs::write(&archive_path, &bundle.archive)
        .with_context(|| format!("failed to write {}", archive_path.display()))?;

    if args.emit_pngs {
        for variant in &bundle.variants {
            let png_path = args.out_dir.join(variant.spec.filename);
            fs::write(&png_path, &variant.png)
                .with_context(|| format!("failed to write {}", png_path.display()))?;
        }
    }

    tracing::info!(
        icns = %icns_path.display(),
        archive = %archive_path.display(),
        "icon assets written"
    );
    Ok(())
}
