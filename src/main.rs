// qr-desk-tags: Compose QR codes into desk tags and export them as a PDF

use std::path::{Path, PathBuf};

use clap::Parser;
use image::ImageFormat;
use tracing::info;
use tracing_subscriber::EnvFilter;

use qr_desk_tags::assets::DEFAULT_LOGO;
use qr_desk_tags::input::collect_input_paths;
use qr_desk_tags::pdf::{DEFAULT_DPI, DEFAULT_FILE_NAME, DOCUMENT_MIME};
use qr_desk_tags::{encode_pdf, run_batch_paths, AppError, BatchOutput, DecodePolicy, LabelAssets, LayoutConfig};

// ============================================================================
// Data Structures
// ============================================================================

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Compose QR code images into desk tags and export a PDF")]
struct Args {
    /// QR images (PNG/JPEG) or directories containing them
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output PDF file
    #[arg(short, long, default_value = DEFAULT_FILE_NAME)]
    output: PathBuf,

    /// Logo image (file path or URL) shown under the desk name
    #[arg(long, default_value = DEFAULT_LOGO)]
    logo: String,

    /// Leave the logo off every label
    #[arg(long)]
    no_logo: bool,

    /// TrueType/OpenType font for desk names (defaults to a system bold font)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Also write the first page as a PNG preview
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Skip images that cannot be decoded instead of aborting
    #[arg(long)]
    skip_invalid: bool,

    /// Write a JSON summary of the run
    #[arg(long)]
    report: Option<PathBuf>,

    /// PDF resolution in dots per inch
    #[arg(long, default_value_t = DEFAULT_DPI)]
    dpi: f32,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let args = Args::parse();
    let layout = LayoutConfig::default();

    let paths = collect_input_paths(&args.inputs)?;

    let logo_source = (!args.no_logo).then_some(args.logo.as_str());
    let assets = LabelAssets::load(args.font.as_deref(), logo_source, &layout);

    let policy = if args.skip_invalid {
        DecodePolicy::Skip
    } else {
        DecodePolicy::FailFast
    };

    let output = run_batch_paths(&paths, &assets, &layout, policy)?;

    if let Some(path) = &args.report {
        write_report(&output, path)?;
    }

    if output.is_empty() {
        info!("No labels were produced, nothing to export");
        println!("No labels produced; no PDF written.");
        return Ok(());
    }

    let pdf = encode_pdf(&output.pages, args.dpi)?;
    std::fs::write(&args.output, &pdf)?;
    info!(path = %args.output.display(), mime = DOCUMENT_MIME, bytes = pdf.len(), "Wrote document");

    if let Some(path) = &args.preview {
        write_preview(&output, path)?;
    }

    println!("✓ Generated: {}", args.output.display());
    println!("  Labels: {}", output.report.labels);
    println!("  Pages: {}", output.report.pages);
    if !output.report.skipped.is_empty() {
        println!("  Skipped: {}", output.report.skipped.len());
        for skipped in &output.report.skipped {
            println!("    {} ({})", skipped.file, skipped.reason);
        }
    }

    Ok(())
}

// ============================================================================
// Output Helpers
// ============================================================================

fn write_preview(output: &BatchOutput, path: &Path) -> Result<(), AppError> {
    let Some(page) = output.preview() else {
        return Ok(());
    };
    page.save_with_format(path, ImageFormat::Png)
        .map_err(|e| AppError::PreviewError(format!("{}: {}", path.display(), e)))?;
    info!(path = %path.display(), "Wrote preview of page 1");
    Ok(())
}

fn write_report(output: &BatchOutput, path: &Path) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(&output.report)
        .map_err(|e| AppError::ReportError(e.to_string()))?;
    std::fs::write(path, json)
        .map_err(|e| AppError::ReportError(format!("{}: {}", path.display(), e)))?;
    Ok(())
}
