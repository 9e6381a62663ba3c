//! Multi-page PDF export of page rasters.

use std::io::BufWriter;

use image::RgbImage;
use printpdf::{
    ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument,
    PdfLayerReference, Px,
};
use tracing::debug;

use crate::error::AppError;

pub const DOCUMENT_MIME: &str = "application/pdf";
pub const DEFAULT_FILE_NAME: &str = "RestoSuite_Tags.pdf";
pub const DOCUMENT_TITLE: &str = "RestoSuite Tags";

/// Resolution at which one raster pixel is one PDF point.
pub const DEFAULT_DPI: f32 = 72.0;

const MM_PER_INCH: f32 = 25.4;

fn px_to_mm(px: u32, dpi: f32) -> f32 {
    px as f32 / dpi * MM_PER_INCH
}

/// Encode `pages` as a PDF, one page per raster, each page exactly the size
/// of its raster at `dpi`.
pub fn encode_pdf(pages: &[RgbImage], dpi: f32) -> Result<Vec<u8>, AppError> {
    let (first, rest) = pages
        .split_first()
        .ok_or_else(|| AppError::PdfError("no pages to export".into()))?;
    if !(dpi.is_finite() && dpi > 0.0) {
        return Err(AppError::PdfError(format!("invalid resolution {dpi}")));
    }

    let (doc, page1, layer1) = PdfDocument::new(
        DOCUMENT_TITLE,
        Mm(px_to_mm(first.width(), dpi)),
        Mm(px_to_mm(first.height(), dpi)),
        "Layer 1",
    );
    embed_page(doc.get_page(page1).get_layer(layer1), first, dpi);

    for (idx, raster) in rest.iter().enumerate() {
        let (page, layer) = doc.add_page(
            Mm(px_to_mm(raster.width(), dpi)),
            Mm(px_to_mm(raster.height(), dpi)),
            format!("Page {}", idx + 2),
        );
        embed_page(doc.get_page(page).get_layer(layer), raster, dpi);
    }

    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer)
        .map_err(|e| AppError::PdfError(e.to_string()))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::PdfError(e.to_string()))?;

    debug!(pages = pages.len(), bytes = bytes.len(), "Encoded PDF");
    Ok(bytes)
}

fn embed_page(layer: PdfLayerReference, raster: &RgbImage, dpi: f32) {
    let (width, height) = raster.dimensions();

    let image = Image::from(ImageXObject {
        width: Px(width as usize),
        height: Px(height as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: false,
        image_data: raster.as_raw().clone(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });

    image.add_to_layer(
        layer,
        ImageTransform {
            translate_x: Some(Mm(0.0)),
            translate_y: Some(Mm(0.0)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
}
