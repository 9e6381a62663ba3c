//! Run-wide label assets: the desk-name font and the optional logo.
//!
//! Both are loaded once before any label is composed and never change
//! afterwards. Loading never fails the run: a missing font falls back to the
//! built-in bitmap font and a missing logo simply leaves the logo off.

use std::io::Read;
use std::path::Path;

use ab_glyph::FontVec;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use tracing::{debug, info, warn};

use crate::layout::{LayoutConfig, Size};
use crate::text::LabelFont;

/// Bold faces tried, in order, when no font is given explicitly.
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

pub const DEFAULT_LOGO: &str = "logo.png";

/// Immutable assets shared by every label in a run.
#[derive(Debug)]
pub struct LabelAssets {
    pub font: LabelFont,
    /// Trimmed and resized logo, ready to paste.
    pub logo: Option<RgbaImage>,
}

impl LabelAssets {
    pub fn load(font_path: Option<&Path>, logo_source: Option<&str>, layout: &LayoutConfig) -> Self {
        let font = load_font(font_path, layout.font_size);
        let logo = logo_source.and_then(|source| load_logo(source, layout.logo_size));
        Self { font, logo }
    }
}

// ============================================================================
// Font
// ============================================================================

/// Load the desk-name font at `size` pixels per em.
///
/// An explicit path is tried alone; otherwise the system candidates are
/// searched. Falls back to the bitmap font.
pub fn load_font(explicit: Option<&Path>, size: f32) -> LabelFont {
    let candidates: Vec<&Path> = match explicit {
        Some(path) => vec![path],
        None => SYSTEM_FONT_CANDIDATES.iter().map(Path::new).collect(),
    };

    for path in candidates {
        match read_font(path) {
            Ok(font) => {
                info!(path = %path.display(), size, "Loaded label font");
                return LabelFont::scalable(font, size);
            }
            Err(e) => debug!(path = %path.display(), "Font candidate rejected: {e}"),
        }
    }

    warn!("No usable TrueType font found, desk names will use the built-in bitmap font");
    LabelFont::Bitmap
}

fn read_font(path: &Path) -> Result<FontVec, String> {
    let data = std::fs::read(path).map_err(|e| e.to_string())?;
    FontVec::try_from_vec(data).map_err(|_| "not a TTF/OTF font".to_string())
}

// ============================================================================
// Logo
// ============================================================================

/// Load a logo from a file path or an http(s) URL, trim its transparent
/// margins and resize it to `size`. Any failure yields `None`.
pub fn load_logo(source: &str, size: Size) -> Option<RgbaImage> {
    let bytes = match read_logo_bytes(source) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(source, "Logo unavailable, labels will omit it: {e}");
            return None;
        }
    };

    match image::load_from_memory(&bytes) {
        Ok(img) => {
            let logo = prepare_logo(&img, size);
            info!(source, width = logo.width(), height = logo.height(), "Loaded logo");
            Some(logo)
        }
        Err(e) => {
            warn!(source, "Logo could not be decoded, labels will omit it: {e}");
            None
        }
    }
}

fn read_logo_bytes(source: &str) -> Result<Vec<u8>, String> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let response = ureq::get(source)
            .call()
            .map_err(|e| format!("Failed to fetch URL: {}", e))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| format!("Failed to read response: {}", e))?;
        Ok(bytes)
    } else {
        std::fs::read(source).map_err(|e| format!("{}: {}", source, e))
    }
}

/// Trim, then stretch to the logo slot.
pub fn prepare_logo(img: &DynamicImage, size: Size) -> RgbaImage {
    let trimmed = trim_transparent(&img.to_rgba8());
    imageops::resize(&trimmed, size.width, size.height, FilterType::CatmullRom)
}

/// Crop to the bounding box of pixels with non-zero alpha. A fully
/// transparent image is returned unchanged.
pub fn trim_transparent(img: &RgbaImage) -> RgbaImage {
    let mut bbox: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in img.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        bbox = Some(match bbox {
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            None => (x, y, x, y),
        });
    }

    match bbox {
        Some((x0, y0, x1, y1)) => {
            imageops::crop_imm(img, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image()
        }
        None => img.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn padded_logo() -> RgbaImage {
        let mut img = RgbaImage::from_pixel(100, 60, Rgba([0, 0, 0, 0]));
        for y in 20..30 {
            for x in 10..50 {
                img.put_pixel(x, y, Rgba([200, 30, 30, 255]));
            }
        }
        img
    }

    #[test]
    fn trim_removes_transparent_margins() {
        let trimmed = trim_transparent(&padded_logo());
        assert_eq!(trimmed.dimensions(), (40, 10));
        assert_eq!(trimmed.get_pixel(0, 0), &Rgba([200, 30, 30, 255]));
    }

    #[test]
    fn trim_keeps_fully_transparent_image() {
        let img = RgbaImage::from_pixel(12, 7, Rgba([0, 0, 0, 0]));
        assert_eq!(trim_transparent(&img).dimensions(), (12, 7));
    }

    #[test]
    fn prepared_logo_fills_logo_slot() {
        let logo = prepare_logo(&DynamicImage::ImageRgba8(padded_logo()), Size::new(480, 120));
        assert_eq!(logo.dimensions(), (480, 120));
        // Trimmed before resizing, so the corners are opaque logo pixels.
        assert_eq!(logo.get_pixel(0, 0)[3], 255);
        assert_eq!(logo.get_pixel(479, 119)[3], 255);
    }

    #[test]
    fn missing_logo_file_is_not_fatal() {
        assert!(load_logo("does/not/exist/logo.png", Size::new(480, 120)).is_none());
    }

    #[test]
    fn corrupt_logo_is_not_fatal() {
        let path = std::env::temp_dir().join("qr-desk-tags-corrupt-logo.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        let logo = load_logo(path.to_str().unwrap(), Size::new(480, 120));
        std::fs::remove_file(&path).ok();
        assert!(logo.is_none());
    }

    #[test]
    fn unreadable_font_falls_back_to_bitmap() {
        let font = load_font(Some(Path::new("does/not/exist.ttf")), 72.0);
        assert!(font.is_fallback());
    }

    #[test]
    fn non_font_file_falls_back_to_bitmap() {
        let path = std::env::temp_dir().join("qr-desk-tags-not-a-font.ttf");
        std::fs::write(&path, b"plain text").unwrap();
        let font = load_font(Some(&path), 72.0);
        std::fs::remove_file(&path).ok();
        assert!(font.is_fallback());
    }
}
