//! Desk-name text measurement and drawing.
//!
//! Text is positioned the way the label template expects: `y` is the top of
//! the line (the ascender), and horizontal centering uses the width of the
//! inked pixels rather than the pen advance.

use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;

use crate::bitmap_font;

/// The font used for desk names.
pub enum LabelFont {
    /// A TrueType/OpenType face rendered at a fixed pixel scale.
    Scalable { font: FontVec, scale: PxScale },
    /// Built-in low-resolution fallback.
    Bitmap,
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelFont::Scalable { scale, .. } => f
                .debug_struct("Scalable")
                .field("scale", &(scale.x, scale.y))
                .finish(),
            LabelFont::Bitmap => f.write_str("Bitmap"),
        }
    }
}

impl LabelFont {
    /// Wrap a parsed font so that one em is `size` pixels tall.
    pub fn scalable(font: FontVec, size: f32) -> Self {
        let scale = em_to_px_scale(&font, size);
        LabelFont::Scalable { font, scale }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, LabelFont::Bitmap)
    }

    /// Horizontal extent `(left, right)` of the inked pixels when `text` is
    /// drawn at x = 0. `None` if the text draws nothing.
    pub fn ink_bounds(&self, text: &str) -> Option<(i32, i32)> {
        match self {
            LabelFont::Scalable { font, scale } => scalable_ink_bounds(font, *scale, text),
            LabelFont::Bitmap => bitmap_font::ink_bounds(text),
        }
    }

    pub fn ink_width(&self, text: &str) -> u32 {
        self.ink_bounds(text)
            .map(|(left, right)| (right - left).max(0) as u32)
            .unwrap_or(0)
    }

    /// Draw `text` with its line top at `y`, centered horizontally on the
    /// canvas. Returns the x used.
    pub fn draw_centered(&self, canvas: &mut RgbImage, y: i32, text: &str, color: Rgb<u8>) -> i32 {
        let width = self.ink_width(text) as i32;
        let x = (canvas.width() as i32 - width).div_euclid(2);
        self.draw(canvas, x, y, text, color);
        x
    }

    pub fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        match self {
            LabelFont::Scalable { font, scale } => {
                draw_text_mut(canvas, color, x, y, *scale, font, text)
            }
            LabelFont::Bitmap => bitmap_font::draw_text(canvas, color, x, y, text),
        }
    }
}

/// Convert an em size in pixels to the ab_glyph scale, which is expressed as
/// ascent-to-descent height.
fn em_to_px_scale(font: &FontVec, size: f32) -> PxScale {
    match font.units_per_em() {
        Some(units) if units > 0.0 => PxScale::from(size * font.height_unscaled() / units),
        _ => PxScale::from(size),
    }
}

/// Mirrors the glyph layout of `imageproc::drawing::draw_text_mut` so the
/// measured extent matches what is drawn.
fn scalable_ink_bounds(font: &FontVec, scale: PxScale, text: &str) -> Option<(i32, i32)> {
    let scaled = font.as_scaled(scale);
    let mut pen = 0.0f32;
    let mut last = None;
    let mut bounds: Option<(i32, i32)> = None;

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        let glyph = glyph_id.with_scale_and_position(scale, point(pen, scaled.ascent()));
        pen += scaled.h_advance(glyph_id);
        if let Some(outlined) = font.outline_glyph(glyph) {
            if let Some(last) = last {
                pen += scaled.kern(glyph_id, last);
            }
            last = Some(glyph_id);
            let bb = outlined.px_bounds();
            let (left, right) = (bb.min.x.round() as i32, bb.max.x.round() as i32);
            bounds = Some(match bounds {
                Some((l, r)) => (l.min(left), r.max(right)),
                None => (left, right),
            });
        }
    }

    bounds
}
