//! Label composition: one QR image and one desk name in, one tag canvas out.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage, RgbaImage};
use tracing::debug;

use crate::assets::LabelAssets;
use crate::layout::{LayoutConfig, BACKGROUND, BORDER_COLOR, TEXT_COLOR};

/// Compose one label.
///
/// Pure function of its inputs: the same QR image, name, assets and layout
/// always give the same pixels.
pub fn compose_label(
    qr: &RgbaImage,
    desk_name: &str,
    assets: &LabelAssets,
    layout: &LayoutConfig,
) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(layout.label.width, layout.label.height, BACKGROUND);

    draw_border(&mut canvas, layout);

    let qr_resized = imageops::resize(
        qr,
        layout.qr_size.width,
        layout.qr_size.height,
        FilterType::CatmullRom,
    );
    paste_masked(
        &mut canvas,
        &qr_resized,
        layout.qr_offset.x as i64,
        layout.qr_offset.y as i64,
    );

    let text_x = assets
        .font
        .draw_centered(&mut canvas, layout.text_y as i32, desk_name, TEXT_COLOR);

    if let Some(logo) = &assets.logo {
        let x = (layout.label.width as i64 - logo.width() as i64).div_euclid(2);
        paste_masked(&mut canvas, logo, x, layout.logo_y as i64);
    }

    debug!(desk_name, text_x, logo = assets.logo.is_some(), "Composed label");
    canvas
}

// ============================================================================
// Drawing Utilities
// ============================================================================

/// Stroke the rounded border. The stroke grows inward from the outer edge.
fn draw_border(canvas: &mut RgbImage, layout: &LayoutConfig) {
    let inset = layout.border_inset as i64;
    let outer = RoundedRect {
        x0: inset,
        y0: inset,
        x1: layout.label.width as i64 - inset,
        y1: layout.label.height as i64 - inset,
        radius: layout.border_radius as i64,
    };
    draw_rounded_outline(canvas, &outer, layout.border_width as i64, BORDER_COLOR);
}

/// Axis-aligned rectangle with inclusive corners and circular corners.
#[derive(Debug, Clone, Copy)]
pub struct RoundedRect {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
    pub radius: i64,
}

impl RoundedRect {
    pub fn contains(&self, x: i64, y: i64) -> bool {
        if x < self.x0 || x > self.x1 || y < self.y0 || y > self.y1 {
            return false;
        }
        let r = self.radius.min((self.x1 - self.x0) / 2).min((self.y1 - self.y0) / 2).max(0);
        let cx = x.clamp(self.x0 + r, self.x1 - r);
        let cy = y.clamp(self.y0 + r, self.y1 - r);
        let (dx, dy) = (x - cx, y - cy);
        dx * dx + dy * dy <= r * r
    }

    fn shrink(&self, by: i64) -> Self {
        Self {
            x0: self.x0 + by,
            y0: self.y0 + by,
            x1: self.x1 - by,
            y1: self.y1 - by,
            radius: (self.radius - by).max(0),
        }
    }
}

pub fn draw_rounded_outline(canvas: &mut RgbImage, outer: &RoundedRect, width: i64, color: Rgb<u8>) {
    let inner = outer.shrink(width);
    let x_range = outer.x0.max(0)..=outer.x1.min(canvas.width() as i64 - 1);
    let y_range = outer.y0.max(0)..=outer.y1.min(canvas.height() as i64 - 1);

    for y in y_range {
        for x in x_range.clone() {
            if outer.contains(x, y) && !inner.contains(x, y) {
                canvas.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Paste `top` at `(x, y)` using its own alpha channel as the mask.
///
/// Transparent pixels leave the canvas untouched; anything outside the
/// canvas is clipped.
pub fn paste_masked(canvas: &mut RgbImage, top: &RgbaImage, x: i64, y: i64) {
    for (dx, dy, pixel) in top.enumerate_pixels() {
        let target_x = x + dx as i64;
        let target_y = y + dy as i64;
        if target_x < 0
            || target_y < 0
            || target_x >= canvas.width() as i64
            || target_y >= canvas.height() as i64
        {
            continue;
        }

        let alpha = pixel[3] as u16;
        if alpha == 0 {
            continue;
        }
        let bg = canvas.get_pixel_mut(target_x as u32, target_y as u32);
        if alpha == 255 {
            *bg = Rgb([pixel[0], pixel[1], pixel[2]]);
            continue;
        }
        for c in 0..3 {
            let blended = (pixel[c] as u16 * alpha + bg[c] as u16 * (255 - alpha) + 127) / 255;
            bg[c] = blended as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::LabelFont;
    use image::Rgba;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn assets(logo: Option<RgbaImage>) -> LabelAssets {
        LabelAssets {
            font: LabelFont::Bitmap,
            logo,
        }
    }

    fn checker_qr(size: u32) -> RgbaImage {
        RgbaImage::from_fn(size, size, |x, y| {
            if (x / 10 + y / 10) % 2 == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        })
    }

    #[test]
    fn label_has_fixed_size_and_white_background() {
        let layout = LayoutConfig::default();
        let label = compose_label(&checker_qr(100), "A1", &assets(None), &layout);
        assert_eq!(label.dimensions(), (800, 1000));
        assert_eq!(label.get_pixel(0, 0), &WHITE);
        assert_eq!(label.get_pixel(799, 999), &WHITE);
        assert_eq!(label.get_pixel(400, 1), &WHITE);
    }

    #[test]
    fn border_is_drawn_inside_the_inset() {
        let layout = LayoutConfig::default();
        let label = compose_label(&checker_qr(100), "A1", &assets(None), &layout);
        // Straight edges, midway along each side.
        assert_eq!(label.get_pixel(400, 10), &BORDER_COLOR);
        assert_eq!(label.get_pixel(400, 22), &BORDER_COLOR);
        assert_eq!(label.get_pixel(400, 23), &WHITE);
        assert_eq!(label.get_pixel(10, 500), &BORDER_COLOR);
        assert_eq!(label.get_pixel(790, 500), &BORDER_COLOR);
        assert_eq!(label.get_pixel(400, 990), &BORDER_COLOR);
        assert_eq!(label.get_pixel(9, 500), &WHITE);
        // Corners are rounded off.
        assert_eq!(label.get_pixel(10, 10), &WHITE);
        assert_eq!(label.get_pixel(790, 990), &WHITE);
    }

    #[test]
    fn qr_is_placed_at_fixed_offset() {
        let layout = LayoutConfig::default();
        let qr = RgbaImage::from_pixel(50, 50, Rgba([0, 0, 0, 255]));
        let label = compose_label(&qr, "", &assets(None), &layout);
        assert_eq!(label.get_pixel(170, 140), &Rgb([0, 0, 0]));
        assert_eq!(label.get_pixel(629, 599), &Rgb([0, 0, 0]));
        assert_eq!(label.get_pixel(169, 140), &WHITE);
        assert_eq!(label.get_pixel(630, 300), &WHITE);
        assert_eq!(label.get_pixel(300, 600), &WHITE);
    }

    #[test]
    fn transparent_qr_pixels_do_not_cover_canvas() {
        let layout = LayoutConfig::default();
        let qr = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 0]));
        let label = compose_label(&qr, "", &assets(None), &layout);
        assert_eq!(label.get_pixel(400, 370), &WHITE);
    }

    #[test]
    fn desk_name_is_drawn_at_text_line() {
        let layout = LayoutConfig::default();
        let label = compose_label(&checker_qr(100), "A1", &assets(None), &layout);
        let inked = (650..664).any(|y| (0..800).any(|x| label.get_pixel(x, y) == &Rgb([0, 0, 0])));
        assert!(inked, "desk name should ink the text line");
        let above = (610..650).any(|y| (0..800).any(|x| label.get_pixel(x, y) == &Rgb([0, 0, 0])));
        assert!(!above, "nothing is drawn between the QR and the text line");
    }

    #[test]
    fn logo_is_centered_at_logo_line() {
        let layout = LayoutConfig::default();
        let logo = RgbaImage::from_pixel(480, 120, Rgba([200, 0, 0, 255]));
        let label = compose_label(&checker_qr(100), "A1", &assets(Some(logo)), &layout);
        assert_eq!(label.get_pixel(160, 740), &Rgb([200, 0, 0]));
        assert_eq!(label.get_pixel(639, 859), &Rgb([200, 0, 0]));
        assert_eq!(label.get_pixel(159, 740), &WHITE);
        assert_eq!(label.get_pixel(640, 740), &WHITE);
        assert_eq!(label.get_pixel(400, 860), &WHITE);
    }

    #[test]
    fn missing_logo_only_changes_logo_region() {
        let layout = LayoutConfig::default();
        let qr = checker_qr(100);
        let logo = RgbaImage::from_pixel(480, 120, Rgba([200, 0, 0, 255]));
        let with_logo = compose_label(&qr, "B2", &assets(Some(logo)), &layout);
        let without = compose_label(&qr, "B2", &assets(None), &layout);

        for (x, y, pixel) in without.enumerate_pixels() {
            let in_logo = (160..640).contains(&x) && (740..860).contains(&y);
            if !in_logo {
                assert_eq!(pixel, with_logo.get_pixel(x, y), "pixel ({x}, {y}) differs");
            }
        }
    }

    #[test]
    fn composing_twice_is_identical() {
        let layout = LayoutConfig::default();
        let assets = assets(Some(RgbaImage::from_pixel(480, 120, Rgba([10, 20, 30, 128]))));
        let qr = checker_qr(77);
        let first = compose_label(&qr, "Table.No.5", &assets, &layout);
        let second = compose_label(&qr, "Table.No.5", &assets, &layout);
        assert_eq!(first, second);
    }

    #[test]
    fn paste_masked_blends_partial_alpha() {
        let mut canvas = RgbImage::from_pixel(2, 1, WHITE);
        let top = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([0, 0, 0, 128])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        paste_masked(&mut canvas, &top, 0, 0);
        assert_eq!(canvas.get_pixel(0, 0), &Rgb([127, 127, 127]));
        assert_eq!(canvas.get_pixel(1, 0), &WHITE);
    }

    #[test]
    fn paste_masked_clips_out_of_bounds() {
        let mut canvas = RgbImage::from_pixel(10, 10, WHITE);
        let top = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]));
        paste_masked(&mut canvas, &top, 6, -4);
        assert_eq!(canvas.get_pixel(9, 0), &Rgb([0, 0, 0]));
        assert_eq!(canvas.get_pixel(5, 0), &WHITE);
    }

    #[test]
    fn rounded_rect_excludes_corners() {
        let rect = RoundedRect { x0: 0, y0: 0, x1: 100, y1: 100, radius: 20 };
        assert!(rect.contains(50, 0));
        assert!(rect.contains(20, 20));
        assert!(!rect.contains(0, 0));
        assert!(!rect.contains(101, 50));
    }
}
