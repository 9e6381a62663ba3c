//! Label and page geometry.
//!
//! Every placement used by the composer and paginator lives here. The
//! defaults reproduce the standard RestoSuite desk tag: an 800x1000 label
//! with a blue rounded border, a 460x460 QR code, the desk name in 72px bold
//! and a 480x120 logo strip, laid out nine to a page in a 3x3 grid.

use image::Rgb;
use serde::Serialize;

use crate::error::AppError;

/// Border stroke color, `#237EFB`.
pub const BORDER_COLOR: Rgb<u8> = Rgb([0x23, 0x7E, 0xFB]);

pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
pub const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Offset {
    pub x: u32,
    pub y: u32,
}

/// Fixed geometry for one label and the page grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutConfig {
    pub label: Size,
    pub qr_size: Size,
    pub qr_offset: Offset,
    /// Distance from each label edge to the outer edge of the border.
    pub border_inset: u32,
    pub border_radius: u32,
    pub border_width: u32,
    /// Top of the desk-name text line.
    pub text_y: u32,
    /// Font size in pixels per em.
    pub font_size: f32,
    pub logo_size: Size,
    pub logo_y: u32,
    pub cols: u32,
    pub rows: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            label: Size::new(800, 1000),
            qr_size: Size::new(460, 460),
            qr_offset: Offset { x: 170, y: 140 },
            border_inset: 10,
            border_radius: 40,
            border_width: 13,
            text_y: 650,
            font_size: 72.0,
            logo_size: Size::new(480, 120),
            logo_y: 740,
            cols: 3,
            rows: 3,
        }
    }
}

impl LayoutConfig {
    /// Grid capacity. Always `cols * rows`.
    pub fn labels_per_page(&self) -> usize {
        (self.cols * self.rows) as usize
    }

    pub fn page_size(&self) -> Size {
        Size::new(self.label.width * self.cols, self.label.height * self.rows)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.cols == 0 || self.rows == 0 {
            return Err(AppError::LayoutError(format!(
                "grid must have at least one cell, got {}x{}",
                self.cols, self.rows
            )));
        }
        if self.label.width == 0 || self.label.height == 0 {
            return Err(AppError::LayoutError("label size must be non-zero".into()));
        }
        if self.qr_offset.x + self.qr_size.width > self.label.width
            || self.qr_offset.y + self.qr_size.height > self.label.height
        {
            return Err(AppError::LayoutError(
                "QR region extends past the label".into(),
            ));
        }
        if self.logo_size.width > self.label.width
            || self.logo_y + self.logo_size.height > self.label.height
        {
            return Err(AppError::LayoutError(
                "logo region extends past the label".into(),
            ));
        }
        if 2 * self.border_inset >= self.label.width.min(self.label.height) {
            return Err(AppError::LayoutError(
                "border inset leaves no room inside the label".into(),
            ));
        }
        if self.font_size.is_nan() || self.font_size <= 0.0 {
            return Err(AppError::LayoutError(format!(
                "font size must be positive, got {}",
                self.font_size
            )));
        }
        Ok(())
    }
}
