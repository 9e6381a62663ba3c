//! qr-desk-tags: turn a folder of QR codes into printable desk tags.
//!
//! Each QR image becomes one 800x1000 label (blue rounded border, the QR
//! code, the desk name taken from the file name and an optional logo).
//! Labels are laid out nine to a page in a 3x3 grid and exported as a
//! multi-page PDF.

pub mod assets;
pub mod batch;
pub mod bitmap_font;
pub mod error;
pub mod input;
pub mod label;
pub mod layout;
pub mod page;
pub mod pdf;
pub mod text;

// Re-exports for convenience
pub use assets::LabelAssets;
pub use batch::{run_batch, run_batch_paths, BatchOutput, BatchReport, DecodePolicy};
pub use error::AppError;
pub use input::{desk_name_from_file_name, QrSource};
pub use label::compose_label;
pub use layout::LayoutConfig;
pub use page::{paginate, PageBuilder, Paginator};
pub use pdf::encode_pdf;
pub use text::LabelFont;
