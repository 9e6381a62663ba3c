//! Input collection and per-file decoding.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::{debug, warn};

use crate::error::AppError;

/// Extensions picked up when a directory is given as input.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// One uploaded QR image, not yet decoded.
#[derive(Debug, Clone)]
pub struct QrSource {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A decoded QR image with the desk name taken from its file name.
#[derive(Debug, Clone)]
pub struct DecodedQr {
    pub desk_name: String,
    pub image: RgbaImage,
}

impl QrSource {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let bytes = std::fs::read(path).map_err(|source| AppError::InputError {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self {
            file_name: display_file_name(path),
            bytes,
        })
    }

    pub fn desk_name(&self) -> String {
        desk_name_from_file_name(&self.file_name)
    }

    pub fn decode(&self) -> Result<DecodedQr, AppError> {
        let image = image::load_from_memory(&self.bytes).map_err(|e| AppError::DecodeError {
            file: self.file_name.clone(),
            reason: e.to_string(),
        })?;
        debug!(
            file = %self.file_name,
            width = image.width(),
            height = image.height(),
            "Decoded QR image"
        );
        Ok(DecodedQr {
            desk_name: self.desk_name(),
            image: image.to_rgba8(),
        })
    }
}

/// Base name with only the final extension removed.
///
/// `"A1.png"` gives `"A1"`, `"Table.No.5.jpg"` gives `"Table.No.5"`. A
/// leading dot does not start an extension, so `".png"` stays `".png"`.
pub fn desk_name_from_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    match base.rfind('.') {
        Some(dot) if base[..dot].chars().any(|c| c != '.') => base[..dot].to_string(),
        _ => base.to_string(),
    }
}

/// The file name shown in errors and reports for `path`.
pub fn display_file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn has_accepted_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| ACCEPTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Expand command-line inputs into an ordered list of image paths.
///
/// Files are kept as given. Directories contribute their direct children
/// with an accepted extension, sorted by file name.
pub fn collect_input_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, AppError> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let entries = std::fs::read_dir(input).map_err(|source| AppError::InputError {
                path: input.display().to_string(),
                source,
            })?;
            let mut found = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|source| AppError::InputError {
                    path: input.display().to_string(),
                    source,
                })?;
                let path = entry.path();
                if !has_accepted_extension(&path) {
                    continue;
                }
                if path.is_file() {
                    found.push(path);
                } else {
                    warn!(path = %path.display(), "Ignoring non-file directory entry");
                }
            }
            found.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
            debug!(dir = %input.display(), files = found.len(), "Expanded input directory");
            paths.extend(found);
        } else {
            paths.push(input.clone());
        }
    }
    Ok(paths)
}
