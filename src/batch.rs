//! Batch runner: decode every input, compose labels, paginate.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use image::RgbImage;
use serde::Serialize;
use tracing::{info, warn};

use crate::assets::LabelAssets;
use crate::error::AppError;
use crate::input::{display_file_name, DecodedQr, QrSource};
use crate::label::compose_label;
use crate::layout::LayoutConfig;
use crate::page::PageBuilder;

/// What to do when an input cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodePolicy {
    /// Abort the whole batch on the first bad file.
    #[default]
    FailFast,
    /// Leave the bad file out and record it in the report.
    Skip,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub file: String,
    pub reason: String,
}

/// Summary of one run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Local>,
    pub policy: DecodePolicy,
    pub inputs: usize,
    pub labels: usize,
    pub pages: usize,
    pub desk_names: Vec<String>,
    pub skipped: Vec<SkippedFile>,
    pub logo: bool,
    pub fallback_font: bool,
    pub layout: LayoutConfig,
}

#[derive(Debug)]
pub struct BatchOutput {
    pub pages: Vec<RgbImage>,
    pub report: BatchReport,
}

impl BatchOutput {
    /// The first page, shown before export.
    pub fn preview(&self) -> Option<&RgbImage> {
        self.pages.first()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Run one batch over in-memory sources.
///
/// Labels keep the order of `sources`. Under [`DecodePolicy::FailFast`] the
/// first undecodable source aborts with its decode error; under
/// [`DecodePolicy::Skip`] it is dropped and listed in the report.
pub fn run_batch(
    sources: &[QrSource],
    assets: &LabelAssets,
    layout: &LayoutConfig,
    policy: DecodePolicy,
) -> Result<BatchOutput, AppError> {
    let inputs = sources
        .iter()
        .map(|source| (source.file_name.clone(), source.decode()));
    run_inputs(inputs, sources.len(), assets, layout, policy)
}

/// Run one batch over files on disk, reading each one only when its turn
/// comes.
///
/// A file that cannot be read is treated like one that cannot be decoded:
/// it aborts the batch under [`DecodePolicy::FailFast`] and is skipped and
/// reported under [`DecodePolicy::Skip`].
pub fn run_batch_paths(
    paths: &[PathBuf],
    assets: &LabelAssets,
    layout: &LayoutConfig,
    policy: DecodePolicy,
) -> Result<BatchOutput, AppError> {
    let inputs = paths.iter().map(|path| {
        let decoded = QrSource::from_path(path).and_then(|source| source.decode());
        (display_file_name(path), decoded)
    });
    run_inputs(inputs, paths.len(), assets, layout, policy)
}

fn run_inputs<I>(
    inputs: I,
    count: usize,
    assets: &LabelAssets,
    layout: &LayoutConfig,
    policy: DecodePolicy,
) -> Result<BatchOutput, AppError>
where
    I: Iterator<Item = (String, Result<DecodedQr, AppError>)>,
{
    layout.validate()?;

    let mut builder = PageBuilder::new(layout);
    let mut desk_names = Vec::with_capacity(count);
    let mut skipped = Vec::new();

    for (file_name, result) in inputs {
        let decoded = match result {
            Ok(decoded) => decoded,
            Err(e) if policy == DecodePolicy::Skip => {
                warn!(file = %file_name, "Skipping input: {e}");
                skipped.push(SkippedFile {
                    file: file_name,
                    reason: e.to_string(),
                });
                continue;
            }
            Err(e) => return Err(e),
        };

        let label = compose_label(&decoded.image, &decoded.desk_name, assets, layout);
        builder.push(label);
        desk_names.push(decoded.desk_name);
    }

    let labels = builder.labels_seen();
    let pages = builder.finish();

    info!(
        inputs = count,
        labels,
        pages = pages.len(),
        skipped = skipped.len(),
        "Batch complete"
    );

    let report = BatchReport {
        generated_at: Local::now(),
        policy,
        inputs: count,
        labels,
        pages: pages.len(),
        desk_names,
        skipped,
        logo: assets.logo.is_some(),
        fallback_font: assets.font.is_fallback(),
        layout: layout.clone(),
    };

    Ok(BatchOutput { pages, report })
}
