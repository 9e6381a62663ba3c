use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to read input {path}: {source}")]
    InputError {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode image {file}: {reason}")]
    DecodeError { file: String, reason: String },
    #[error("Invalid layout: {0}")]
    LayoutError(String),
    #[error("Failed to create PDF: {0}")]
    PdfError(String),
    #[error("Failed to write preview: {0}")]
    PreviewError(String),
    #[error("Failed to write report: {0}")]
    ReportError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
