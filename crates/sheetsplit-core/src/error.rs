use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("no text found in the selected area on page {page}")]
    NoTextFound { page: usize },

    #[error("no sheets selected to save")]
    NoSelection,

    #[error("failed to open {path} as PDF: {reason}")]
    DocumentOpen { path: PathBuf, reason: String },

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftoppm not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftoppmNotFound,

    #[error("{tool} failed with exit code {code}: {stderr}")]
    ToolFailed {
        tool: &'static str,
        code: i32,
        stderr: String,
    },

    #[error("scale factor must be positive, got {0}")]
    InvalidScale(f32),

    #[error("invalid rectangle: {0}")]
    InvalidRect(String),

    #[error("invalid page range: {0}")]
    InvalidRange(String),

    #[error("page {page} does not exist (document has {page_count} pages)")]
    PageOutOfRange { page: usize, page_count: usize },

    #[error("record {index} does not exist ({len} records)")]
    RecordOutOfRange { index: usize, len: usize },

    #[error("'{command}' is not available while {state}")]
    InvalidCommand { command: String, state: String },

    #[error("failed to split page: {0}")]
    Split(String),

    #[error("output directory {0} does not exist")]
    OutputDir(PathBuf),

    #[error("failed to load manifest from {path}: {reason}")]
    ManifestLoad { path: PathBuf, reason: String },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
