use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompareError {
    /// OCR engine failed on one image. Recoverable: the image is skipped.
    #[error("text recognition failed for item {index}: {message}")]
    Recognition { index: usize, message: String },

    #[error("failed to load reference text from {path}: {source}")]
    ReferenceLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("diff view unavailable: {0}")]
    DiffUnavailable(String),

    #[error("invalid risk pattern for '{label}': {source}")]
    InvalidPattern {
        label: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CompareError>;
