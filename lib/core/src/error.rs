use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Descriptor length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Failed to decode image {}: {message}", .path.display())]
    ImageDecode { path: PathBuf, message: String },

    #[error("Malformed descriptor CSV at line {line}: {message}")]
    Csv { line: usize, message: String },

    #[error("Target embedding not found for key: {0}")]
    MissingTarget(String),

    #[error("No images found in directory: {}", .0.display())]
    EmptyDatabase(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
