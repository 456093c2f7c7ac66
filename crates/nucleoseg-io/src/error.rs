//! I/O error types
//!
//! Every storage and reporting function maps its underlying library errors
//! into `IoError`, so callers only need to handle one error type.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for image, label-map and report I/O
#[derive(Error, Debug)]
pub enum IoError {
    /// The input path does not exist
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Standard I/O error (permission denied, disk full, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The TIFF decoder returned an error
    #[error("decode error: {0}")]
    DecodeError(String),

    /// The TIFF encoder returned an error
    #[error("encode error: {0}")]
    EncodeError(String),

    /// The file is valid but holds data this crate does not accept
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// CSV writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An error from the core library (e.g. dimension mismatch)
    #[error("core error: {0}")]
    Core(#[from] nucleoseg_core::Error),
}

/// Convenience alias for I/O results
pub type IoResult<T> = Result<T, IoError>;
