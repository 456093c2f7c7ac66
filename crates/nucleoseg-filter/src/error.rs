//! Error types for nucleoseg-filter

use thiserror::Error;

/// Errors that can occur during preprocessing and thresholding
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] nucleoseg_core::Error),

    /// The image carries no contrast (every pixel has the same value)
    #[error("degenerate image: every pixel equals {value}")]
    DegenerateImage {
        /// The single value found in the image
        value: f32,
    },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
