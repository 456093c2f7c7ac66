//! Error types for nucleoseg-region

use thiserror::Error;

/// Errors that can occur during region processing operations
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] nucleoseg_core::Error),

    /// Morphology error
    #[error("morphology error: {0}")]
    Morph(#[from] nucleoseg_morph::MorphError),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
