//! Error types for nucleoseg-segment

use thiserror::Error;

/// Errors that can occur during segmentation
#[derive(Debug, Error)]
pub enum SegmentError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] nucleoseg_core::Error),

    /// Preprocessing or thresholding error
    #[error("filter error: {0}")]
    Filter(#[from] nucleoseg_filter::FilterError),

    /// Morphology error
    #[error("morphology error: {0}")]
    Morph(#[from] nucleoseg_morph::MorphError),

    /// Region processing error
    #[error("region error: {0}")]
    Region(#[from] nucleoseg_region::RegionError),

    /// A configuration value is out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for segmentation operations
pub type SegmentResult<T> = Result<T, SegmentError>;
