//! Error types for batch processing

use thiserror::Error;

/// Errors raised while preparing, running or exporting a batch
#[derive(Debug, Error)]
pub enum BatchError {
    /// Segmentation or metrics error
    #[error("segmentation error: {0}")]
    Segment(#[from] nucleoseg_segment::SegmentError),

    /// Storage or reporting error
    #[error("I/O error: {0}")]
    Io(#[from] nucleoseg_io::IoError),
}

/// Result type for batch operations
pub type BatchResult<T> = Result<T, BatchError>;
