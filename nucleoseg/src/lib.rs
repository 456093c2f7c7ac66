//! nucleoseg - Nucleus and nucleolus segmentation for Rust
//!
//! Segments nuclei and their nucleoli in single-channel fluorescence
//! images, pairs each nucleus with one nucleolus and measures shape,
//! intensity and cross-entity features per cell.
//!
//! # Overview
//!
//! - [`segment`](mod@segment) - Per-image pipeline, matching and metrics
//! - [`filter`] - Normalization, gamma and three-class thresholds
//! - [`region`] - Connected components, watershed, region properties
//! - [`morph`] - Structuring elements, mask and label dilation
//! - [`io`] - TIFF storage and CSV reports
//! - [`batch`] - Parallel processing of many images with cancellation
//! - [`output`] - On-disk layout of batch results
//!
//! # Example
//!
//! ```
//! use nucleoseg::segment::{SegmentConfig, compute_metrics, segment};
//! use nucleoseg::FImage;
//!
//! let image = FImage::from_fn(64, 64, |x, y| {
//!     let d2 = (x as f32 - 32.0).powi(2) + (y as f32 - 32.0).powi(2);
//!     if d2 <= 9.0 { 1.0 } else if d2 <= 100.0 { 0.5 } else { 0.0 }
//! })
//! .unwrap();
//!
//! let result = segment(&image, &SegmentConfig::default()).unwrap();
//! let metrics = compute_metrics(&image, &result.nuclei, &result.nucleoli).unwrap();
//! assert_eq!(metrics.len(), result.num_cells());
//! ```

// Re-export core types (primary data structures used everywhere)
pub use nucleoseg_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use nucleoseg_filter as filter;
pub use nucleoseg_io as io;
pub use nucleoseg_morph as morph;
pub use nucleoseg_region as region;
pub use nucleoseg_segment as segment;

pub mod batch;
mod batch_error;
pub mod output;

pub use batch::{
    BatchItem, CancelToken, ExistingMasks, ImageOutcome, ImageReport, process_batch,
    process_item,
};
pub use batch_error::{BatchError, BatchResult};
