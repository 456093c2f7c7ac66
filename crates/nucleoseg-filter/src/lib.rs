//! nucleoseg-filter - Intensity preprocessing and thresholding
//!
//! This crate provides the first stage of the segmentation pipeline:
//!
//! - Min/max normalization to `[0, 1]`
//! - Gamma correction
//! - Three-class (two-cut) Otsu thresholding

mod error;
pub mod preprocess;
pub mod threshold;

pub use error::{FilterError, FilterResult};

pub use preprocess::{gamma_correct, normalize};
pub use threshold::{DEFAULT_BINS, Thresholds, multi_otsu_thresholds};
