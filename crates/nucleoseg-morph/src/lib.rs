//! nucleoseg-morph - Morphological operations
//!
//! This crate provides the structuring elements and morphology used by the
//! segmenters:
//!
//! - Disk and cross structuring elements
//! - Binary dilation and erosion of [`Mask`](nucleoseg_core::Mask)
//! - Grayscale (maximum) dilation of [`LabelMap`](nucleoseg_core::LabelMap),
//!   which grows every region while the larger label wins on contact

pub mod binary;
mod error;
pub mod label;
pub mod sel;

pub use error::{MorphError, MorphResult};
pub use sel::Sel;

pub use binary::{dilate, erode};
pub use label::dilate_labels;
