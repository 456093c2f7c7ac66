//! nucleoseg core - Basic data structures for nucleus segmentation
//!
//! This crate provides the containers shared by every stage of the
//! nucleus/nucleolus pipeline:
//!
//! - [`FImage`] - Floating-point intensity image
//! - [`Mask`] - Binary candidate mask
//! - [`LabelMap`] - Integer region labels (0 = background)
//!
//! All three are row-major with `(x, y)` addressing, `x` being the column.
//! Region centroids elsewhere in the workspace are reported as `(row, col)`.

pub mod error;
pub mod fimage;
pub mod labelmap;
pub mod mask;

pub use error::{Error, Result};
pub use fimage::FImage;
pub use labelmap::LabelMap;
pub use mask::Mask;
