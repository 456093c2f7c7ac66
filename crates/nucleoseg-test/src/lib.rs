//! nucleoseg-test - Regression test framework for nucleoseg
//!
//! This crate provides a small regression test harness and synthetic
//! fluorescence images:
//!
//! - [`RegParams`] counts and reports value and label-map comparisons
//! - [`synth`] draws cells (dim nucleus disks holding bright nucleoli) on a
//!   dark background
//!
//! # Usage
//!
//! ```ignore
//! use nucleoseg_test::RegParams;
//!
//! let mut rp = RegParams::new("segment");
//! rp.compare_values(2.0, pairs as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" (default) or "display"

mod error;
mod params;
pub mod synth;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};
