//! nucleoseg-segment - Nucleus and nucleolus segmentation
//!
//! This crate turns a fluorescence image of yeast cells into paired
//! nucleus/nucleolus label maps and per-cell measurements:
//!
//! - [`segment`] runs preprocessing, thresholding, both segmenters and the
//!   matcher
//! - [`segment_nuclei`] / [`segment_nucleoli`] run one segmenter on a
//!   preprocessed image
//! - [`match_regions`] pairs nuclei with nucleoli under shared ids
//! - [`compute_metrics`] measures every matched cell
//!
//! All tunables are in [`SegmentConfig`].
//!
//! # Examples
//!
//! ```
//! use nucleoseg_segment::{SegmentConfig, compute_metrics, segment};
//! use nucleoseg_test::synth::two_separated_cells;
//!
//! let image = two_separated_cells().unwrap();
//! let result = segment(&image, &SegmentConfig::default()).unwrap();
//! assert_eq!(result.num_cells(), 2);
//!
//! let metrics = compute_metrics(&image, &result.nuclei, &result.nucleoli).unwrap();
//! assert_eq!(metrics.len(), 2);
//! ```

pub mod config;
mod error;
pub mod matcher;
pub mod metrics;
pub mod nucleolus;
pub mod nucleus;
pub mod pipeline;

pub use config::SegmentConfig;
pub use error::{SegmentError, SegmentResult};

pub use matcher::{MatchResult, MatchedPair, match_regions};
pub use metrics::{MetricsRecord, RegionMetrics, compute_metrics, region_metrics};
pub use nucleolus::segment_nucleoli;
pub use nucleus::segment_nuclei;
pub use pipeline::{SegmentDiagnostics, Segmentation, segment};
