//! Segmentation parameters
//!
//! Every tunable constant of the pipeline lives in [`SegmentConfig`]. The
//! struct (de)serializes with serde; missing fields take their defaults, so
//! a JSON file only needs the values it changes.

use crate::{SegmentError, SegmentResult};
use nucleoseg_filter::DEFAULT_BINS;
use serde::{Deserialize, Serialize};

/// Parameters for [`segment`](crate::segment)
///
/// | Field | Default | Valid range |
/// |---|---|---|
/// | `gamma` | 1.0 | finite, > 0 |
/// | `max_size_factor` | 2.5 | finite, > 0 |
/// | `nuclei_sensitivity` | 0.9 | (0, 1] |
/// | `nucleoli_sensitivity` | 0.95 | (0, 1] |
/// | `nucleus_min_size` | 10 | any |
/// | `nucleolus_min_size` | 5 | any |
/// | `nucleus_dilation_radius` | 1 | any |
/// | `nucleolus_dilation_radius` | 2 | any |
/// | `threshold_bins` | 256 | >= 3 |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// Gamma applied after normalization; > 1 darkens midtones
    pub gamma: f32,
    /// Nuclei larger than this multiple of the mean nucleus area are dropped
    pub max_size_factor: f64,
    /// Nucleus candidates exceed `lower_threshold * nuclei_sensitivity`
    pub nuclei_sensitivity: f32,
    /// Nucleolus candidates exceed `upper_threshold * nucleoli_sensitivity`
    pub nucleoli_sensitivity: f32,
    /// Smallest nucleus kept, in pixels
    pub nucleus_min_size: u32,
    /// Smallest nucleolus candidate kept, in pixels
    pub nucleolus_min_size: u32,
    /// Disk radius used to grow the nucleus mask before splitting
    pub nucleus_dilation_radius: u32,
    /// Disk radius used to grow nucleolus labels
    pub nucleolus_dilation_radius: u32,
    /// Histogram resolution of the three-class threshold
    pub threshold_bins: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            gamma: 1.0,
            max_size_factor: 2.5,
            nuclei_sensitivity: 0.9,
            nucleoli_sensitivity: 0.95,
            nucleus_min_size: 10,
            nucleolus_min_size: 5,
            nucleus_dilation_radius: 1,
            nucleolus_dilation_radius: 2,
            threshold_bins: DEFAULT_BINS,
        }
    }
}

impl SegmentConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set gamma
    pub fn with_gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set the oversized-nucleus factor
    pub fn with_max_size_factor(mut self, factor: f64) -> Self {
        self.max_size_factor = factor;
        self
    }

    /// Set nucleus sensitivity
    pub fn with_nuclei_sensitivity(mut self, sensitivity: f32) -> Self {
        self.nuclei_sensitivity = sensitivity;
        self
    }

    /// Set nucleolus sensitivity
    pub fn with_nucleoli_sensitivity(mut self, sensitivity: f32) -> Self {
        self.nucleoli_sensitivity = sensitivity;
        self
    }

    /// Set the minimum nucleus size
    pub fn with_nucleus_min_size(mut self, size: u32) -> Self {
        self.nucleus_min_size = size;
        self
    }

    /// Set the minimum nucleolus size
    pub fn with_nucleolus_min_size(mut self, size: u32) -> Self {
        self.nucleolus_min_size = size;
        self
    }

    /// Check every value against its valid range
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::InvalidConfig`] naming the first offending
    /// field.
    pub fn validate(&self) -> SegmentResult<()> {
        if !self.gamma.is_finite() || self.gamma <= 0.0 {
            return Err(invalid("gamma", self.gamma, "finite and > 0"));
        }
        if !self.max_size_factor.is_finite() || self.max_size_factor <= 0.0 {
            return Err(invalid(
                "max_size_factor",
                self.max_size_factor,
                "finite and > 0",
            ));
        }
        if !(self.nuclei_sensitivity > 0.0 && self.nuclei_sensitivity <= 1.0) {
            return Err(invalid(
                "nuclei_sensitivity",
                self.nuclei_sensitivity,
                "in (0, 1]",
            ));
        }
        if !(self.nucleoli_sensitivity > 0.0 && self.nucleoli_sensitivity <= 1.0) {
            return Err(invalid(
                "nucleoli_sensitivity",
                self.nucleoli_sensitivity,
                "in (0, 1]",
            ));
        }
        if self.threshold_bins < 3 {
            return Err(invalid("threshold_bins", self.threshold_bins, ">= 3"));
        }
        Ok(())
    }
}

fn invalid(field: &str, value: impl std::fmt::Display, range: &str) -> SegmentError {
    SegmentError::InvalidConfig(format!("{field} = {value}, expected {range}"))
}
