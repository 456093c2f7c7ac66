//! End-to-end segmentation of one image
//!
//! raw image -> normalized, gamma-corrected image -> three-class cuts ->
//! nucleus and nucleolus label maps -> matched maps sharing pair ids.

use crate::matcher::{MatchedPair, match_regions};
use crate::nucleolus::segment_nucleoli;
use crate::nucleus::segment_nuclei;
use crate::{SegmentConfig, SegmentResult};
use nucleoseg_core::{FImage, LabelMap};
use nucleoseg_filter::{FilterError, Thresholds, gamma_correct, multi_otsu_thresholds};

/// What happened while segmenting one image
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentDiagnostics {
    /// The image had no contrast; nothing was segmented
    pub degenerate: bool,
    /// Cuts used for the candidate masks
    pub thresholds: Option<Thresholds>,
    /// Nuclei found before matching
    pub nuclei_found: usize,
    /// Nucleoli found before matching
    pub nucleoli_found: usize,
    /// Nuclei dropped for lack of a nucleolus
    pub unmatched_nuclei: usize,
    /// Nucleoli no nucleus claimed
    pub unmatched_nucleoli: usize,
}

/// Matched label maps of one image
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    /// Nuclei labeled by pair id
    pub nuclei: LabelMap,
    /// Nucleoli labeled by pair id
    pub nucleoli: LabelMap,
    /// Matched pairs in id order
    pub pairs: Vec<MatchedPair>,
    /// Counts and flags for reporting
    pub diagnostics: SegmentDiagnostics,
}

impl Segmentation {
    /// Segmentation with no regions
    fn empty(width: u32, height: u32, diagnostics: SegmentDiagnostics) -> SegmentResult<Self> {
        Ok(Segmentation {
            nuclei: LabelMap::new(width, height)?,
            nucleoli: LabelMap::new(width, height)?,
            pairs: Vec::new(),
            diagnostics,
        })
    }

    /// True if no cell was found
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of matched cells
    pub fn num_cells(&self) -> usize {
        self.pairs.len()
    }
}

/// Segment and match nuclei and nucleoli in one image
///
/// An image without contrast is not an error: it yields empty maps with
/// `diagnostics.degenerate` set. Finding no regions is not an error either;
/// check [`Segmentation::is_empty`].
///
/// # Errors
///
/// Returns [`SegmentError::InvalidConfig`](crate::SegmentError::InvalidConfig)
/// for out-of-range parameters, or a lower-level error for anything else
/// that fails.
///
/// # Examples
///
/// ```
/// use nucleoseg_core::FImage;
/// use nucleoseg_segment::{SegmentConfig, segment};
///
/// let dark = FImage::new(100, 100).unwrap();
/// let result = segment(&dark, &SegmentConfig::default()).unwrap();
/// assert!(result.is_empty());
/// assert!(result.diagnostics.degenerate);
/// ```
pub fn segment(image: &FImage, config: &SegmentConfig) -> SegmentResult<Segmentation> {
    config.validate()?;
    let (width, height) = image.dimensions();

    let prepared = gamma_correct(image, config.gamma)
        .and_then(|pre| multi_otsu_thresholds(&pre, config.threshold_bins).map(|t| (pre, t)));
    let (pre, thresholds) = match prepared {
        Ok(ok) => ok,
        Err(FilterError::DegenerateImage { value }) => {
            log::warn!("segment: {width}x{height} image is constant ({value}); skipping");
            let diagnostics = SegmentDiagnostics {
                degenerate: true,
                ..Default::default()
            };
            return Segmentation::empty(width, height, diagnostics);
        }
        Err(e) => return Err(e.into()),
    };

    let nuclei = segment_nuclei(&pre, &thresholds, config)?;
    let nucleoli = segment_nucleoli(&pre, &thresholds, config)?;
    let matched = match_regions(&nuclei, &nucleoli)?;

    let diagnostics = SegmentDiagnostics {
        degenerate: false,
        thresholds: Some(thresholds),
        nuclei_found: nuclei.num_regions(),
        nucleoli_found: nucleoli.num_regions(),
        unmatched_nuclei: matched.unmatched_nuclei,
        unmatched_nucleoli: matched.unmatched_nucleoli,
    };
    log::info!(
        "segment: {} cells ({} nuclei, {} nucleoli found)",
        matched.pairs.len(),
        diagnostics.nuclei_found,
        diagnostics.nucleoli_found
    );
    Ok(Segmentation {
        nuclei: matched.nuclei,
        nucleoli: matched.nucleoli,
        pairs: matched.pairs,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nucleoseg_test::synth::two_separated_cells;

    #[test]
    fn test_degenerate_image() {
        let flat = FImage::new_with_value(100, 100, 0.3).unwrap();
        let result = segment(&flat, &SegmentConfig::default()).unwrap();
        assert!(result.diagnostics.degenerate);
        assert!(result.nuclei.is_empty());
        assert!(result.nucleoli.is_empty());
        assert_eq!(result.nuclei.dimensions(), (100, 100));
    }

    #[test]
    fn test_invalid_config_is_error() {
        let image = two_separated_cells().unwrap();
        let config = SegmentConfig::default().with_gamma(-1.0);
        assert!(segment(&image, &config).is_err());
    }

    #[test]
    fn test_two_cells() {
        let result = segment(&two_separated_cells().unwrap(), &SegmentConfig::default()).unwrap();
        assert_eq!(result.num_cells(), 2);
        assert_eq!(result.diagnostics.unmatched_nuclei, 0);
        assert_eq!(result.diagnostics.unmatched_nucleoli, 0);
        assert!(result.diagnostics.thresholds.is_some());
    }
}
