//! Nucleolus segmentation
//!
//! Nucleoli are the bright class of the three-class threshold. Candidates
//! are cleaned up like any binary mask and then grown by a small disk, so
//! that each nucleolus label covers its halo as well.

use crate::nucleus::threshold_mask;
use crate::{SegmentConfig, SegmentResult};
use nucleoseg_core::{FImage, LabelMap};
use nucleoseg_filter::Thresholds;
use nucleoseg_morph::{Sel, dilate_labels};
use nucleoseg_region::{relabel_sequential, segment_binary};

/// Segment nucleoli from a preprocessed image
///
/// Labels are numbered independently of the nuclei.
pub fn segment_nucleoli(
    image: &FImage,
    thresholds: &Thresholds,
    config: &SegmentConfig,
) -> SegmentResult<LabelMap> {
    let cut = thresholds.upper * config.nucleoli_sensitivity;
    let candidates = threshold_mask(image, cut)?;
    let labels = segment_binary(&candidates, config.nucleolus_min_size)?;
    let grown = dilate_labels(&labels, &Sel::create_disk(config.nucleolus_dilation_radius)?)?;
    let nucleoli = relabel_sequential(&grown);

    log::debug!(
        "segment_nucleoli: cut {cut:.4}, {} candidate px, {} nucleoli",
        candidates.count(),
        nucleoli.num_regions()
    );
    Ok(nucleoli)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nucleoseg_filter::{DEFAULT_BINS, multi_otsu_thresholds};
    use nucleoseg_test::synth::{CellScene, nucleus_with_two_nucleoli, two_separated_cells};

    fn run(image: &FImage) -> LabelMap {
        let t = multi_otsu_thresholds(image, DEFAULT_BINS).unwrap();
        segment_nucleoli(image, &t, &SegmentConfig::default()).unwrap()
    }

    #[test]
    fn test_nucleoli_grow_by_disk() {
        let nucleoli = run(&two_separated_cells().unwrap());
        // Radius 3 disks (29 px) grown by a radius 2 disk
        assert_eq!(nucleoli.areas()[1..], [73, 73]);
    }

    #[test]
    fn test_two_candidates_stay_separate() {
        let nucleoli = run(&nucleus_with_two_nucleoli().unwrap());
        assert_eq!(nucleoli.areas()[1..], [114, 156]);
    }

    #[test]
    fn test_specks_dropped() {
        let image = CellScene::new(40, 40)
            .disk(20, 20, 8, 0.5)
            .disk(20, 20, 2, 1.0)
            .rect(10, 10, 2, 2, 1.0)
            .render()
            .unwrap();
        let nucleoli = run(&image);
        assert_eq!(nucleoli.num_regions(), 1);
        assert_eq!(nucleoli.get(10, 10), 0);
    }
}
