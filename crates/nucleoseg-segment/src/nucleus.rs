//! Nucleus segmentation
//!
//! Nuclei are the dim class of the three-class threshold. Touching nuclei
//! are split by a distance-transform watershed, then regions on the image
//! border, specks and outliers much larger than the average nucleus are
//! removed.

use crate::{SegmentConfig, SegmentResult};
use nucleoseg_core::{FImage, LabelMap, Mask};
use nucleoseg_filter::Thresholds;
use nucleoseg_morph::{Sel, dilate};
use nucleoseg_region::{
    ConnectivityType, WatershedOptions, clear_border_labels, distance_transform, fill_holes,
    find_local_maxima, markers_from_maxima, relabel_sequential, remove_oversized_regions,
    remove_small_regions, watershed_from_markers,
};

/// Segment nuclei from a preprocessed image
///
/// # Arguments
///
/// * `image` - Normalized (and gamma corrected) image
/// * `thresholds` - Three-class cuts of `image`
/// * `config` - Segmentation parameters
///
/// # Returns
///
/// A nucleus label map with contiguous labels.
///
/// # Limitations
///
/// Watershed markers are the 8-neighbor maxima of the distance map. A
/// round or mildly oval nucleus has one peak, but a long thin one has a
/// ridge whose maxima are not all adjacent, so it is cut into several
/// regions (a 16x7 ellipse gives three). Only the fragment overlapping a
/// nucleolus survives matching, and its `fraction_area` is then measured
/// against that fragment rather than the whole nucleus.
pub fn segment_nuclei(
    image: &FImage,
    thresholds: &Thresholds,
    config: &SegmentConfig,
) -> SegmentResult<LabelMap> {
    let cut = thresholds.lower * config.nuclei_sensitivity;
    let candidates = threshold_mask(image, cut)?;
    let filled = fill_holes(&candidates, ConnectivityType::FourWay)?;
    let grown = dilate(&filled, &Sel::create_disk(config.nucleus_dilation_radius)?)?;

    // Split touching nuclei along the valleys of the distance map
    let dist = distance_transform(&grown)?;
    let maxima = find_local_maxima(&dist, &grown)?;
    let markers = markers_from_maxima(&maxima)?;
    let flooded = watershed_from_markers(
        &dist.map(|d| -d),
        &markers,
        &grown,
        &WatershedOptions::default(),
    )?;

    let cleared = clear_border_labels(&flooded);
    let sized = relabel_sequential(&remove_small_regions(&cleared, config.nucleus_min_size));
    let nuclei = remove_oversized_regions(&sized, config.max_size_factor)?;

    log::debug!(
        "segment_nuclei: cut {cut:.4}, {} candidate px, {} markers, {} regions after cleanup, {} kept",
        candidates.count(),
        markers.num_regions(),
        sized.num_regions(),
        nuclei.num_regions()
    );
    Ok(nuclei)
}

/// Pixels strictly brighter than `cut`
pub(crate) fn threshold_mask(image: &FImage, cut: f32) -> SegmentResult<Mask> {
    let data = image.data().iter().map(|&v| v > cut).collect();
    Ok(Mask::from_data(image.width(), image.height(), data)?)
}
