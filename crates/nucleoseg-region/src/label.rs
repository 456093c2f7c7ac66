//! Label-map utilities
//!
//! Pure transforms over [`LabelMap`]: each function borrows its input and
//! returns a new map. Functions documented as relabeling produce contiguous
//! labels `1..=K`, numbered in ascending order of the original labels.

use crate::conncomp::{ConnectivityType, label_connected_components};
use crate::error::{RegionError, RegionResult};
use nucleoseg_core::{LabelMap, Mask};

/// Pixel count of every positive label, indexed by label
///
/// Index 0 (background) is reported as 0 so that `areas[l] > 0` holds
/// exactly for the labels present.
pub fn region_areas(labels: &LabelMap) -> Vec<u32> {
    let mut areas = labels.areas();
    areas[0] = 0;
    areas
}

/// Renumber labels to `1..=K` keeping their relative order
///
/// # Examples
///
/// ```
/// use nucleoseg_core::LabelMap;
/// use nucleoseg_region::relabel_sequential;
///
/// let labels = LabelMap::from_data(4, 1, vec![0, 7, 3, 7]).unwrap();
/// let relabeled = relabel_sequential(&labels);
/// assert_eq!(relabeled.data(), &[0, 2, 1, 2]);
/// ```
pub fn relabel_sequential(labels: &LabelMap) -> LabelMap {
    let areas = region_areas(labels);
    let mut lut = vec![0u32; areas.len()];
    let mut next = 0u32;
    for (label, &area) in areas.iter().enumerate().skip(1) {
        if area > 0 {
            next += 1;
            lut[label] = next;
        }
    }
    labels.map_labels(&lut)
}

/// Drop regions with fewer than `min_size` pixels
///
/// Surviving labels keep their values; call [`relabel_sequential`] to close
/// the gaps.
pub fn remove_small_regions(labels: &LabelMap, min_size: u32) -> LabelMap {
    let areas = region_areas(labels);
    let lut: Vec<u32> = areas
        .iter()
        .enumerate()
        .map(|(label, &area)| if area >= min_size { label as u32 } else { 0 })
        .collect();
    labels.map_labels(&lut)
}

/// Drop every region that has a pixel on the image border
///
/// Surviving labels keep their values.
pub fn clear_border_labels(labels: &LabelMap) -> LabelMap {
    let (width, height) = labels.dimensions();
    let mut lut: Vec<u32> = (0..=labels.max_label()).collect();
    for x in 0..width {
        lut[labels.get(x, 0) as usize] = 0;
        lut[labels.get(x, height - 1) as usize] = 0;
    }
    for y in 0..height {
        lut[labels.get(0, y) as usize] = 0;
        lut[labels.get(width - 1, y) as usize] = 0;
    }
    labels.map_labels(&lut)
}

/// Label a binary mask and clean it up
///
/// Steps, in order:
/// 1. 8-connected component labeling
/// 2. Drop components with area < `min_size`
/// 3. Drop components touching the image border
/// 4. Relabel contiguously
///
/// # Arguments
///
/// * `mask` - Candidate foreground
/// * `min_size` - Smallest component area kept, in pixels
pub fn segment_binary(mask: &Mask, min_size: u32) -> RegionResult<LabelMap> {
    let labeled = label_connected_components(mask, ConnectivityType::EightWay)?;
    let found = labeled.num_regions();

    let sized = remove_small_regions(&labeled, min_size);
    let after_small = sized.num_regions();

    let cleared = clear_border_labels(&sized);
    let after_border = cleared.num_regions();

    log::debug!(
        "segment_binary: {found} components, {} below {min_size} px, {} on border",
        found - after_small,
        after_small - after_border
    );
    Ok(relabel_sequential(&cleared))
}

/// Drop regions much larger than the average region
///
/// The mean area is taken over all regions of the input. Regions with
/// `area > max_size_factor * mean` are removed and the survivors are
/// relabeled contiguously in their original order. An empty map is returned
/// unchanged.
///
/// # Errors
///
/// Returns [`RegionError::InvalidParameters`] unless `max_size_factor` is
/// finite and > 0.
pub fn remove_oversized_regions(labels: &LabelMap, max_size_factor: f64) -> RegionResult<LabelMap> {
    if !max_size_factor.is_finite() || max_size_factor <= 0.0 {
        return Err(RegionError::InvalidParameters(format!(
            "max_size_factor must be finite and > 0, got {max_size_factor}"
        )));
    }

    let areas = region_areas(labels);
    let present: Vec<u32> = areas.iter().copied().filter(|&a| a > 0).collect();
    if present.is_empty() {
        return Ok(labels.clone());
    }
    let mean = present.iter().map(|&a| a as f64).sum::<f64>() / present.len() as f64;
    let limit = max_size_factor * mean;

    let lut: Vec<u32> = areas
        .iter()
        .enumerate()
        .map(|(label, &area)| {
            if area > 0 && area as f64 <= limit {
                label as u32
            } else {
                0
            }
        })
        .collect();
    let kept = labels.map_labels(&lut);
    log::debug!(
        "remove_oversized_regions: mean area {mean:.1}, {} of {} regions above {limit:.1} px",
        present.len() - kept.num_regions(),
        present.len()
    );
    Ok(relabel_sequential(&kept))
}
