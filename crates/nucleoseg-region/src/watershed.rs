//! Watershed segmentation
//!
//! Marker-based watershed by priority flooding. The surface is treated as a
//! topographic relief; each marker floods outward from its lowest point and
//! every pixel inside the mask is claimed by whichever basin reaches it
//! first. Pixels of equal height are flooded in first-in first-out order.
//!
//! To split touching blobs, flood the negated distance transform from the
//! distance maxima: see [`find_local_maxima`] and [`markers_from_maxima`].

use crate::conncomp::{ConnectivityType, label_connected_components};
use crate::error::RegionResult;
use nucleoseg_core::{FImage, LabelMap, Mask};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Options for watershed segmentation
#[derive(Debug, Clone)]
pub struct WatershedOptions {
    /// Connectivity type for flooding neighbors
    pub connectivity: ConnectivityType,
}

impl Default for WatershedOptions {
    fn default() -> Self {
        Self {
            connectivity: ConnectivityType::FourWay,
        }
    }
}

impl WatershedOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set connectivity type
    pub fn with_connectivity(mut self, connectivity: ConnectivityType) -> Self {
        self.connectivity = connectivity;
        self
    }
}

/// Queue entry ordered by height, then by insertion age
#[derive(Debug, Clone, Copy)]
struct FloodEntry {
    height: f32,
    age: u64,
    idx: usize,
}

impl PartialEq for FloodEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloodEntry {}

impl PartialOrd for FloodEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloodEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.height
            .total_cmp(&other.height)
            .then(self.age.cmp(&other.age))
    }
}

/// Find the local maxima of a surface inside a mask
///
/// A mask pixel is a maximum when none of its 8 neighbors is strictly
/// higher, so flat tops yield plateaus of maxima.
pub fn find_local_maxima(surface: &FImage, mask: &Mask) -> RegionResult<Mask> {
    let (width, height) = mask.dimensions();
    let values = surface.data();
    if surface.dimensions() != mask.dimensions() {
        return Err(nucleoseg_core::Error::DimensionMismatch {
            expected: mask.dimensions(),
            actual: surface.dimensions(),
        }
        .into());
    }

    let fg = mask.data();
    let mut peaks = vec![false; fg.len()];
    for (idx, peak) in peaks.iter_mut().enumerate() {
        if !fg[idx] {
            continue;
        }
        let v = values[idx];
        *peak = ConnectivityType::EightWay
            .neighbors(idx, width, height)
            .all(|n| values[n] <= v);
    }
    Ok(Mask::from_data(width, height, peaks)?)
}

/// Turn a mask of maxima into watershed markers
///
/// Touching maxima (8-connected) merge into one marker.
pub fn markers_from_maxima(maxima: &Mask) -> RegionResult<LabelMap> {
    label_connected_components(maxima, ConnectivityType::EightWay)
}

/// Flood a surface from labeled markers
///
/// # Arguments
///
/// * `surface` - Relief to flood; low values are flooded first
/// * `markers` - Seed labels; 0 = unlabeled
/// * `mask` - Pixels allowed to receive a label
/// * `options` - Flooding options
///
/// # Returns
///
/// A label map using the marker labels. Mask pixels unreachable from any
/// marker stay 0, as does everything outside the mask.
pub fn watershed_from_markers(
    surface: &FImage,
    markers: &LabelMap,
    mask: &Mask,
    options: &WatershedOptions,
) -> RegionResult<LabelMap> {
    markers.check_same_size(surface.dimensions())?;
    markers.check_same_size(mask.dimensions())?;

    let (width, height) = markers.dimensions();
    let values = surface.data();
    let fg = mask.data();
    let mut out = markers.clone();
    let labels = out.data_mut();

    let mut heap = BinaryHeap::new();
    let mut age = 0u64;
    for (idx, &label) in labels.iter().enumerate() {
        if label > 0 {
            heap.push(Reverse(FloodEntry {
                height: values[idx],
                age,
                idx,
            }));
            age += 1;
        }
    }

    while let Some(Reverse(entry)) = heap.pop() {
        let label = labels[entry.idx];
        for n in options.connectivity.neighbors(entry.idx, width, height) {
            if fg[n] && labels[n] == 0 {
                labels[n] = label;
                heap.push(Reverse(FloodEntry {
                    height: values[n],
                    age,
                    idx: n,
                }));
                age += 1;
            }
        }
    }

    log::debug!(
        "watershed_from_markers: {} markers flooded {} pixels",
        markers.num_regions(),
        labels.iter().filter(|&&l| l > 0).count()
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::distance_transform;

    /// Two overlapping disks of radius 5, centers 8 px apart
    fn overlapping_disks() -> Mask {
        Mask::from_fn(21, 13, |x, y| {
            let dy = y as i32 - 6;
            [6, 14].iter().any(|&cx| {
                let dx = x as i32 - cx;
                dx * dx + dy * dy <= 25
            })
        })
        .unwrap()
    }

    #[test]
    fn test_local_maxima_plateau() {
        let surface = FImage::from_data(5, 1, vec![0.0, 1.0, 2.0, 2.0, 1.0]).unwrap();
        let mask = Mask::from_fn(5, 1, |_, _| true).unwrap();
        let maxima = find_local_maxima(&surface, &mask).unwrap();
        assert_eq!(maxima.data(), &[false, false, true, true, false]);
        assert_eq!(markers_from_maxima(&maxima).unwrap().num_regions(), 1);
    }

    #[test]
    fn test_maxima_restricted_to_mask() {
        let surface = FImage::from_data(3, 1, vec![0.0, 5.0, 0.0]).unwrap();
        let mask = Mask::from_fn(3, 1, |x, _| x != 1).unwrap();
        let maxima = find_local_maxima(&surface, &mask).unwrap();
        assert!(maxima.is_all_background());
    }

    #[test]
    fn test_watershed_splits_touching_disks() {
        let mask = overlapping_disks();
        let dist = distance_transform(&mask).unwrap();
        let maxima = find_local_maxima(&dist, &mask).unwrap();
        let markers = markers_from_maxima(&maxima).unwrap();
        assert_eq!(markers.num_regions(), 2);

        let neg = dist.map(|v| -v);
        let labels =
            watershed_from_markers(&neg, &markers, &mask, &WatershedOptions::default()).unwrap();
        assert_eq!(labels.num_regions(), 2);
        assert_ne!(labels.get(6, 6), labels.get(14, 6));
        // Every mask pixel is claimed
        assert_eq!(labels.to_mask(), mask);
    }

    #[test]
    fn test_watershed_stays_in_mask() {
        let surface = FImage::new(5, 1).unwrap();
        let markers = LabelMap::from_data(5, 1, vec![1, 0, 0, 0, 0]).unwrap();
        let mask = Mask::from_fn(5, 1, |x, _| x != 2).unwrap();
        let labels =
            watershed_from_markers(&surface, &markers, &mask, &WatershedOptions::new()).unwrap();
        assert_eq!(labels.data(), &[1, 1, 0, 0, 0]);
    }

    #[test]
    fn test_flood_entry_order() {
        let a = FloodEntry { height: -2.0, age: 5, idx: 0 };
        let b = FloodEntry { height: -1.0, age: 0, idx: 1 };
        let c = FloodEntry { height: -1.0, age: 1, idx: 2 };
        assert!(a < b);
        assert!(b < c);
    }
}
