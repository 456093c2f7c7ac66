//! Label-map dilation
//!
//! Grayscale (maximum) dilation applied to integer labels: each pixel takes
//! the largest label found under the structuring element. Regions grow into
//! background, and where two regions meet the larger label wins.

use crate::{MorphResult, Sel};
use nucleoseg_core::LabelMap;

/// Dilate every region of a label map
///
/// # Arguments
///
/// * `labels` - Input label map
/// * `sel` - Structuring element; a symmetric element such as a disk is
///   expected
///
/// # Returns
///
/// A new label map. Labels are not renumbered, so a region swallowed by a
/// larger neighbor leaves a gap.
pub fn dilate_labels(labels: &LabelMap, sel: &Sel) -> MorphResult<LabelMap> {
    let (w, h) = labels.dimensions();
    let offsets: Vec<(i32, i32)> = sel.hit_offsets().collect();
    let mut out = LabelMap::new(w, h)?;
    let dst = out.data_mut();

    for y in 0..h as i32 {
        for x in 0..w as i32 {
            let mut best = 0u32;
            for &(dx, dy) in &offsets {
                let nx = x + dx;
                let ny = y + dy;
                if nx >= 0 && ny >= 0 {
                    best = best.max(labels.get(nx as u32, ny as u32));
                }
            }
            dst[(y as usize) * (w as usize) + x as usize] = best;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dilate_labels_grows_regions() {
        let mut labels = LabelMap::new(11, 11).unwrap();
        labels.set(5, 5, 1).unwrap();
        let out = dilate_labels(&labels, &Sel::create_disk(2).unwrap()).unwrap();
        assert_eq!(out.areas(), vec![121 - 13, 13]);
    }

    #[test]
    fn test_larger_label_wins_on_contact() {
        let mut labels = LabelMap::new(9, 3).unwrap();
        labels.set(2, 1, 1).unwrap();
        labels.set(5, 1, 2).unwrap();
        let out = dilate_labels(&labels, &Sel::create_disk(2).unwrap()).unwrap();
        // Column 3 and 4 are within reach of both seeds
        assert_eq!(out.get(3, 1), 2);
        assert_eq!(out.get(4, 1), 2);
        assert_eq!(out.get(1, 1), 1);
        assert_eq!(out.get(2, 1), 1);
    }
}
