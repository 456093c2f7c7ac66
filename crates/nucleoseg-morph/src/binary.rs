//! Binary morphological operations
//!
//! Pixels outside the image are treated as background for both dilation and
//! erosion, so an object touching the edge erodes from that side too.

use crate::{MorphResult, Sel};
use nucleoseg_core::Mask;

/// Dilate a mask
///
/// Every foreground pixel is stamped with the structuring element's hits.
///
/// # Arguments
///
/// * `mask` - Input mask
/// * `sel` - Structuring element
///
/// # Returns
///
/// A new mask; the input is not modified.
pub fn dilate(mask: &Mask, sel: &Sel) -> MorphResult<Mask> {
    let (w, h) = mask.dimensions();
    let offsets: Vec<(i32, i32)> = sel.hit_offsets().collect();
    let mut out = Mask::new(w, h)?;
    let dst = out.data_mut();

    for y in 0..h as i32 {
        for x in 0..w as i32 {
            if !mask.get(x as u32, y as u32) {
                continue;
            }
            for &(dx, dy) in &offsets {
                let nx = x + dx;
                let ny = y + dy;
                if nx >= 0 && ny >= 0 && nx < w as i32 && ny < h as i32 {
                    dst[(ny as usize) * (w as usize) + nx as usize] = true;
                }
            }
        }
    }
    Ok(out)
}

/// Erode a mask
///
/// A pixel survives only if every hit position around it is foreground.
pub fn erode(mask: &Mask, sel: &Sel) -> MorphResult<Mask> {
    let (w, h) = mask.dimensions();
    let offsets: Vec<(i32, i32)> = sel.hit_offsets().collect();
    let mut out = Mask::new(w, h)?;
    let dst = out.data_mut();

    for y in 0..h as i32 {
        for x in 0..w as i32 {
            let keep = offsets.iter().all(|&(dx, dy)| {
                let nx = x + dx;
                let ny = y + dy;
                nx >= 0 && ny >= 0 && mask.get(nx as u32, ny as u32)
            });
            dst[(y as usize) * (w as usize) + x as usize] = keep;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_pixel() -> Mask {
        Mask::from_fn(9, 9, |x, y| x == 4 && y == 4).unwrap()
    }

    #[test]
    fn test_dilate_single_pixel_gives_disk() {
        let sel = Sel::create_disk(2).unwrap();
        let out = dilate(&single_pixel(), &sel).unwrap();
        assert_eq!(out.count(), 13);
        assert!(out.get(4, 2));
        assert!(!out.get(2, 2));
    }

    #[test]
    fn test_dilate_clips_at_border() {
        let mask = Mask::from_fn(5, 5, |x, y| x == 0 && y == 0).unwrap();
        let out = dilate(&mask, &Sel::create_cross()).unwrap();
        assert_eq!(out.count(), 3);
    }

    #[test]
    fn test_erode_undoes_dilate_of_pixel() {
        let sel = Sel::create_cross();
        let grown = dilate(&single_pixel(), &sel).unwrap();
        let shrunk = erode(&grown, &sel).unwrap();
        assert_eq!(shrunk, single_pixel());
    }

    #[test]
    fn test_erode_treats_outside_as_background() {
        let full = Mask::from_fn(4, 4, |_, _| true).unwrap();
        let out = erode(&full, &Sel::create_cross()).unwrap();
        assert_eq!(out.count(), 4);
        assert!(!out.get(0, 1));
        assert!(out.get(1, 1));
    }
}
