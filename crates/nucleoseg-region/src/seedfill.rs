//! Seed fill operations
//!
//! Hole filling by flooding the background from the image border.

use crate::conncomp::ConnectivityType;
use crate::error::RegionResult;
use nucleoseg_core::Mask;
use std::collections::VecDeque;

/// Fill holes in a mask
///
/// A hole is a background pixel that cannot reach the image border through
/// background pixels.
///
/// # Arguments
///
/// * `mask` - Input mask
/// * `connectivity` - Connectivity used to flood the background
///
/// # Returns
///
/// A new mask with holes filled.
pub fn fill_holes(mask: &Mask, connectivity: ConnectivityType) -> RegionResult<Mask> {
    let (width, height) = mask.dimensions();
    let fg = mask.data();
    let mut outside = vec![false; fg.len()];
    let mut queue = VecDeque::new();

    // Seed with border background pixels
    for y in 0..height {
        for x in 0..width {
            if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                let idx = mask.index(x, y);
                if !fg[idx] && !outside[idx] {
                    outside[idx] = true;
                    queue.push_back(idx);
                }
            }
        }
    }

    while let Some(p) = queue.pop_front() {
        for n in connectivity.neighbors(p, width, height) {
            if !fg[n] && !outside[n] {
                outside[n] = true;
                queue.push_back(n);
            }
        }
    }

    let filled: Vec<bool> = outside.iter().map(|&o| !o).collect();
    Ok(Mask::from_data(width, height, filled)?)
}
