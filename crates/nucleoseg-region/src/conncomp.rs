//! Connected component analysis
//!
//! Components are found with a queue-based flood fill started at every
//! unlabeled foreground pixel in raster order, so labels are assigned in the
//! order in which each component's first pixel is met.

use crate::error::RegionResult;
use nucleoseg_core::{LabelMap, Mask};
use std::collections::VecDeque;

/// Connectivity type for component analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    /// 4-way connectivity (up, down, left, right)
    #[default]
    FourWay,
    /// 8-way connectivity (includes diagonals)
    EightWay,
}

const FOUR_WAY: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const EIGHT_WAY: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

impl ConnectivityType {
    /// Neighbor offsets as `(dx, dy)`
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            ConnectivityType::FourWay => &FOUR_WAY,
            ConnectivityType::EightWay => &EIGHT_WAY,
        }
    }

    /// In-bounds neighbors of the pixel at linear index `idx`
    pub(crate) fn neighbors(
        self,
        idx: usize,
        width: u32,
        height: u32,
    ) -> impl Iterator<Item = usize> {
        let w = width as i64;
        let h = height as i64;
        let x = idx as i64 % w;
        let y = idx as i64 / w;
        self.offsets().iter().filter_map(move |&(dx, dy)| {
            let nx = x + dx as i64;
            let ny = y + dy as i64;
            if nx >= 0 && ny >= 0 && nx < w && ny < h {
                Some((ny * w + nx) as usize)
            } else {
                None
            }
        })
    }
}

/// Label all connected components of a mask
///
/// # Arguments
///
/// * `mask` - Foreground mask
/// * `connectivity` - Connectivity type
///
/// # Returns
///
/// A label map with labels `1..=K` in raster order of each component's
/// first pixel; background stays 0.
pub fn label_connected_components(
    mask: &Mask,
    connectivity: ConnectivityType,
) -> RegionResult<LabelMap> {
    let (width, height) = mask.dimensions();
    let fg = mask.data();
    let mut labels = LabelMap::new(width, height)?;
    let out = labels.data_mut();
    let mut next = 0u32;
    let mut queue = VecDeque::new();

    for start in 0..fg.len() {
        if !fg[start] || out[start] != 0 {
            continue;
        }
        next += 1;
        out[start] = next;
        queue.push_back(start);
        while let Some(p) = queue.pop_front() {
            for n in connectivity.neighbors(p, width, height) {
                if fg[n] && out[n] == 0 {
                    out[n] = next;
                    queue.push_back(n);
                }
            }
        }
    }
    Ok(labels)
}
