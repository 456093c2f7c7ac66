//! Region properties
//!
//! Shape and intensity measurements for every labeled region, computed
//! against a paired intensity image:
//!
//! - Area, centroid `(row, col)` and bounding box
//! - Eccentricity of the ellipse with the same second central moments
//! - Solidity: area over the pixel area of the convex hull
//! - Perimeter: 4-connectivity boundary length with weighted corners
//! - Mean and population standard deviation of intensity
//!
//! Intensities of a region are visited once; the convex hull and perimeter
//! work on the region's bounding box only.

use crate::error::RegionResult;
use nucleoseg_core::{FImage, LabelMap, Mask};
use nucleoseg_morph::{Sel, erode};

/// Measurements of one labeled region
#[derive(Debug, Clone, PartialEq)]
pub struct RegionProps {
    /// Region label
    pub label: u32,
    /// Number of pixels
    pub area: u32,
    /// Center of mass as (row, col)
    pub centroid: (f64, f64),
    /// Inclusive bounding box as (min_row, min_col, max_row, max_col)
    pub bbox: (u32, u32, u32, u32),
    /// Eccentricity in `[0, 1)`; 0 for a circle or a single pixel
    pub eccentricity: f64,
    /// Area divided by convex hull area, in `(0, 1]`
    pub solidity: f64,
    /// Boundary length in pixels; 0 for regions too small to have one
    pub perimeter: f64,
    /// Mean intensity
    pub mean_intensity: f64,
    /// Population standard deviation of intensity
    pub intensity_std: f64,
    /// Pixel coordinates as (row, col), in raster order
    pub coords: Vec<(u32, u32)>,
}

/// Measure every region of a label map
///
/// # Arguments
///
/// * `labels` - Label map
/// * `image` - Intensity image of the same size
///
/// # Returns
///
/// One entry per positive label present, sorted by label.
///
/// # Errors
///
/// Returns an error if the image and label map differ in size.
pub fn region_props(labels: &LabelMap, image: &FImage) -> RegionResult<Vec<RegionProps>> {
    labels.check_same_size(image.dimensions())?;
    let width = labels.width() as usize;
    let values = image.data();

    let mut props = Vec::new();
    for (label, pixels) in labels.region_indices().into_iter().enumerate() {
        if pixels.is_empty() {
            continue;
        }
        let coords: Vec<(u32, u32)> = pixels
            .iter()
            .map(|&i| ((i / width) as u32, (i % width) as u32))
            .collect();
        let samples = pixels.iter().map(|&i| values[i] as f64);
        props.push(measure(label as u32, coords, samples)?);
    }
    Ok(props)
}

/// Running sums over one region
#[derive(Debug, Default)]
struct Moments {
    n: f64,
    sum_r: f64,
    sum_c: f64,
    // Welford accumulators for intensity
    mean: f64,
    m2: f64,
}

impl Moments {
    fn add(&mut self, r: f64, c: f64, v: f64) {
        self.n += 1.0;
        self.sum_r += r;
        self.sum_c += c;
        let delta = v - self.mean;
        self.mean += delta / self.n;
        self.m2 += delta * (v - self.mean);
    }

    fn centroid(&self) -> (f64, f64) {
        (self.sum_r / self.n, self.sum_c / self.n)
    }

    fn intensity_std(&self) -> f64 {
        (self.m2 / self.n).max(0.0).sqrt()
    }
}

/// Eccentricity from the normalized second central moments
fn eccentricity(coords: &[(u32, u32)], centroid: (f64, f64)) -> f64 {
    let n = coords.len() as f64;
    let (mut a, mut b, mut c) = (0.0, 0.0, 0.0);
    for &(r, col) in coords {
        let dr = r as f64 - centroid.0;
        let dc = col as f64 - centroid.1;
        a += dr * dr;
        b += dr * dc;
        c += dc * dc;
    }
    a /= n;
    b /= n;
    c /= n;

    let half_trace = (a + c) / 2.0;
    let root = (((a - c) / 2.0).powi(2) + b * b).sqrt();
    let l1 = half_trace + root;
    let l2 = (half_trace - root).max(0.0);
    if l1 <= 0.0 {
        0.0
    } else {
        (1.0 - l2 / l1).max(0.0).sqrt()
    }
}

fn measure(
    label: u32,
    coords: Vec<(u32, u32)>,
    samples: impl Iterator<Item = f64>,
) -> RegionResult<RegionProps> {
    let mut moments = Moments::default();
    let mut bbox = (u32::MAX, u32::MAX, 0, 0);
    for (&(r, c), v) in coords.iter().zip(samples) {
        moments.add(r as f64, c as f64, v);
        bbox.0 = bbox.0.min(r);
        bbox.1 = bbox.1.min(c);
        bbox.2 = bbox.2.max(r);
        bbox.3 = bbox.3.max(c);
    }

    let area = coords.len() as u32;
    let centroid = moments.centroid();
    let local = LocalMask::new(&coords, bbox)?;
    Ok(RegionProps {
        label,
        area,
        centroid,
        bbox,
        eccentricity: eccentricity(&coords, centroid),
        solidity: area as f64 / convex_hull_area(&coords, bbox) as f64,
        perimeter: local.perimeter()?,
        mean_intensity: moments.mean,
        intensity_std: moments.intensity_std(),
        coords,
    })
}

/// Region copied into its bounding box with a 1-pixel background margin
struct LocalMask {
    mask: Mask,
}

impl LocalMask {
    fn new(coords: &[(u32, u32)], bbox: (u32, u32, u32, u32)) -> RegionResult<Self> {
        let w = bbox.3 - bbox.1 + 3;
        let h = bbox.2 - bbox.0 + 3;
        let mut mask = Mask::new(w, h)?;
        for &(r, c) in coords {
            mask.set(c - bbox.1 + 1, r - bbox.0 + 1, true)?;
        }
        Ok(LocalMask { mask })
    }

    /// 4-connectivity perimeter with weighted boundary configurations
    ///
    /// Boundary pixels are the region minus its erosion by a cross. Each
    /// boundary pixel is coded by its boundary neighbors (center 1, edge
    /// neighbors 2, diagonal neighbors 10) and the code selects a length:
    /// straight runs count 1, diagonal steps sqrt(2), corners
    /// (1 + sqrt(2)) / 2.
    fn perimeter(&self) -> RegionResult<f64> {
        let eroded = erode(&self.mask, &Sel::create_cross())?;
        let (w, h) = self.mask.dimensions();
        let border = Mask::from_fn(w, h, |x, y| self.mask.get(x, y) && !eroded.get(x, y))?;

        let mut total = 0.0;
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                if !border.get(x, y) {
                    continue;
                }
                let mut code = 1usize;
                for (dx, dy) in [(1i32, 0i32), (-1, 0), (0, 1), (0, -1)] {
                    if border.get((x as i32 + dx) as u32, (y as i32 + dy) as u32) {
                        code += 2;
                    }
                }
                for (dx, dy) in [(1i32, 1i32), (1, -1), (-1, 1), (-1, -1)] {
                    if border.get((x as i32 + dx) as u32, (y as i32 + dy) as u32) {
                        code += 10;
                    }
                }
                total += perimeter_weight(code);
            }
        }
        Ok(total)
    }
}

fn perimeter_weight(code: usize) -> f64 {
    match code {
        5 | 7 | 15 | 17 | 25 | 27 => 1.0,
        21 | 33 => std::f64::consts::SQRT_2,
        13 | 23 => (1.0 + std::f64::consts::SQRT_2) / 2.0,
        _ => 0.0,
    }
}

/// Number of pixels whose centers lie in the convex hull of the region
///
/// The hull is taken over pixel corners, so it always covers the region.
/// Work happens in doubled coordinates to stay in integers: the pixel at
/// (r, c) has center (2r, 2c) and corners (2r ± 1, 2c ± 1).
fn convex_hull_area(coords: &[(u32, u32)], bbox: (u32, u32, u32, u32)) -> u32 {
    // Only the leftmost and rightmost pixel of each row can reach the hull
    let rows = (bbox.2 - bbox.0 + 1) as usize;
    let mut extent = vec![(u32::MAX, 0u32); rows];
    for &(r, c) in coords {
        let e = &mut extent[(r - bbox.0) as usize];
        e.0 = e.0.min(c);
        e.1 = e.1.max(c);
    }

    let mut corners = Vec::with_capacity(rows * 8);
    for (i, &(lo, hi)) in extent.iter().enumerate() {
        if lo > hi {
            continue;
        }
        let r = 2 * (bbox.0 as i64 + i as i64);
        for c in [2 * lo as i64, 2 * hi as i64] {
            for (dr, dc) in [(-1, -1), (-1, 1), (1, -1), (1, 1)] {
                corners.push((r + dr, c + dc));
            }
        }
    }
    let hull = convex_hull(corners);

    let mut count = 0;
    for r in bbox.0..=bbox.2 {
        for c in bbox.1..=bbox.3 {
            let p = (2 * r as i64, 2 * c as i64);
            let inside = (0..hull.len()).all(|i| {
                let a = hull[i];
                let b = hull[(i + 1) % hull.len()];
                cross(a, b, p) >= 0
            });
            if inside {
                count += 1;
            }
        }
    }
    count
}

fn cross(o: (i64, i64), a: (i64, i64), b: (i64, i64)) -> i64 {
    (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
}

/// Andrew's monotone chain; counter-clockwise, no collinear vertices
fn convex_hull(mut points: Vec<(i64, i64)>) -> Vec<(i64, i64)> {
    points.sort_unstable();
    points.dedup();
    if points.len() < 3 {
        return points;
    }

    let mut lower: Vec<(i64, i64)> = Vec::new();
    for &p in &points {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0 {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<(i64, i64)> = Vec::new();
    for &p in points.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0 {
            upper.pop();
        }
        upper.push(p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}
