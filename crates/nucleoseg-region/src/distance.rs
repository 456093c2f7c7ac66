//! Euclidean distance transform
//!
//! Exact distances from every foreground pixel to the nearest background
//! pixel, computed with the separable lower-envelope algorithm of
//! Felzenszwalb and Huttenlocher: squared distances are solved along each
//! column, then along each row.
//!
//! Pixels outside the image are not background. A mask with no background
//! pixel at all has no defined distance and yields an all-zero map.

use crate::error::RegionResult;
use nucleoseg_core::{FImage, Mask};

/// Compute the Euclidean distance transform of a mask
///
/// # Returns
///
/// An image of the same size holding the distance of each foreground pixel
/// to the closest background pixel; background pixels hold 0.
///
/// # Examples
///
/// ```
/// use nucleoseg_core::Mask;
/// use nucleoseg_region::distance_transform;
///
/// let mask = Mask::from_fn(5, 1, |x, _| x > 0).unwrap();
/// let dist = distance_transform(&mask).unwrap();
/// assert_eq!(dist.data(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
/// ```
pub fn distance_transform(mask: &Mask) -> RegionResult<FImage> {
    let (width, height) = mask.dimensions();
    let w = width as usize;
    let h = height as usize;

    let mut sq: Vec<Option<f64>> = mask
        .data()
        .iter()
        .map(|&fg| if fg { None } else { Some(0.0) })
        .collect();
    if sq.iter().all(Option::is_none) {
        return Ok(FImage::new(width, height)?);
    }

    let mut line = Vec::with_capacity(w.max(h));
    for x in 0..w {
        line.clear();
        line.extend((0..h).map(|y| sq[y * w + x]));
        let solved = squared_distance_1d(&line);
        for (y, d) in solved.into_iter().enumerate() {
            sq[y * w + x] = d;
        }
    }
    for y in 0..h {
        let solved = squared_distance_1d(&sq[y * w..(y + 1) * w]);
        sq[y * w..(y + 1) * w].copy_from_slice(&solved);
    }

    let data = sq
        .into_iter()
        .map(|d| d.map_or(0.0, |v| v.sqrt() as f32))
        .collect();
    Ok(FImage::from_data(width, height, data)?)
}

/// One-dimensional squared distance transform
///
/// `f[q]` is the cost at site `q` (`None` = unreachable). The result at `q`
/// is `min_p (q - p)² + f[p]` over reachable sites, or `None` if there are
/// none.
fn squared_distance_1d(f: &[Option<f64>]) -> Vec<Option<f64>> {
    let n = f.len();
    // Parabola vertices and the boundaries between them
    let mut v: Vec<usize> = Vec::with_capacity(n);
    let mut z: Vec<f64> = Vec::with_capacity(n + 1);

    for (q, fq) in f.iter().enumerate() {
        let Some(fq) = *fq else { continue };
        let mut s = f64::NEG_INFINITY;
        while let Some(&p) = v.last() {
            let fp = f[p].unwrap_or(0.0);
            let qf = q as f64;
            let pf = p as f64;
            s = ((fq + qf * qf) - (fp + pf * pf)) / (2.0 * (qf - pf));
            if z.last().is_some_and(|&zk| s <= zk) {
                v.pop();
                z.pop();
                s = f64::NEG_INFINITY;
            } else {
                break;
            }
        }
        v.push(q);
        z.push(if v.len() == 1 { f64::NEG_INFINITY } else { s });
    }

    if v.is_empty() {
        return vec![None; n];
    }

    let mut out = Vec::with_capacity(n);
    let mut k = 0;
    for q in 0..n {
        let qf = q as f64;
        while k + 1 < v.len() && z[k + 1] < qf {
            k += 1;
        }
        let p = v[k];
        let dp = qf - p as f64;
        out.push(Some(dp * dp + f[p].unwrap_or(0.0)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force(mask: &Mask) -> Vec<f32> {
        let (w, h) = mask.dimensions();
        let mut out = Vec::new();
        for y in 0..h as i64 {
            for x in 0..w as i64 {
                if !mask.get(x as u32, y as u32) {
                    out.push(0.0);
                    continue;
                }
                let mut best = i64::MAX;
                for by in 0..h as i64 {
                    for bx in 0..w as i64 {
                        if !mask.get(bx as u32, by as u32) {
                            best = best.min((bx - x).pow(2) + (by - y).pow(2));
                        }
                    }
                }
                out.push((best as f64).sqrt() as f32);
            }
        }
        out
    }

    #[test]
    fn test_matches_brute_force() {
        let mask = Mask::from_fn(13, 9, |x, y| {
            let dx = x as i32 - 6;
            let dy = y as i32 - 4;
            dx * dx + dy * dy <= 12 || (x == 1 && y == 1)
        })
        .unwrap();
        let dist = distance_transform(&mask).unwrap();
        let expected = brute_force(&mask);
        for (a, b) in dist.data().iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-5, "{a} vs {b}");
        }
    }

    #[test]
    fn test_single_background_pixel() {
        let mask = Mask::from_fn(5, 5, |x, y| !(x == 0 && y == 0)).unwrap();
        let dist = distance_transform(&mask).unwrap();
        assert!((dist.get_pixel(4, 4).unwrap() - 32f32.sqrt()).abs() < 1e-6);
        assert_eq!(dist.get_pixel(1, 0).unwrap(), 1.0);
    }

    #[test]
    fn test_border_is_not_background() {
        // Background only on the right edge
        let mask = Mask::from_fn(4, 2, |x, _| x < 3).unwrap();
        let dist = distance_transform(&mask).unwrap();
        assert_eq!(dist.get_pixel(0, 0).unwrap(), 3.0);
    }

    #[test]
    fn test_all_foreground_is_zero() {
        let mask = Mask::from_fn(3, 3, |_, _| true).unwrap();
        let dist = distance_transform(&mask).unwrap();
        assert!(dist.data().iter().all(|&d| d == 0.0));
    }
}
