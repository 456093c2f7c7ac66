//! Three-class Otsu thresholding
//!
//! Splits the intensity histogram into background, nucleus and nucleolus
//! classes by choosing two cuts that maximize the between-class variance.
//!
//! With cumulative histogram sums `P(k)` (pixel counts) and `S(k)` (bin
//! index weighted counts), the between-class variance of a partition differs
//! from `sum(S_c^2 / P_c)` over its classes only by a constant, so that sum
//! is what gets maximized.

use crate::{FilterError, FilterResult};
use nucleoseg_core::FImage;

/// Default histogram resolution
pub const DEFAULT_BINS: usize = 256;

/// The two intensity cuts separating three classes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Background / nucleus boundary
    pub lower: f32,
    /// Nucleus / nucleolus boundary
    pub upper: f32,
}

/// Compute two Otsu thresholds for a three-class split
///
/// The histogram has `bins` equal-width bins spanning `[min, max]` of the
/// image. Bin indices `i < j` are chosen so that the classes `[0..=i]`,
/// `[i+1..=j]` and `[j+1..bins)` maximize the between-class variance. When
/// several pairs reach the maximum, the last one in ascending `(i, j)` order
/// is kept. Each cut is reported as the center of its bin.
///
/// NaN pixels are ignored.
///
/// # Arguments
///
/// * `image` - Input image (usually normalized)
/// * `bins` - Number of histogram bins, at least 3
///
/// # Errors
///
/// Returns [`FilterError::InvalidParameters`] if `bins < 3`, or
/// [`FilterError::DegenerateImage`] if the image has no contrast.
///
/// # Examples
///
/// ```
/// use nucleoseg_core::FImage;
/// use nucleoseg_filter::multi_otsu_thresholds;
///
/// let image = FImage::from_fn(30, 1, |x, _| (x / 10) as f32 * 0.5).unwrap();
/// let t = multi_otsu_thresholds(&image, 256).unwrap();
/// assert!(t.lower < 0.5 && 0.5 < t.upper && t.upper < 1.0);
/// ```
pub fn multi_otsu_thresholds(image: &FImage, bins: usize) -> FilterResult<Thresholds> {
    if bins < 3 {
        return Err(FilterError::InvalidParameters(format!(
            "three-class threshold needs at least 3 bins, got {bins}"
        )));
    }

    let (lo, hi) = image.min_max();
    if !lo.is_finite() || !hi.is_finite() {
        return Err(FilterError::InvalidParameters(format!(
            "image range is not finite: [{lo}, {hi}]"
        )));
    }
    if hi <= lo {
        return Err(FilterError::DegenerateImage { value: lo });
    }

    let min = lo as f64;
    let width = (hi as f64 - min) / bins as f64;
    let histogram = build_histogram(image, min, width, bins);

    // Cumulative sums with a leading zero: class [a..=b] is p[b + 1] - p[a]
    let mut p = vec![0.0f64; bins + 1];
    let mut s = vec![0.0f64; bins + 1];
    for (k, &count) in histogram.iter().enumerate() {
        p[k + 1] = p[k] + count as f64;
        s[k + 1] = s[k] + k as f64 * count as f64;
    }
    let class_term = |a: usize, b: usize| -> f64 {
        let weight = p[b + 1] - p[a];
        if weight > 0.0 {
            let sum = s[b + 1] - s[a];
            sum * sum / weight
        } else {
            0.0
        }
    };

    let mut best = f64::NEG_INFINITY;
    let (mut best_i, mut best_j) = (0, 1);
    for i in 0..bins - 2 {
        let low = class_term(0, i);
        for j in i + 1..bins - 1 {
            let variance = low + class_term(i + 1, j) + class_term(j + 1, bins - 1);
            if variance >= best {
                best = variance;
                best_i = i;
                best_j = j;
            }
        }
    }

    let center = |k: usize| (min + (k as f64 + 0.5) * width) as f32;
    let thresholds = Thresholds {
        lower: center(best_i),
        upper: center(best_j),
    };
    log::debug!(
        "multi_otsu_thresholds: bins ({best_i}, {best_j}) -> lower {:.6}, upper {:.6}",
        thresholds.lower,
        thresholds.upper
    );
    Ok(thresholds)
}

fn build_histogram(image: &FImage, min: f64, width: f64, bins: usize) -> Vec<u64> {
    let mut histogram = vec![0u64; bins];
    for &v in image.data() {
        if v.is_nan() {
            continue;
        }
        let bin = (((v as f64 - min) / width).floor() as usize).min(bins - 1);
        histogram[bin] += 1;
    }
    histogram
}
