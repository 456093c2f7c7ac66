//! Intensity preprocessing
//!
//! Raw fluorescence intensities are rescaled to `[0, 1]` with the image's
//! own minimum and maximum, then optionally gamma corrected. Both operations
//! return a new image; the input is left untouched.

use crate::{FilterError, FilterResult};
use nucleoseg_core::FImage;

/// Rescale an image linearly to `[0, 1]`
///
/// The darkest pixel maps to 0 and the brightest to 1.
///
/// # Errors
///
/// Returns [`FilterError::DegenerateImage`] if the image has no contrast
/// (every pixel holds the same value), since the rescale would divide by 0.
///
/// # Examples
///
/// ```
/// use nucleoseg_core::FImage;
/// use nucleoseg_filter::normalize;
///
/// let image = FImage::from_data(2, 1, vec![10.0, 30.0]).unwrap();
/// let norm = normalize(&image).unwrap();
/// assert_eq!(norm.data(), &[0.0, 1.0]);
/// ```
pub fn normalize(image: &FImage) -> FilterResult<FImage> {
    let (lo, hi) = image.min_max();
    if !lo.is_finite() || !hi.is_finite() {
        return Err(FilterError::InvalidParameters(format!(
            "image range is not finite: [{lo}, {hi}]"
        )));
    }
    if hi <= lo {
        return Err(FilterError::DegenerateImage { value: lo });
    }

    let range = hi - lo;
    Ok(image.map(|v| ((v - lo) / range).clamp(0.0, 1.0)))
}

/// Normalize an image and raise every pixel to the power `gamma`
///
/// `gamma > 1` darkens midtones, `gamma < 1` brightens them and `gamma == 1`
/// is plain normalization.
///
/// # Arguments
///
/// * `image` - Raw intensity image
/// * `gamma` - Exponent, finite and > 0
///
/// # Errors
///
/// Returns [`FilterError::InvalidParameters`] for a bad `gamma`, or
/// [`FilterError::DegenerateImage`] for an image without contrast.
pub fn gamma_correct(image: &FImage, gamma: f32) -> FilterResult<FImage> {
    if !gamma.is_finite() || gamma <= 0.0 {
        return Err(FilterError::InvalidParameters(format!(
            "gamma must be finite and > 0, got {gamma}"
        )));
    }

    let norm = normalize(image)?;
    if gamma == 1.0 {
        return Ok(norm);
    }
    log::debug!("gamma_correct: applying gamma {gamma}");
    Ok(norm.map(|v| v.powf(gamma)))
}
