//! FImage - Floating-point intensity image
//!
//! `FImage` is a 2D array of `f32` values holding raw or preprocessed
//! fluorescence intensities. It is the immutable input to every
//! segmentation step.
//!
//! # Examples
//!
//! ```
//! use nucleoseg_core::FImage;
//!
//! // Create a 100x100 floating-point image
//! let mut image = FImage::new(100, 100).unwrap();
//!
//! // Set and get pixel values
//! image.set_pixel(10, 20, 0.5).unwrap();
//! assert_eq!(image.get_pixel(10, 20).unwrap(), 0.5);
//!
//! let (min, max) = image.min_max();
//! assert_eq!((min, max), (0.0, 0.5));
//! ```

use crate::error::{Error, Result};

/// Floating-point intensity image
///
/// # Memory Layout
///
/// Data is stored in row-major order with no padding. The pixel at (x, y)
/// is at index `y * width + x`; `x` is the column and `y` the row.
#[derive(Debug, Clone, PartialEq)]
pub struct FImage {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl FImage {
    /// Create a new FImage with all pixels set to zero
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::new_with_value(width, height, 0.0)
    }

    /// Create a new FImage with all pixels set to the specified value
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new_with_value(width: u32, height: u32, value: f32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let size = (width as usize) * (height as usize);
        Ok(FImage {
            width,
            height,
            data: vec![value; size],
        })
    }

    /// Create an FImage from raw data
    ///
    /// # Arguments
    ///
    /// * `width` - Width in pixels
    /// * `height` - Height in pixels
    /// * `data` - Pixel data in row-major order
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions are invalid or data length doesn't match.
    pub fn from_data(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let expected_size = (width as usize) * (height as usize);
        if data.len() != expected_size {
            return Err(Error::DataLength {
                len: data.len(),
                width,
                height,
            });
        }

        Ok(FImage {
            width,
            height,
            data,
        })
    }

    /// Create an FImage by evaluating `f(x, y)` at every pixel
    ///
    /// # Examples
    ///
    /// ```
    /// use nucleoseg_core::FImage;
    ///
    /// let ramp = FImage::from_fn(4, 2, |x, _y| x as f32).unwrap();
    /// assert_eq!(ramp.get_pixel(3, 1).unwrap(), 3.0);
    /// ```
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> f32,
    {
        let mut image = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                let idx = image.index(x, y);
                image.data[idx] = f(x, y);
            }
        }
        Ok(image)
    }

    /// Get the image width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the image dimensions as (width, height)
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; an FImage has at least one pixel
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Linear index of (x, y) in the row-major buffer
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Get the pixel value at (x, y)
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if coordinates are out of range.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<f32> {
        self.check_bounds(x, y)?;
        Ok(self.data[self.index(x, y)])
    }

    /// Set the pixel value at (x, y)
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if coordinates are out of range.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, value: f32) -> Result<()> {
        self.check_bounds(x, y)?;
        let idx = self.index(x, y);
        self.data[idx] = value;
        Ok(())
    }

    /// Get a reference to the raw pixel data
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Get a mutable reference to the raw pixel data
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Minimum and maximum pixel values
    ///
    /// NaN pixels are ignored; an all-NaN image reports `(inf, -inf)`.
    pub fn min_max(&self) -> (f32, f32) {
        self.data
            .iter()
            .filter(|v| !v.is_nan())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Apply `f` to every pixel, returning a new image of the same size
    pub fn map<F>(&self, f: F) -> FImage
    where
        F: Fn(f32) -> f32,
    {
        FImage {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    fn check_bounds(&self, x: u32, y: u32) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_dimension() {
        assert!(matches!(
            FImage::new(0, 10),
            Err(Error::InvalidDimension { .. })
        ));
        assert!(FImage::new(10, 0).is_err());
    }

    #[test]
    fn test_from_data_length_check() {
        assert!(FImage::from_data(2, 2, vec![0.0; 3]).is_err());
        let image = FImage::from_data(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(image.get_pixel(1, 1).unwrap(), 4.0);
        assert_eq!(image.get_pixel(0, 1).unwrap(), 3.0);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut image = FImage::new(5, 5).unwrap();
        assert!(image.get_pixel(5, 0).is_err());
        assert!(image.set_pixel(0, 5, 1.0).is_err());
    }

    #[test]
    fn test_min_max() {
        let image = FImage::new_with_value(3, 3, 7.0).unwrap();
        assert_eq!(image.min_max(), (7.0, 7.0));

        let ramp = FImage::from_fn(3, 3, |x, y| (x + y) as f32).unwrap();
        assert_eq!(ramp.min_max(), (0.0, 4.0));

        let with_nan = FImage::from_data(2, 1, vec![f32::NAN, 3.0]).unwrap();
        assert_eq!(with_nan.min_max(), (3.0, 3.0));
    }

    #[test]
    fn test_map() {
        let image = FImage::from_fn(2, 2, |x, _| x as f32).unwrap();
        let doubled = image.map(|v| v * 2.0);
        assert_eq!(doubled.data(), &[0.0, 2.0, 0.0, 2.0]);
    }
}
