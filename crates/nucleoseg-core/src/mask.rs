//! Mask - Binary foreground mask
//!
//! A `Mask` marks candidate pixels (nucleus or nucleolus foreground) with
//! `true`. It always has the same shape as the image it was derived from.

use crate::error::{Error, Result};

/// Binary mask stored one `bool` per pixel, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

impl Mask {
    /// Create an all-background mask
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        Ok(Mask {
            width,
            height,
            data: vec![false; (width as usize) * (height as usize)],
        })
    }

    /// Create a mask from raw row-major data
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions are invalid or data length doesn't match.
    pub fn from_data(width: u32, height: u32, data: Vec<bool>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        if data.len() != (width as usize) * (height as usize) {
            return Err(Error::DataLength {
                len: data.len(),
                width,
                height,
            });
        }
        Ok(Mask {
            width,
            height,
            data,
        })
    }

    /// Build from parts whose sizes the caller already validated
    pub(crate) fn from_parts(width: u32, height: u32, data: Vec<bool>) -> Self {
        debug_assert_eq!(data.len(), (width as usize) * (height as usize));
        Mask {
            width,
            height,
            data,
        }
    }

    /// Create a mask by evaluating `f(x, y)` at every pixel
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> bool,
    {
        let mut mask = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                let idx = mask.index(x, y);
                mask.data[idx] = f(x, y);
            }
        }
        Ok(mask)
    }

    /// Get the mask width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the mask height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the dimensions as (width, height)
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Linear index of (x, y)
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Get the value at (x, y); out-of-range coordinates read as background
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.data[self.index(x, y)]
    }

    /// Set the value at (x, y)
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if coordinates are out of range.
    pub fn set(&mut self, x: u32, y: u32, value: bool) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let idx = self.index(x, y);
        self.data[idx] = value;
        Ok(())
    }

    /// Raw row-major data
    #[inline]
    pub fn data(&self) -> &[bool] {
        &self.data
    }

    /// Mutable raw row-major data
    #[inline]
    pub fn data_mut(&mut self) -> &mut [bool] {
        &mut self.data
    }

    /// Number of foreground pixels
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// True if no pixel is foreground
    pub fn is_all_background(&self) -> bool {
        !self.data.iter().any(|&v| v)
    }
}
