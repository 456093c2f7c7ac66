//! LabelMap - Integer region labels
//!
//! A label map assigns every pixel a `u32`: 0 is background and each
//! positive value identifies one region. Maps produced by the relabeling
//! steps keep labels contiguous, `1..=K` with no gaps.

use crate::error::{Error, Result};
use crate::mask::Mask;

/// Row-major label image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    width: u32,
    height: u32,
    data: Vec<u32>,
}

impl LabelMap {
    /// Create an all-background label map
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        Ok(LabelMap {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize)],
        })
    }

    /// Create a label map from raw row-major data
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions are invalid or data length doesn't match.
    pub fn from_data(width: u32, height: u32, data: Vec<u32>) -> Result<Self> {
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
        Ok(LabelMap {
            width,
            height,
            data,
        })
    }

    /// Get the width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels
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

    /// Label at (x, y); out-of-range coordinates read as background
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u32 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data[self.index(x, y)]
    }

    /// Set the label at (x, y)
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if coordinates are out of range.
    pub fn set(&mut self, x: u32, y: u32, label: u32) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let idx = self.index(x, y);
        self.data[idx] = label;
        Ok(())
    }

    /// Raw row-major data
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    /// Mutable raw row-major data
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.data
    }

    /// Largest label value (0 for an empty map)
    pub fn max_label(&self) -> u32 {
        self.data.iter().copied().max().unwrap_or(0)
    }

    /// Sorted distinct positive labels
    pub fn labels(&self) -> Vec<u32> {
        let areas = self.areas();
        (1..areas.len() as u32)
            .filter(|&l| areas[l as usize] > 0)
            .collect()
    }

    /// Number of distinct positive labels
    pub fn num_regions(&self) -> usize {
        self.areas().iter().skip(1).filter(|&&a| a > 0).count()
    }

    /// True if no pixel carries a positive label
    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&l| l == 0)
    }

    /// Pixel count per label
    ///
    /// The returned vector has length `max_label() + 1`; index 0 holds the
    /// background count.
    pub fn areas(&self) -> Vec<u32> {
        let mut areas = vec![0u32; self.max_label() as usize + 1];
        for &l in &self.data {
            areas[l as usize] += 1;
        }
        areas
    }

    /// Check that labels are exactly `1..=K` with no gaps
    pub fn is_contiguous(&self) -> bool {
        self.areas().iter().skip(1).all(|&a| a > 0)
    }

    /// Foreground mask of all positive labels
    pub fn to_mask(&self) -> Mask {
        let data = self.data.iter().map(|&l| l > 0).collect();
        Mask::from_parts(self.width, self.height, data)
    }

    /// Linear pixel indices of every region, grouped by label
    ///
    /// Index 0 of the result is always empty (background is not collected).
    pub fn region_indices(&self) -> Vec<Vec<usize>> {
        let areas = self.areas();
        let mut out: Vec<Vec<usize>> = areas
            .iter()
            .map(|&a| Vec::with_capacity(a as usize))
            .collect();
        out[0] = Vec::new();
        for (i, &l) in self.data.iter().enumerate() {
            if l > 0 {
                out[l as usize].push(i);
            }
        }
        out
    }

    /// Build a new map by sending every label through `lut`
    ///
    /// Labels beyond the end of `lut` become background. The receiver is
    /// not modified.
    pub fn map_labels(&self, lut: &[u32]) -> LabelMap {
        LabelMap {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .map(|&l| lut.get(l as usize).copied().unwrap_or(0))
                .collect(),
        }
    }

    /// Check that `other` has the same dimensions
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` otherwise.
    pub fn check_same_size(&self, other: (u32, u32)) -> Result<()> {
        if self.dimensions() != other {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions(),
                actual: other,
            });
        }
        Ok(())
    }
}
