//! Structuring Element (SEL) for morphological operations
//!
//! A structuring element defines the neighborhood used in morphological
//! operations. Only hit positions matter here; every other position is
//! "don't care".

use crate::{MorphError, MorphResult};

/// Structuring Element (SEL)
///
/// The origin (cx, cy) is the reference point for the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sel {
    width: u32,
    height: u32,
    cx: u32,
    cy: u32,
    hits: Vec<bool>,
    name: Option<String>,
}

impl Sel {
    /// Create an empty structuring element with its origin at the center
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidSel`] if either dimension is 0.
    pub fn new(width: u32, height: u32) -> MorphResult<Self> {
        if width == 0 || height == 0 {
            return Err(MorphError::InvalidSel(format!(
                "dimensions must be positive, got {width}x{height}"
            )));
        }
        Ok(Sel {
            width,
            height,
            cx: width / 2,
            cy: height / 2,
            hits: vec![false; (width as usize) * (height as usize)],
            name: None,
        })
    }

    /// Create a disk structuring element
    ///
    /// The disk holds every offset `(dx, dy)` with `dx² + dy² <= radius²`,
    /// so radius 0 is a single pixel and radius 1 is a 5-pixel cross.
    ///
    /// # Examples
    ///
    /// ```
    /// use nucleoseg_morph::Sel;
    ///
    /// assert_eq!(Sel::create_disk(1).unwrap().hit_count(), 5);
    /// assert_eq!(Sel::create_disk(2).unwrap().hit_count(), 13);
    /// ```
    pub fn create_disk(radius: u32) -> MorphResult<Self> {
        let size = 2 * radius + 1;
        let mut sel = Self::new(size, size)?;
        let r = radius as i64;
        for y in 0..size {
            for x in 0..size {
                let dx = x as i64 - r;
                let dy = y as i64 - r;
                if dx * dx + dy * dy <= r * r {
                    sel.set_hit(x, y, true);
                }
            }
        }
        sel.set_name(format!("disk{radius}"));
        Ok(sel)
    }

    /// Create a 3x3 cross (+), the 4-connected neighborhood plus the center
    pub fn create_cross() -> Self {
        let mut sel = Sel {
            width: 3,
            height: 3,
            cx: 1,
            cy: 1,
            hits: vec![false; 9],
            name: Some("cross".to_string()),
        };
        for (x, y) in [(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)] {
            sel.set_hit(x, y, true);
        }
        sel
    }

    /// Get the width
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the origin as (cx, cy)
    pub fn origin(&self) -> (u32, u32) {
        (self.cx, self.cy)
    }

    /// Get the name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Whether (x, y) is a hit; out-of-range positions are not
    pub fn is_hit(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.hits[(y * self.width + x) as usize]
    }

    /// Mark or clear a hit; out-of-range positions are ignored
    pub fn set_hit(&mut self, x: u32, y: u32, hit: bool) {
        if x < self.width && y < self.height {
            self.hits[(y * self.width + x) as usize] = hit;
        }
    }

    /// Count the number of hit elements
    pub fn hit_count(&self) -> usize {
        self.hits.iter().filter(|&&h| h).count()
    }

    /// Hit positions as `(dx, dy)` offsets relative to the origin
    pub fn hit_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let cx = self.cx as i32;
        let cy = self.cy as i32;
        let w = self.width;
        self.hits.iter().enumerate().filter_map(move |(i, &hit)| {
            if hit {
                let x = (i as u32 % w) as i32;
                let y = (i as u32 / w) as i32;
                Some((x - cx, y - cy))
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_sizes() {
        assert_eq!(Sel::create_disk(0).unwrap().hit_count(), 1);
        assert_eq!(Sel::create_disk(1).unwrap().hit_count(), 5);
        assert_eq!(Sel::create_disk(2).unwrap().hit_count(), 13);
        assert_eq!(Sel::create_disk(3).unwrap().hit_count(), 29);
        assert_eq!(Sel::create_disk(10).unwrap().hit_count(), 317);
    }

    #[test]
    fn test_disk_offsets_are_symmetric() {
        let sel = Sel::create_disk(2).unwrap();
        assert_eq!(sel.origin(), (2, 2));
        let offsets: Vec<_> = sel.hit_offsets().collect();
        for &(dx, dy) in &offsets {
            assert!(offsets.contains(&(-dx, -dy)));
            assert!(dx * dx + dy * dy <= 4);
        }
        assert!(!offsets.contains(&(2, 1)));
    }

    #[test]
    fn test_cross_matches_disk1() {
        let cross = Sel::create_cross();
        let disk = Sel::create_disk(1).unwrap();
        let mut a: Vec<_> = cross.hit_offsets().collect();
        let mut b: Vec<_> = disk.hit_offsets().collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
        assert_eq!(cross.name(), Some("cross"));
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(Sel::new(0, 3).is_err());
    }
}
