//! Synthetic fluorescence images
//!
//! Scenes are drawn shape by shape onto a flat background; later shapes
//! overwrite earlier ones and anything outside the image is clipped. Disks
//! hold every pixel with `dx² + dy² <= r²` around their center.

use crate::{TestError, TestResult};
use nucleoseg_core::{FImage, LabelMap};

/// Intensity of a nucleus body in the stock scenes
pub const NUCLEUS_LEVEL: f32 = 0.5;
/// Intensity of a nucleolus in the stock scenes
pub const NUCLEOLUS_LEVEL: f32 = 1.0;

#[derive(Debug, Clone, Copy)]
enum Shape {
    Disk { cx: i32, cy: i32, r: i32 },
    Rect { x: i32, y: i32, w: i32, h: i32 },
}

impl Shape {
    fn contains(&self, x: i32, y: i32) -> bool {
        match *self {
            Shape::Disk { cx, cy, r } => {
                let dx = x - cx;
                let dy = y - cy;
                dx * dx + dy * dy <= r * r
            }
            Shape::Rect { x: x0, y: y0, w, h } => x >= x0 && x < x0 + w && y >= y0 && y < y0 + h,
        }
    }
}

/// Builder for a synthetic cell image
///
/// # Examples
///
/// ```
/// use nucleoseg_test::synth::CellScene;
///
/// let image = CellScene::new(40, 40)
///     .disk(20, 20, 8, 0.5)
///     .disk(20, 20, 2, 1.0)
///     .render()
///     .unwrap();
/// assert_eq!(image.get_pixel(20, 20).unwrap(), 1.0);
/// assert_eq!(image.get_pixel(20, 14).unwrap(), 0.5);
/// assert_eq!(image.get_pixel(0, 0).unwrap(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct CellScene {
    width: u32,
    height: u32,
    background: f32,
    shapes: Vec<(Shape, f32)>,
}

impl CellScene {
    /// Start an empty scene with a zero background
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: 0.0,
            shapes: Vec::new(),
        }
    }

    /// Set the background intensity
    pub fn background(mut self, value: f32) -> Self {
        self.background = value;
        self
    }

    /// Add a filled disk
    pub fn disk(mut self, cx: i32, cy: i32, r: i32, value: f32) -> Self {
        self.shapes.push((Shape::Disk { cx, cy, r }, value));
        self
    }

    /// Add a filled rectangle with its top-left corner at (x, y)
    pub fn rect(mut self, x: i32, y: i32, w: i32, h: i32, value: f32) -> Self {
        self.shapes.push((Shape::Rect { x, y, w, h }, value));
        self
    }

    /// Draw the scene
    ///
    /// # Errors
    ///
    /// Returns [`TestError::InvalidScene`] if a shape has a negative size,
    /// or a core error for a zero-sized image.
    pub fn render(&self) -> TestResult<FImage> {
        for (shape, _) in &self.shapes {
            let bad = match *shape {
                Shape::Disk { r, .. } => r < 0,
                Shape::Rect { w, h, .. } => w < 0 || h < 0,
            };
            if bad {
                return Err(TestError::InvalidScene(format!("negative size in {shape:?}")));
            }
        }

        let image = FImage::from_fn(self.width, self.height, |x, y| {
            self.shapes
                .iter()
                .rev()
                .find(|(shape, _)| shape.contains(x as i32, y as i32))
                .map_or(self.background, |&(_, value)| value)
        })?;
        Ok(image)
    }
}

/// Label map with one disk region per entry, labeled 1, 2, ... in order
///
/// Each entry is `(cx, cy, r)`; overlapping disks are won by the later one.
pub fn disk_labels(width: u32, height: u32, disks: &[(i32, i32, i32)]) -> TestResult<LabelMap> {
    let mut labels = LabelMap::new(width, height)?;
    for (i, &(cx, cy, r)) in disks.iter().enumerate() {
        let shape = Shape::Disk { cx, cy, r };
        for y in 0..height {
            for x in 0..width {
                if shape.contains(x as i32, y as i32) {
                    labels.set(x, y, i as u32 + 1)?;
                }
            }
        }
    }
    Ok(labels)
}

/// Two well separated cells on a 100x100 image
///
/// Nuclei of radius 10 at (30, 50) and (70, 50), each holding a radius 3
/// nucleolus at its center.
pub fn two_separated_cells() -> TestResult<FImage> {
    CellScene::new(100, 100)
        .disk(30, 50, 10, NUCLEUS_LEVEL)
        .disk(70, 50, 10, NUCLEUS_LEVEL)
        .disk(30, 50, 3, NUCLEOLUS_LEVEL)
        .disk(70, 50, 3, NUCLEOLUS_LEVEL)
        .render()
}

/// Two radius 10 nuclei whose centers are 15 px apart, so they merge into
/// one blob, each with a central radius 3 nucleolus
pub fn touching_nuclei() -> TestResult<FImage> {
    CellScene::new(100, 100)
        .disk(42, 50, 10, NUCLEUS_LEVEL)
        .disk(57, 50, 10, NUCLEUS_LEVEL)
        .disk(42, 50, 3, NUCLEOLUS_LEVEL)
        .disk(57, 50, 3, NUCLEOLUS_LEVEL)
        .render()
}

/// One radius 15 nucleus holding two separate nucleolus candidates of 50
/// and 80 pixels
pub fn nucleus_with_two_nucleoli() -> TestResult<FImage> {
    CellScene::new(100, 100)
        .disk(50, 50, 15, NUCLEUS_LEVEL)
        .rect(38, 45, 5, 10, NUCLEOLUS_LEVEL)
        .rect(48, 45, 8, 10, NUCLEOLUS_LEVEL)
        .render()
}
