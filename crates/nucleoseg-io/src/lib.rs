//! nucleoseg-io - Storage and reporting for nucleoseg
//!
//! - [`tiff`](crate::tiff) - Grayscale TIFF images and label maps
//! - [`report`] - Per-cell and per-image CSV tables
//!
//! # Example
//!
//! ```no_run
//! use nucleoseg_io::{read_image, write_label_map};
//! use nucleoseg_core::LabelMap;
//!
//! let image = read_image("cells.tif").unwrap();
//! let labels = LabelMap::new(image.width(), image.height()).unwrap();
//! write_label_map(&labels, "cells_nuclei.tif").unwrap();
//! ```

mod error;
pub mod report;
pub mod tiff;

pub use error::{IoError, IoResult};
pub use report::{CellRow, CsvRow, ImageSummaryRow, write_csv, write_csv_file};
pub use crate::tiff::{
    read_image, read_label_map, read_tiff_image, read_tiff_labels, write_image, write_label_map,
    write_tiff_image, write_tiff_labels,
};
