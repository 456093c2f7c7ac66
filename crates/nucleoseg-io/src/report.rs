//! CSV reports
//!
//! Two tables are exported per batch: one row per matched cell
//! ([`CellRow`]) and one row per input image ([`ImageSummaryRow`]). Both
//! are written with a header even when there are no rows.

use crate::IoResult;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A serializable row with a fixed column list
pub trait CsvRow: Serialize {
    /// Column names, in field order
    const COLUMNS: &'static [&'static str];
}

/// Measurements of one matched nucleus/nucleolus pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellRow {
    pub image: String,
    pub cell_id: u32,
    pub nucleus_area: u32,
    pub nucleus_centroid_row: f64,
    pub nucleus_centroid_col: f64,
    pub nucleus_eccentricity: f64,
    pub nucleus_solidity: f64,
    pub nucleus_perimeter: f64,
    pub nucleus_circularity: f64,
    pub nucleus_mean_intensity: f64,
    pub nucleus_integrated_intensity: f64,
    pub nucleus_intensity_std: f64,
    pub nucleus_cv: f64,
    pub nucleolus_area: u32,
    pub nucleolus_centroid_row: f64,
    pub nucleolus_centroid_col: f64,
    pub nucleolus_eccentricity: f64,
    pub nucleolus_solidity: f64,
    pub nucleolus_perimeter: f64,
    pub nucleolus_circularity: f64,
    pub nucleolus_mean_intensity: f64,
    pub nucleolus_integrated_intensity: f64,
    pub nucleolus_intensity_std: f64,
    pub nucleolus_cv: f64,
    pub fraction_area: f64,
    pub radial_location: f64,
    pub integrated_ratio: f64,
}

impl CsvRow for CellRow {
    const COLUMNS: &'static [&'static str] = &[
        "image",
        "cell_id",
        "nucleus_area",
        "nucleus_centroid_row",
        "nucleus_centroid_col",
        "nucleus_eccentricity",
        "nucleus_solidity",
        "nucleus_perimeter",
        "nucleus_circularity",
        "nucleus_mean_intensity",
        "nucleus_integrated_intensity",
        "nucleus_intensity_std",
        "nucleus_cv",
        "nucleolus_area",
        "nucleolus_centroid_row",
        "nucleolus_centroid_col",
        "nucleolus_eccentricity",
        "nucleolus_solidity",
        "nucleolus_perimeter",
        "nucleolus_circularity",
        "nucleolus_mean_intensity",
        "nucleolus_integrated_intensity",
        "nucleolus_intensity_std",
        "nucleolus_cv",
        "fraction_area",
        "radial_location",
        "integrated_ratio",
    ];
}

/// Outcome of one image in a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageSummaryRow {
    pub image: String,
    /// `completed`, `cancelled` or `failed`
    pub status: String,
    pub nuclei: usize,
    pub nucleoli: usize,
    pub cells: usize,
    pub unmatched_nuclei: usize,
    pub unmatched_nucleoli: usize,
    pub degenerate: bool,
    pub lower_threshold: Option<f32>,
    pub upper_threshold: Option<f32>,
    /// Mean nucleolus/nucleus area ratio over the image's cells
    pub mean_fraction_area: Option<f64>,
    /// Failure message; empty unless `status` is `failed`
    pub message: String,
}

impl CsvRow for ImageSummaryRow {
    const COLUMNS: &'static [&'static str] = &[
        "image",
        "status",
        "nuclei",
        "nucleoli",
        "cells",
        "unmatched_nuclei",
        "unmatched_nucleoli",
        "degenerate",
        "lower_threshold",
        "upper_threshold",
        "mean_fraction_area",
        "message",
    ];
}

/// Write rows as CSV with a header line
///
/// `None` fields are written as empty cells.
pub fn write_csv<R: CsvRow, W: Write>(rows: &[R], writer: W) -> IoResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(R::COLUMNS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write rows to a CSV file, replacing any existing file
pub fn write_csv_file<R: CsvRow, P: AsRef<Path>>(rows: &[R], path: P) -> IoResult<()> {
    let path = path.as_ref();
    write_csv(rows, File::create(path)?)?;
    log::debug!("write_csv_file: {} rows to {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(image: &str) -> ImageSummaryRow {
        ImageSummaryRow {
            image: image.to_string(),
            status: "completed".to_string(),
            nuclei: 2,
            nucleoli: 2,
            cells: 2,
            unmatched_nuclei: 0,
            unmatched_nucleoli: 0,
            degenerate: false,
            lower_threshold: Some(0.5),
            upper_threshold: None,
            mean_fraction_area: Some(0.25),
            message: String::new(),
        }
    }

    fn cell() -> CellRow {
        CellRow {
            image: "a.tif".to_string(),
            cell_id: 1,
            nucleus_area: 317,
            nucleus_centroid_row: 30.0,
            nucleus_centroid_col: 50.0,
            nucleus_eccentricity: 0.0,
            nucleus_solidity: 0.9,
            nucleus_perimeter: 65.9,
            nucleus_circularity: 0.9,
            nucleus_mean_intensity: 0.5,
            nucleus_integrated_intensity: 158.5,
            nucleus_intensity_std: 0.1,
            nucleus_cv: 0.2,
            nucleolus_area: 29,
            nucleolus_centroid_row: 30.0,
            nucleolus_centroid_col: 50.0,
            nucleolus_eccentricity: 0.0,
            nucleolus_solidity: 1.0,
            nucleolus_perimeter: 17.0,
            nucleolus_circularity: 1.2,
            nucleolus_mean_intensity: 1.0,
            nucleolus_integrated_intensity: 29.0,
            nucleolus_intensity_std: 0.0,
            nucleolus_cv: 0.0,
            fraction_area: 29.0 / 317.0,
            radial_location: 0.0,
            integrated_ratio: 29.0 / 158.5,
        }
    }

    /// Header as the serde field names produce it
    fn serde_header<R: CsvRow>(row: &R) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.serialize(row).unwrap();
        let text = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        text.lines().next().unwrap().to_string()
    }

    #[test]
    fn test_columns_match_fields() {
        assert_eq!(serde_header(&cell()), CellRow::COLUMNS.join(","));
        assert_eq!(serde_header(&summary("a")), ImageSummaryRow::COLUMNS.join(","));
    }

    #[test]
    fn test_empty_table_has_header() {
        let mut out = Vec::new();
        write_csv::<CellRow, _>(&[], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("image,cell_id,nucleus_area"));
    }

    #[test]
    fn test_summary_rows() {
        let mut out = Vec::new();
        write_csv(&[summary("a.tif"), summary("b.tif")], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "a.tif,completed,2,2,2,0,0,false,0.5,,0.25,");
    }

    #[test]
    fn test_write_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cells.csv");
        write_csv_file(&[cell()], &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().starts_with("a.tif,1,317,"));
    }
}
