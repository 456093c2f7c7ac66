//! On-disk layout of batch results
//!
//! For an output directory `out` and an image named `name`:
//!
//! - `out/<name>_nuclei.tif`, `out/<name>_nucleoli.tif` - matched label maps
//!   (written only for images segmented in this run)
//! - `out/cells.csv` - one row per matched cell of every image
//! - `out/summary.csv` - one row per image
//!
//! The same `<name>_nuclei.tif` / `<name>_nucleoli.tif` naming is used when
//! reading existing masks back in.

use crate::batch::{ExistingMasks, ImageOutcome, ImageReport};
use crate::{BatchError, BatchResult};
use nucleoseg_io::{
    CellRow, ImageSummaryRow, IoError, read_label_map, write_csv_file, write_label_map,
};
use nucleoseg_segment::MetricsRecord;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File name of the per-cell table
pub const CELLS_CSV: &str = "cells.csv";
/// File name of the per-image table
pub const SUMMARY_CSV: &str = "summary.csv";

/// Paths of the nucleus and nucleolus maps of `name` inside `dir`
pub fn mask_paths(dir: &Path, name: &str) -> (PathBuf, PathBuf) {
    (
        dir.join(format!("{name}_nuclei.tif")),
        dir.join(format!("{name}_nucleoli.tif")),
    )
}

/// Read the matched maps of `name` from `dir`
///
/// # Errors
///
/// Returns [`IoError::NotFound`] (wrapped) if either map is missing.
pub fn load_existing_masks(dir: &Path, name: &str) -> BatchResult<ExistingMasks> {
    let (nuclei_path, nucleoli_path) = mask_paths(dir, name);
    Ok(ExistingMasks {
        nuclei: read_label_map(nuclei_path)?,
        nucleoli: read_label_map(nucleoli_path)?,
    })
}

/// Like [`load_existing_masks`], but a missing map means "none saved"
///
/// Returns `Ok(None)` when either map is absent so the image can be
/// segmented instead. Unreadable or malformed maps are still errors.
pub fn find_existing_masks(dir: &Path, name: &str) -> BatchResult<Option<ExistingMasks>> {
    match load_existing_masks(dir, name) {
        Ok(masks) => Ok(Some(masks)),
        Err(BatchError::Io(IoError::NotFound { path })) => {
            log::debug!("{name}: no saved map at {}, segmenting", path.display());
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Flatten the metrics of one image into CSV rows, in id order
pub fn cell_rows(name: &str, metrics: &BTreeMap<u32, MetricsRecord>) -> Vec<CellRow> {
    metrics
        .values()
        .map(|m| {
            let (n, o) = (&m.nucleus, &m.nucleolus);
            CellRow {
                image: name.to_string(),
                cell_id: m.id,
                nucleus_area: n.area,
                nucleus_centroid_row: n.centroid_row,
                nucleus_centroid_col: n.centroid_col,
                nucleus_eccentricity: n.eccentricity,
                nucleus_solidity: n.solidity,
                nucleus_perimeter: n.perimeter,
                nucleus_circularity: n.circularity,
                nucleus_mean_intensity: n.mean_intensity,
                nucleus_integrated_intensity: n.integrated_intensity,
                nucleus_intensity_std: n.intensity_std,
                nucleus_cv: n.coefficient_of_variation,
                nucleolus_area: o.area,
                nucleolus_centroid_row: o.centroid_row,
                nucleolus_centroid_col: o.centroid_col,
                nucleolus_eccentricity: o.eccentricity,
                nucleolus_solidity: o.solidity,
                nucleolus_perimeter: o.perimeter,
                nucleolus_circularity: o.circularity,
                nucleolus_mean_intensity: o.mean_intensity,
                nucleolus_integrated_intensity: o.integrated_intensity,
                nucleolus_intensity_std: o.intensity_std,
                nucleolus_cv: o.coefficient_of_variation,
                fraction_area: m.fraction_area,
                radial_location: m.radial_location,
                integrated_ratio: m.integrated_ratio,
            }
        })
        .collect()
}

/// Summarize one image report
pub fn summary_row(report: &ImageReport) -> ImageSummaryRow {
    let mut row = ImageSummaryRow {
        image: report.name.clone(),
        status: String::new(),
        nuclei: 0,
        nucleoli: 0,
        cells: 0,
        unmatched_nuclei: 0,
        unmatched_nucleoli: 0,
        degenerate: false,
        lower_threshold: None,
        upper_threshold: None,
        mean_fraction_area: None,
        message: String::new(),
    };

    match &report.outcome {
        ImageOutcome::Completed {
            nuclei,
            nucleoli,
            diagnostics,
            metrics,
        } => {
            row.status = "completed".to_string();
            row.cells = metrics.len();
            match diagnostics {
                // Counts before matching
                Some(d) => {
                    row.nuclei = d.nuclei_found;
                    row.nucleoli = d.nucleoli_found;
                    row.unmatched_nuclei = d.unmatched_nuclei;
                    row.unmatched_nucleoli = d.unmatched_nucleoli;
                    row.degenerate = d.degenerate;
                    row.lower_threshold = d.thresholds.map(|t| t.lower);
                    row.upper_threshold = d.thresholds.map(|t| t.upper);
                }
                // Existing masks: only the maps themselves are known
                None => {
                    row.nuclei = nuclei.num_regions();
                    row.nucleoli = nucleoli.num_regions();
                }
            }
            if !metrics.is_empty() {
                let total: f64 = metrics.values().map(|m| m.fraction_area).sum();
                row.mean_fraction_area = Some(total / metrics.len() as f64);
            }
        }
        ImageOutcome::Cancelled => row.status = "cancelled".to_string(),
        ImageOutcome::Failed(message) => {
            row.status = "failed".to_string();
            row.message = message.clone();
        }
    }
    row
}

/// Write label maps and both CSV tables under `out_dir`
///
/// The directory is created if needed. Existing files are replaced.
pub fn write_outputs(out_dir: &Path, reports: &[ImageReport]) -> BatchResult<()> {
    std::fs::create_dir_all(out_dir).map_err(IoError::from)?;

    let mut cells = Vec::new();
    for report in reports {
        if let ImageOutcome::Completed {
            nuclei,
            nucleoli,
            diagnostics,
            metrics,
        } = &report.outcome
        {
            if diagnostics.is_some() {
                let (nuclei_path, nucleoli_path) = mask_paths(out_dir, &report.name);
                write_label_map(nuclei, nuclei_path)?;
                write_label_map(nucleoli, nucleoli_path)?;
            }
            cells.extend(cell_rows(&report.name, metrics));
        }
    }
    let summary: Vec<ImageSummaryRow> = reports.iter().map(summary_row).collect();

    write_csv_file(&cells, out_dir.join(CELLS_CSV))?;
    write_csv_file(&summary, out_dir.join(SUMMARY_CSV))?;
    log::info!(
        "write_outputs: {} cells from {} images to {}",
        cells.len(),
        reports.len(),
        out_dir.display()
    );
    Ok(())
}
