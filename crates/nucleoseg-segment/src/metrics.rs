//! Per-region and per-cell metrics
//!
//! [`region_metrics`] turns region properties into the reported features;
//! [`compute_metrics`] joins the nucleus and nucleolus tables on pair id and
//! adds the cross-entity ratios. Ratios with a zero denominator are defined
//! as 0 so that every reported value is finite.

use crate::SegmentResult;
use nucleoseg_core::{FImage, LabelMap};
use nucleoseg_region::{RegionProps, region_props};
use std::collections::BTreeMap;
use std::f64::consts::PI;

/// Shape and intensity features of one region
#[derive(Debug, Clone, PartialEq)]
pub struct RegionMetrics {
    /// Region label (pair id for matched maps)
    pub label: u32,
    /// Pixel count
    pub area: u32,
    /// Centroid row
    pub centroid_row: f64,
    /// Centroid column
    pub centroid_col: f64,
    /// Eccentricity of the moment-equivalent ellipse
    pub eccentricity: f64,
    /// Area over convex hull area
    pub solidity: f64,
    /// Boundary length; `sqrt(4π·area)` when the measured length is 0
    pub perimeter: f64,
    /// `4π·area / perimeter²`
    pub circularity: f64,
    /// Mean intensity
    pub mean_intensity: f64,
    /// `mean_intensity * area`
    pub integrated_intensity: f64,
    /// Population standard deviation of intensity
    pub intensity_std: f64,
    /// `intensity_std / mean_intensity`
    pub coefficient_of_variation: f64,
}

impl From<&RegionProps> for RegionMetrics {
    fn from(props: &RegionProps) -> Self {
        let area = props.area as f64;
        let perimeter = if props.perimeter > 0.0 {
            props.perimeter
        } else {
            (area * 4.0 * PI).sqrt()
        };
        let circularity = if perimeter > 0.0 {
            4.0 * PI * area / (perimeter * perimeter)
        } else {
            0.0
        };
        let coefficient_of_variation = if props.mean_intensity == 0.0 {
            0.0
        } else {
            props.intensity_std / props.mean_intensity
        };

        RegionMetrics {
            label: props.label,
            area: props.area,
            centroid_row: props.centroid.0,
            centroid_col: props.centroid.1,
            eccentricity: props.eccentricity,
            solidity: props.solidity,
            perimeter,
            circularity,
            mean_intensity: props.mean_intensity,
            integrated_intensity: props.mean_intensity * area,
            intensity_std: props.intensity_std,
            coefficient_of_variation,
        }
    }
}

/// Cross-entity metrics for one matched cell
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsRecord {
    /// Pair id
    pub id: u32,
    /// Nucleus features
    pub nucleus: RegionMetrics,
    /// Nucleolus features
    pub nucleolus: RegionMetrics,
    /// Nucleolus area over nucleus area
    pub fraction_area: f64,
    /// Centroid offset over the nucleus equivalent radius `sqrt(area / π)`
    pub radial_location: f64,
    /// Nucleolus integrated intensity over nucleus integrated intensity
    pub integrated_ratio: f64,
}

impl MetricsRecord {
    fn new(id: u32, nucleus: RegionMetrics, nucleolus: RegionMetrics) -> Self {
        let fraction_area = ratio(nucleolus.area as f64, nucleus.area as f64);
        let offset = (nucleolus.centroid_row - nucleus.centroid_row)
            .hypot(nucleolus.centroid_col - nucleus.centroid_col);
        let radius = (nucleus.area as f64 / PI).sqrt();
        let radial_location = ratio(offset, radius);
        let integrated_ratio = ratio(
            nucleolus.integrated_intensity,
            nucleus.integrated_intensity,
        );
        MetricsRecord {
            id,
            nucleus,
            nucleolus,
            fraction_area,
            radial_location,
            integrated_ratio,
        }
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

/// Metrics of every region in a label map, keyed by label
pub fn region_metrics(
    image: &FImage,
    labels: &LabelMap,
) -> SegmentResult<BTreeMap<u32, RegionMetrics>> {
    Ok(region_props(labels, image)?
        .iter()
        .map(|props| (props.label, RegionMetrics::from(props)))
        .collect())
}

/// Metrics of every matched cell, keyed by pair id
///
/// Only ids present in both maps produce a record.
///
/// # Arguments
///
/// * `image` - Intensity image the statistics are measured on
/// * `nuclei` - Matched nucleus map
/// * `nucleoli` - Matched nucleolus map
pub fn compute_metrics(
    image: &FImage,
    nuclei: &LabelMap,
    nucleoli: &LabelMap,
) -> SegmentResult<BTreeMap<u32, MetricsRecord>> {
    let nucleus_table = region_metrics(image, nuclei)?;
    let mut nucleolus_table = region_metrics(image, nucleoli)?;

    let records: BTreeMap<u32, MetricsRecord> = nucleus_table
        .into_iter()
        .filter_map(|(id, nucleus)| {
            nucleolus_table
                .remove(&id)
                .map(|nucleolus| (id, MetricsRecord::new(id, nucleus, nucleolus)))
        })
        .collect();
    log::debug!("compute_metrics: {} records", records.len());
    Ok(records)
}
