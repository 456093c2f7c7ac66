//! Nucleus–nucleolus matching
//!
//! Pairs every nucleus with at most one nucleolus and renumbers both maps
//! with a shared pair id, so that id `k` in the nucleus map and id `k` in
//! the nucleolus map describe the same cell.
//!
//! Nuclei are visited in label order. Each one takes the nucleolus it
//! overlaps most; ties go to the lowest nucleolus label. A nucleolus claimed
//! by an earlier nucleus cannot be claimed again. Nuclei without a nucleolus
//! and nucleoli never claimed are dropped and counted.

use crate::SegmentResult;
use nucleoseg_core::LabelMap;
use std::collections::BTreeMap;

/// One matched nucleus/nucleolus pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedPair {
    /// Shared id in both output maps, starting at 1
    pub id: u32,
    /// Label of the nucleus in the input nucleus map
    pub nucleus_label: u32,
    /// Label of the nucleolus in the input nucleolus map
    pub nucleolus_label: u32,
    /// Number of pixels the two regions share
    pub overlap: u32,
}

/// Output of [`match_regions`]
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Matched nuclei labeled by pair id
    pub nuclei: LabelMap,
    /// Matched nucleoli labeled by pair id
    pub nucleoli: LabelMap,
    /// Pairs in id order
    pub pairs: Vec<MatchedPair>,
    /// Nuclei that found no eligible nucleolus
    pub unmatched_nuclei: usize,
    /// Nucleoli that no nucleus claimed
    pub unmatched_nucleoli: usize,
}

/// Pair nuclei with nucleoli
///
/// # Arguments
///
/// * `nuclei` - Nucleus label map
/// * `nucleoli` - Nucleolus label map of the same size
///
/// # Returns
///
/// Two new maps holding exactly the ids `1..=N` (N = number of pairs). A
/// nucleus keeps its own pixels; its nucleolus keeps its whole region,
/// including any part outside the nucleus.
///
/// # Errors
///
/// Returns an error if the maps differ in size.
pub fn match_regions(nuclei: &LabelMap, nucleoli: &LabelMap) -> SegmentResult<MatchResult> {
    nuclei.check_same_size(nucleoli.dimensions())?;
    let (width, height) = nuclei.dimensions();
    let nucleolus_pixels = nucleoli.region_indices();
    let mut claimed = vec![false; nucleolus_pixels.len()];

    let mut out_nuclei = LabelMap::new(width, height)?;
    let mut out_nucleoli = LabelMap::new(width, height)?;
    let mut pairs = Vec::new();
    let mut unmatched_nuclei = 0;

    for (nucleus_label, pixels) in nuclei.region_indices().iter().enumerate().skip(1) {
        if pixels.is_empty() {
            continue;
        }

        let mut overlaps: BTreeMap<u32, u32> = BTreeMap::new();
        for &i in pixels {
            let label = nucleoli.data()[i];
            if label > 0 && !claimed[label as usize] {
                *overlaps.entry(label).or_insert(0) += 1;
            }
        }

        // Ascending label order with a strict comparison keeps the lowest
        // label among equal overlaps
        let mut best: Option<(u32, u32)> = None;
        for (&label, &count) in &overlaps {
            if best.is_none_or(|(_, c)| count > c) {
                best = Some((label, count));
            }
        }
        let Some((nucleolus_label, overlap)) = best else {
            unmatched_nuclei += 1;
            continue;
        };

        claimed[nucleolus_label as usize] = true;
        let id = pairs.len() as u32 + 1;
        for &i in pixels {
            out_nuclei.data_mut()[i] = id;
        }
        for &i in &nucleolus_pixels[nucleolus_label as usize] {
            out_nucleoli.data_mut()[i] = id;
        }
        pairs.push(MatchedPair {
            id,
            nucleus_label: nucleus_label as u32,
            nucleolus_label,
            overlap,
        });
    }

    let unmatched_nucleoli = nucleoli.num_regions() - pairs.len();
    log::debug!(
        "match_regions: {} pairs, {unmatched_nuclei} nuclei and {unmatched_nucleoli} nucleoli unmatched",
        pairs.len()
    );
    Ok(MatchResult {
        nuclei: out_nuclei,
        nucleoli: out_nucleoli,
        pairs,
        unmatched_nuclei,
        unmatched_nucleoli,
    })
}
