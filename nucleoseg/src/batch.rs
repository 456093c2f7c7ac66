//! Batch processing
//!
//! Runs the per-image pipeline over many images on the rayon thread pool.
//! Images are independent: one failing image is reported and the rest
//! continue. Reports come back in input order.
//!
//! A [`CancelToken`] is checked before each image starts; images not yet
//! started when it trips are reported as [`ImageOutcome::Cancelled`]. An
//! image already running always finishes.

use crate::BatchResult;
use nucleoseg_core::{FImage, LabelMap};
use nucleoseg_segment::{
    MetricsRecord, SegmentConfig, SegmentDiagnostics, compute_metrics, segment,
};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Previously computed, already matched label maps for one image
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingMasks {
    pub nuclei: LabelMap,
    pub nucleoli: LabelMap,
}

/// One image to process
#[derive(Debug, Clone)]
pub struct BatchItem {
    /// Name used in reports and output file names
    pub name: String,
    /// Raw intensity image
    pub image: FImage,
    /// When present, segmentation is skipped and metrics are measured on
    /// these maps
    pub masks: Option<ExistingMasks>,
}

impl BatchItem {
    /// Item to be segmented from scratch
    pub fn new(name: impl Into<String>, image: FImage) -> Self {
        BatchItem {
            name: name.into(),
            image,
            masks: None,
        }
    }

    /// Attach existing matched maps
    pub fn with_masks(mut self, masks: ExistingMasks) -> Self {
        self.masks = Some(masks);
        self
    }
}

/// Cooperative cancellation shared between a batch and its caller
///
/// Clones share the same flag. The token trips when [`cancel`](Self::cancel)
/// is called or when the optional deadline passes.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// Token that only trips on an explicit cancel
    pub fn new() -> Self {
        Self::default()
    }

    /// Token that also trips once `deadline` has passed
    pub fn with_deadline(deadline: Instant) -> Self {
        CancelToken {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: Some(deadline),
        }
    }

    /// Token that also trips `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// True once cancelled or past the deadline
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst) || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Result of processing one image
#[derive(Debug, Clone)]
pub enum ImageOutcome {
    /// Metrics were computed
    Completed {
        /// Matched nucleus map
        nuclei: LabelMap,
        /// Matched nucleolus map
        nucleoli: LabelMap,
        /// Present when the maps were segmented in this run
        diagnostics: Option<SegmentDiagnostics>,
        /// Per-cell metrics keyed by pair id
        metrics: BTreeMap<u32, MetricsRecord>,
    },
    /// The batch was cancelled before this image started
    Cancelled,
    /// Processing failed; the message describes why
    Failed(String),
}

/// Outcome of one image, tagged with its name
#[derive(Debug, Clone)]
pub struct ImageReport {
    pub name: String,
    pub outcome: ImageOutcome,
}

impl ImageReport {
    /// Report for an image that could not even be loaded
    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        ImageReport {
            name: name.into(),
            outcome: ImageOutcome::Failed(message.into()),
        }
    }

    /// Number of matched cells (0 unless completed)
    pub fn num_cells(&self) -> usize {
        match &self.outcome {
            ImageOutcome::Completed { metrics, .. } => metrics.len(),
            _ => 0,
        }
    }
}

/// Segment (unless maps are supplied) and measure one image
///
/// # Errors
///
/// Returns [`BatchError::Segment`](crate::BatchError::Segment) when
/// segmentation or measurement fails, including supplied maps whose size
/// differs from the image.
pub fn process_item(item: &BatchItem, config: &SegmentConfig) -> BatchResult<ImageOutcome> {
    let (nuclei, nucleoli, diagnostics) = match &item.masks {
        Some(masks) => {
            log::debug!("{}: using existing masks", item.name);
            (masks.nuclei.clone(), masks.nucleoli.clone(), None)
        }
        None => {
            let seg = segment(&item.image, config)?;
            (seg.nuclei, seg.nucleoli, Some(seg.diagnostics))
        }
    };
    let metrics = compute_metrics(&item.image, &nuclei, &nucleoli)?;
    log::info!("{}: {} cells measured", item.name, metrics.len());

    Ok(ImageOutcome::Completed {
        nuclei,
        nucleoli,
        diagnostics,
        metrics,
    })
}

/// Process every item in parallel
///
/// # Arguments
///
/// * `items` - Images to process
/// * `config` - Segmentation parameters shared by all images
/// * `cancel` - Checked before each image starts
///
/// # Returns
///
/// One report per item, in input order.
///
/// # Errors
///
/// Returns [`BatchError::Segment`](crate::BatchError::Segment) if `config`
/// is invalid; per-image failures are reported in the returned list.
pub fn process_batch(
    items: &[BatchItem],
    config: &SegmentConfig,
    cancel: &CancelToken,
) -> BatchResult<Vec<ImageReport>> {
    config.validate()?;

    let reports: Vec<ImageReport> = items
        .par_iter()
        .map(|item| {
            let outcome = if cancel.is_cancelled() {
                log::warn!("{}: cancelled before start", item.name);
                ImageOutcome::Cancelled
            } else {
                match process_item(item, config) {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        log::warn!("{}: {}", item.name, e);
                        ImageOutcome::Failed(e.to_string())
                    }
                }
            };
            ImageReport {
                name: item.name.clone(),
                outcome,
            }
        })
        .collect();

    let completed = reports
        .iter()
        .filter(|r| matches!(r.outcome, ImageOutcome::Completed { .. }))
        .count();
    log::info!(
        "process_batch: {completed}/{} images completed, {} cells",
        reports.len(),
        reports.iter().map(ImageReport::num_cells).sum::<usize>()
    );
    Ok(reports)
}
