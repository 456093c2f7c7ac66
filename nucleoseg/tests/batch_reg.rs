//! Batch processing regression test
//!
//! 1. A mixed batch keeps input order and reports every image
//! 2. A tripped cancel token stops every image from starting
//! 3. Existing masks skip segmentation and are measured directly
//! 4. Outputs land on disk with the documented layout
//!
//! Run with:
//! ```
//! cargo test -p nucleoseg --test batch_reg
//! ```

use nucleoseg::output::{CELLS_CSV, SUMMARY_CSV, load_existing_masks, mask_paths, write_outputs};
use nucleoseg::segment::{SegmentConfig, compute_metrics};
use nucleoseg::{BatchItem, CancelToken, ExistingMasks, FImage, ImageOutcome, process_batch};
use nucleoseg_test::RegParams;
use nucleoseg_test::synth::{disk_labels, touching_nuclei, two_separated_cells};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn mixed_batch() -> Vec<BatchItem> {
    vec![
        BatchItem::new("separated", two_separated_cells().unwrap()),
        BatchItem::new("dark", FImage::new(100, 100).unwrap()),
        BatchItem::new("touching", touching_nuclei().unwrap()),
    ]
}

#[test]
fn batch_reg() {
    init_logging();
    let mut rp = RegParams::new("batch");

    let reports = process_batch(&mixed_batch(), &SegmentConfig::default(), &CancelToken::new())
        .unwrap();
    let names: Vec<&str> = reports.iter().map(|r| r.name.as_str()).collect();
    rp.check(names == ["separated", "dark", "touching"], "input order kept");
    rp.compare_values(2.0, reports[0].num_cells() as f64, 0.0);
    rp.compare_values(0.0, reports[1].num_cells() as f64, 0.0);
    rp.compare_values(2.0, reports[2].num_cells() as f64, 0.0);

    if let ImageOutcome::Completed { diagnostics, .. } = &reports[1].outcome {
        rp.check(
            diagnostics.as_ref().is_some_and(|d| d.degenerate),
            "dark image flagged degenerate",
        );
    } else {
        rp.check(false, "dark image completes");
    }

    let cancel = CancelToken::new();
    cancel.cancel();
    let cancelled = process_batch(&mixed_batch(), &SegmentConfig::default(), &cancel).unwrap();
    rp.check(
        cancelled
            .iter()
            .all(|r| matches!(r.outcome, ImageOutcome::Cancelled)),
        "cancelled batch starts nothing",
    );

    assert!(rp.cleanup());
}

#[test]
fn batch_reg_existing_masks() {
    init_logging();
    let mut rp = RegParams::new("batch_masks");

    let image = two_separated_cells().unwrap();
    let nuclei = disk_labels(100, 100, &[(30, 50, 10), (70, 50, 10)]).unwrap();
    let nucleoli = disk_labels(100, 100, &[(30, 50, 3), (70, 50, 3)]).unwrap();
    let expected = compute_metrics(&image, &nuclei, &nucleoli).unwrap();

    let item = BatchItem::new("given", image).with_masks(ExistingMasks { nuclei, nucleoli });
    let reports = process_batch(&[item], &SegmentConfig::default(), &CancelToken::new()).unwrap();
    match &reports[0].outcome {
        ImageOutcome::Completed {
            diagnostics,
            metrics,
            ..
        } => {
            rp.check(diagnostics.is_none(), "no segmentation ran");
            rp.check(*metrics == expected, "metrics measured on the given maps");
            for record in metrics.values() {
                rp.compare_values(29.0 / 317.0, record.fraction_area, 1e-12);
            }
        }
        other => {
            rp.check(false, &format!("unexpected outcome {other:?}"));
        }
    }

    assert!(rp.cleanup());
}

#[test]
fn batch_reg_outputs() {
    init_logging();
    let mut rp = RegParams::new("batch_outputs");
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("results");

    let reports = process_batch(&mixed_batch(), &SegmentConfig::default(), &CancelToken::new())
        .unwrap();
    write_outputs(&out, &reports).unwrap();

    let cells = std::fs::read_to_string(out.join(CELLS_CSV)).unwrap();
    let summary = std::fs::read_to_string(out.join(SUMMARY_CSV)).unwrap();
    // Header plus 2 + 0 + 2 cells
    rp.compare_values(5.0, cells.lines().count() as f64, 0.0);
    rp.compare_values(4.0, summary.lines().count() as f64, 0.0);
    rp.check(
        summary.lines().nth(2).is_some_and(|l| l.starts_with("dark,completed,0,0,0,")),
        "dark image summarized",
    );

    // Written maps read back as existing masks
    let (nuclei_path, _) = mask_paths(&out, "separated");
    rp.check(nuclei_path.exists(), "nucleus map written");
    let masks = load_existing_masks(&out, "separated").unwrap();
    if let ImageOutcome::Completed { nuclei, nucleoli, .. } = &reports[0].outcome {
        rp.compare_labels(nuclei, &masks.nuclei);
        rp.compare_labels(nucleoli, &masks.nucleoli);
    }

    assert!(rp.cleanup());
}

#[test]
fn batch_reg_core_reexports() {
    let mut rp = RegParams::new("batch_core_reexports");

    // Core's error module stays reachable through the umbrella crate
    let err: nucleoseg::error::Result<FImage> = FImage::new(0, 4);
    rp.check(
        matches!(err, Err(nucleoseg::error::Error::InvalidDimension { .. })),
        "core error re-exported",
    );
    let batch_err: nucleoseg::BatchError = nucleoseg::io::IoError::DecodeError("x".into()).into();
    rp.check(batch_err.to_string().contains('x'), "batch error converts io errors");

    assert!(rp.cleanup());
}
