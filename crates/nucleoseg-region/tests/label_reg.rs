//! Label-map utilities regression test
//!
//! Checks the cleanup of binary candidate masks:
//! - segment_binary(): labeling, size filter, border clearing, relabeling
//! - remove_oversized_regions(): outlier rejection against the mean area
//! - fill_holes(): enclosed background becomes foreground
//! - region_props(): measurements on the cleaned labels
//!
//! Run with:
//! ```
//! cargo test -p nucleoseg-region --test label_reg
//! ```

use nucleoseg_core::{FImage, Mask};
use nucleoseg_region::{
    ConnectivityType, fill_holes, region_areas, region_props, remove_oversized_regions,
    segment_binary,
};
use nucleoseg_test::RegParams;

/// Squares of the given sizes laid out on a row, plus one touching the
/// left border
fn squares(sizes: &[u32]) -> Mask {
    let mut spans = Vec::new();
    let mut x0 = 4;
    for &s in sizes {
        spans.push((x0, s));
        x0 += s + 3;
    }
    Mask::from_fn(x0 + 4, 30, |x, y| {
        let border_blob = x < 3 && (10..14).contains(&y);
        border_blob
            || spans
                .iter()
                .any(|&(sx, s)| x >= sx && x < sx + s && y >= 5 && y < 5 + s)
    })
    .unwrap()
}

#[test]
fn label_reg() {
    let mut rp = RegParams::new("label");

    let mask = squares(&[1, 3, 4, 4, 12]);
    let labels = segment_binary(&mask, 5).unwrap();
    let areas = region_areas(&labels);
    eprintln!("  areas after segment_binary: {:?}", &areas[1..]);
    rp.compare_values(4.0, labels.num_regions() as f64, 0.0);
    rp.check(labels.is_contiguous(), "labels are contiguous");
    rp.compare_values(9.0, areas[1] as f64, 0.0);
    rp.compare_values(144.0, areas[4] as f64, 0.0);

    // Idempotent on an already clean mask
    let again = segment_binary(&labels.to_mask(), 5).unwrap();
    rp.compare_labels(&labels, &again);

    // Mean area (9 + 16 + 16 + 144) / 4 = 46.25; 144 > 2.5 * 46.25
    let kept = remove_oversized_regions(&labels, 2.5).unwrap();
    rp.compare_values(3.0, kept.num_regions() as f64, 0.0);
    rp.check(kept.is_contiguous(), "kept labels are contiguous");
    // The input is left as it was
    rp.compare_values(4.0, labels.num_regions() as f64, 0.0);

    assert!(rp.cleanup());
}

#[test]
fn label_reg_fill_and_props() {
    let mut rp = RegParams::new("label_props");

    // Square annulus: 9x9 outline, 3 px thick, 3x3 hole
    let ring = Mask::from_fn(15, 15, |x, y| {
        let outer = (3..12).contains(&x) && (3..12).contains(&y);
        let inner = (6..9).contains(&x) && (6..9).contains(&y);
        outer && !inner
    })
    .unwrap();
    let filled = fill_holes(&ring, ConnectivityType::FourWay).unwrap();
    rp.compare_values(72.0, ring.count() as f64, 0.0);
    rp.compare_values(81.0, filled.count() as f64, 0.0);

    let labels = segment_binary(&filled, 1).unwrap();
    let image = FImage::from_fn(15, 15, |x, _| x as f32).unwrap();
    let props = region_props(&labels, &image).unwrap();
    rp.compare_values(1.0, props.len() as f64, 0.0);
    let p = &props[0];
    rp.compare_values(7.0, p.centroid.0, 1e-12);
    rp.compare_values(7.0, p.centroid.1, 1e-12);
    rp.compare_values(1.0, p.solidity, 0.0);
    rp.compare_values(32.0, p.perimeter, 1e-12);
    rp.compare_values(7.0, p.mean_intensity, 1e-12);

    assert!(rp.cleanup());
}
