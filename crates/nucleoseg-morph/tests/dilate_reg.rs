//! Dilation and erosion regression test
//!
//! 1. Disk structuring elements have the expected hit counts
//! 2. Dilating a single pixel reproduces the disk
//! 3. Closing a rectangle with a disk returns the rectangle
//! 4. Label dilation grows regions and lets the larger label win
//!
//! Run with:
//! ```
//! cargo test -p nucleoseg-morph --test dilate_reg
//! ```

use nucleoseg_core::{LabelMap, Mask};
use nucleoseg_morph::{Sel, dilate, dilate_labels, erode};
use nucleoseg_test::RegParams;

#[test]
fn dilate_reg() {
    let mut rp = RegParams::new("dilate");

    for (radius, hits) in [(1u32, 5usize), (2, 13), (3, 29), (10, 317)] {
        let sel = Sel::create_disk(radius).unwrap();
        rp.compare_values(hits as f64, sel.hit_count() as f64, 0.0);
        rp.compare_values((2 * radius + 1) as f64, sel.width() as f64, 0.0);
    }

    // A lone pixel dilates into the element itself
    let mut dot = Mask::new(31, 31).unwrap();
    dot.set(15, 15, true).unwrap();
    let grown = dilate(&dot, &Sel::create_disk(10).unwrap()).unwrap();
    rp.compare_values(317.0, grown.count() as f64, 0.0);
    rp.check(grown.get(5, 15) && grown.get(15, 25), "disk reaches its radius");
    rp.check(!grown.get(6, 6), "disk corner stays background");

    let rect = Mask::from_fn(30, 30, |x, y| (10..20).contains(&x) && (12..18).contains(&y)).unwrap();
    let cross = Sel::create_cross();
    let thick = dilate(&rect, &cross).unwrap();
    rp.compare_values((60 + 2 * 10 + 2 * 6) as f64, thick.count() as f64, 0.0);

    let disk = Sel::create_disk(3).unwrap();
    let closed = erode(&dilate(&rect, &disk).unwrap(), &disk).unwrap();
    rp.check(closed == rect, "closing keeps a rectangle");

    // Erosion treats the outside as background
    let full = Mask::from_fn(5, 5, |_, _| true).unwrap();
    let eroded = erode(&full, &cross).unwrap();
    rp.compare_values(9.0, eroded.count() as f64, 0.0);

    assert!(rp.cleanup());
}

#[test]
fn dilate_reg_labels() {
    let mut rp = RegParams::new("dilate_labels");

    let mut labels = LabelMap::new(20, 9).unwrap();
    labels.set(5, 4, 1).unwrap();
    labels.set(8, 4, 2).unwrap();
    let out = dilate_labels(&labels, &Sel::create_disk(2).unwrap()).unwrap();

    rp.compare_values(1.0, out.get(5, 4) as f64, 0.0);
    // Both disks cover (6, 4) and (7, 4); label 2 wins there
    rp.compare_values(2.0, out.get(6, 4) as f64, 0.0);
    rp.compare_values(2.0, out.get(7, 4) as f64, 0.0);
    rp.compare_values(13.0, out.areas()[2] as f64, 0.0);
    rp.compare_values(0.0, out.get(12, 4) as f64, 0.0);

    assert!(rp.cleanup());
}
