//! Dilation regression test
//!
//! Run with:
//! ```
//! cargo test -p inkdigit-morph --test dilate_reg
//! ```

use inkdigit_core::{BitGrid, GrayImage, Shape};
use inkdigit_morph::dilate_gray;
use inkdigit_test::RegParams;
use inkdigit_test::fixtures;

#[test]
fn dilate_reg() {
    let mut rp = RegParams::new("dilate");

    // --- Thickening a thin rendered digit ---
    let strokes = fixtures::digit_strokes(7, 2.0, 2.0, 0.25, 0).unwrap();
    let mut grid = BitGrid::new(16, 20).unwrap();
    for s in &strokes {
        s.render(&mut grid, 0, 0, 1);
    }
    let thin = GrayImage::from_bit_grid(&grid);
    rp.compare_values(1.0, if thin.sum() > 0.0 { 1.0 } else { 0.0 }, 0.0);

    let thick = dilate_gray(&thin, 3, 3).unwrap();
    // every output pixel is ink exactly when some 3x3 neighbour is
    let mut expected = BitGrid::new(16, 20).unwrap();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if grid.get(x, y) {
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        expected.set_clipped(x as i64 + dx, y as i64 + dy);
                    }
                }
            }
        }
    }
    rp.compare_images(&GrayImage::from_bit_grid(&expected), &thick, 0.0);

    // Thickening never removes ink
    let kept = thin
        .data()
        .iter()
        .zip(thick.data())
        .all(|(&a, &b)| a == 0.0 || b == 1.0);
    rp.compare_values(1.0, if kept { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(1.0, if thick.sum() > thin.sum() { 1.0 } else { 0.0 }, 0.0);

    assert!(rp.cleanup());
}
