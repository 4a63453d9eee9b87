//! Ink capture and raster regression test
//!
//! Run with:
//! ```
//! cargo test -p inkdigit-core --test ink_reg
//! ```

use inkdigit_core::{BitGrid, GrayImage, Point, Shape, Stroke, StrokeBuilder};
use inkdigit_test::RegParams;
use inkdigit_test::fixtures;

#[test]
fn ink_capture_reg() {
    let mut rp = RegParams::new("ink_capture");

    // --- Pen events become one immutable stroke ---
    let mut builder = StrokeBuilder::new();
    builder.pen_down(Point::new(10.0, 10.0, 0));
    builder.pen_move(Point::new(10.0, 30.0, 16));
    builder.pen_move(Point::new(10.0, 50.0, 32));
    let stroke = builder.pen_up().unwrap().unwrap();
    rp.compare_values(3.0, stroke.len() as f64, 0.0);
    rp.compare_values(40.0, stroke.path_length(), 0.0);
    rp.compare_values(32.0, stroke.duration() as f64, 0.0);
    let b = stroke.bounding_box();
    rp.compare_values(0.0, b.width(), 0.0);
    rp.compare_values(1.0, b.pixel_width() as f64, 0.0);
    rp.compare_values(41.0, b.pixel_height() as f64, 0.0);
    assert!(builder.pen_up().unwrap().is_none());

    // --- Stroke rendering with a square pen ---
    let bar = Stroke::from_xyt(&[(0.0, 1.0, 0), (9.0, 1.0, 16)]).unwrap();
    let mut grid = BitGrid::new(10, 3).unwrap();
    bar.render(&mut grid, 0, 0, 1);
    rp.compare_values(10.0, grid.count_foreground() as f64, 0.0);
    bar.render(&mut grid, 0, 0, 3);
    rp.compare_values(30.0, grid.count_foreground() as f64, 0.0);

    // --- Offset origin clips ink outside the canvas ---
    let mut grid = BitGrid::new(10, 3).unwrap();
    bar.render(&mut grid, 5, 0, 1);
    rp.compare_values(5.0, grid.count_foreground() as f64, 0.0);

    assert!(rp.cleanup());
}

#[test]
fn ink_raster_reg() {
    let mut rp = RegParams::new("ink_raster");

    // --- Alpha thresholding ---
    let rgba = [0, 0, 0, 255, 0, 0, 0, 10, 9, 9, 9, 129, 0, 0, 0, 128];
    let grid = BitGrid::from_rgba(2, 2, &rgba, 128).unwrap();
    rp.compare_values(2.0, grid.count_foreground() as f64, 0.0);
    assert!(grid.get(0, 0) && grid.get(0, 1) && !grid.get(1, 1));
    assert!(BitGrid::from_rgba(2, 2, &rgba[..12], 128).is_err());

    // --- Filled square statistics ---
    let grid = fixtures::filled_square_grid(20, 20, 5, 5, 4).unwrap();
    let image = GrayImage::from_bit_grid(&grid);
    rp.compare_values(16.0, image.sum(), 0.0);
    let (cx, cy) = image.center_of_mass().unwrap();
    rp.compare_values(6.5, cx, 1e-12);
    rp.compare_values(6.5, cy, 1e-12);

    let blank = GrayImage::new(4, 4).unwrap();
    assert!(blank.center_of_mass().is_none());

    assert!(rp.cleanup());
}
