//! Fit-and-pad regression test
//!
//! Run with:
//! ```
//! cargo test -p inkdigit-transform --test fit_reg
//! ```

use inkdigit_core::GrayImage;
use inkdigit_test::RegParams;
use inkdigit_transform::{pad_centered, scale_to_fit, scale_to_size};

#[test]
fn fit_reg() {
    let mut rp = RegParams::new("fit");

    // --- Tall glyph box: 41x61 -> 13x20 -> centered in 28x28 ---
    let tall = GrayImage::new_with_value(41, 61, 1.0).unwrap();
    let scaled = scale_to_fit(&tall, 20).unwrap();
    rp.compare_values(13.0, scaled.width() as f64, 0.0);
    rp.compare_values(20.0, scaled.height() as f64, 0.0);
    let padded = pad_centered(&scaled, 28, 28, 0.0).unwrap();
    let (cx, cy) = padded.center_of_mass().unwrap();
    rp.compare_values(13.5, cx + 0.5, 1.0);
    rp.compare_values(13.5, cy + 0.5, 1.0);

    // --- Wide glyph box keeps its aspect ---
    let wide = GrayImage::new_with_value(90, 30, 1.0).unwrap();
    let scaled = scale_to_fit(&wide, 20).unwrap();
    rp.compare_values(20.0, scaled.width() as f64, 0.0);
    rp.compare_values(7.0, scaled.height() as f64, 0.0);

    // --- Upscaling a constant image stays constant ---
    let up = scale_to_size(&tall, 82, 122).unwrap();
    rp.compare_images(&GrayImage::new_with_value(82, 122, 1.0).unwrap(), &up, 1e-6);

    assert!(rp.cleanup());
}
