//! Centered padding onto a fixed-size canvas

use crate::{TransformError, TransformResult};
use inkdigit_core::GrayImage;

/// Offset that centres `inner` within `outer`: `floor((outer - inner) / 2)`
///
/// Negative when the inner extent is larger.
pub fn center_offset(outer: u32, inner: u32) -> i64 {
    (outer as i64 - inner as i64).div_euclid(2)
}

/// Paste `image` centered on a `width x height` canvas filled with `fill`
///
/// Source pixels that land outside the canvas are clipped.
pub fn pad_centered(image: &GrayImage, width: u32, height: u32, fill: f32) -> TransformResult<GrayImage> {
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidParameters(format!(
            "canvas size must be positive, got {width}x{height}"
        )));
    }
    let mut out = GrayImage::new_with_value(width, height, fill)?;
    let ox = center_offset(width, image.width());
    let oy = center_offset(height, image.height());
    for y in 0..image.height() {
        let ty = y as i64 + oy;
        if ty < 0 || ty >= height as i64 {
            continue;
        }
        for x in 0..image.width() {
            let tx = x as i64 + ox;
            if tx < 0 || tx >= width as i64 {
                continue;
            }
            out.set_pixel_unchecked(tx as u32, ty as u32, image.get_pixel_unchecked(x, y));
        }
    }
    Ok(out)
}
