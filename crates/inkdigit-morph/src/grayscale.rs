//! Grayscale dilation
//!
//! Each output pixel is the maximum value under the hits of the
//! structuring element. Positions that fall outside the image are skipped.

use crate::{MorphError, MorphResult, Sel};
use inkdigit_core::GrayImage;

/// Dilate a grayscale image with a structuring element
pub fn dilate_gray_sel(image: &GrayImage, sel: &Sel) -> MorphResult<GrayImage> {
    let offsets = sel.hit_offsets();
    if offsets.is_empty() {
        return Err(MorphError::InvalidSel("no hits".into()));
    }
    let (w, h) = image.dimensions();
    let mut out = GrayImage::new(w, h)?;
    for y in 0..h {
        for x in 0..w {
            let mut acc = f32::NEG_INFINITY;
            let mut seen = false;
            for &(dx, dy) in &offsets {
                if let Some(v) = image.get_signed(x as i64 + dx, y as i64 + dy) {
                    acc = acc.max(v);
                    seen = true;
                }
            }
            out.set_pixel_unchecked(x, y, if seen { acc } else { image.get_pixel_unchecked(x, y) });
        }
    }
    Ok(out)
}

/// Dilate a grayscale image with a `hsize x vsize` brick
///
/// Dilation expands bright regions; with ink stored as 1.0 it thickens
/// strokes.
pub fn dilate_gray(image: &GrayImage, hsize: u32, vsize: u32) -> MorphResult<GrayImage> {
    dilate_gray_sel(image, &Sel::create_brick(hsize, vsize)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dilate_dot() {
        let mut img = GrayImage::new(5, 5).unwrap();
        img.set_pixel(2, 2, 1.0).unwrap();
        let out = dilate_gray(&img, 3, 3).unwrap();
        assert_eq!(out.count_above(0.5), 9);
        assert_eq!(out.get_pixel(1, 1).unwrap(), 1.0);
        assert_eq!(out.get_pixel(0, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_dilate_at_border() {
        let mut img = GrayImage::new(3, 3).unwrap();
        img.set_pixel(0, 0, 0.7).unwrap();
        let out = dilate_gray(&img, 3, 3).unwrap();
        assert_eq!(out.get_pixel(1, 1).unwrap(), 0.7);
        assert_eq!(out.get_pixel(2, 2).unwrap(), 0.0);
    }

    #[test]
    fn test_brick_dilation_of_bar() {
        let mut img = GrayImage::new(5, 3).unwrap();
        img.set_pixel(2, 1, 1.0).unwrap();
        let out = dilate_gray_sel(&img, &Sel::create_brick(3, 1).unwrap()).unwrap();
        assert_eq!(out.count_above(0.5), 3);
        assert_eq!(out.get_pixel(1, 1).unwrap(), 1.0);
        assert_eq!(out.get_pixel(2, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_empty_sel_rejected() {
        let img = GrayImage::new(2, 2).unwrap();
        assert!(dilate_gray_sel(&img, &Sel::new(3, 3).unwrap()).is_err());
    }
}
