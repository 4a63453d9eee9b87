//! Image scaling operations
//!
//! Bilinear resampling maps destination pixel `x` to source coordinate
//! `x * src_w / dst_w` and clamps neighbours to the last row and column.

use crate::{TransformError, TransformResult};
use inkdigit_core::GrayImage;

/// Size that fits `width x height` inside a `max_size` square
///
/// The longer side becomes `max_size` and the shorter side is scaled by the
/// aspect ratio and rounded, with both sides at least 1.
///
/// # Errors
///
/// Returns `TransformError::InvalidParameters` if any argument is zero.
pub fn fit_size(width: u32, height: u32, max_size: u32) -> TransformResult<(u32, u32)> {
    if width == 0 || height == 0 || max_size == 0 {
        return Err(TransformError::InvalidParameters(format!(
            "cannot fit {width}x{height} into {max_size}"
        )));
    }
    let aspect = width as f64 / height as f64;
    let max = max_size as f64;
    let (w, h) = if aspect > 1.0 {
        (max, (max / aspect).round())
    } else {
        ((max * aspect).round(), max)
    };
    Ok(((w as u32).max(1), (h as u32).max(1)))
}

/// Scale an image to a specific size with bilinear interpolation
pub fn scale_to_size(image: &GrayImage, width: u32, height: u32) -> TransformResult<GrayImage> {
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidScaleFactor(format!(
            "target size must be positive, got {width}x{height}"
        )));
    }
    Ok(scale_linear(image, width, height)?)
}

/// Scale so the longer side becomes `max_size`, preserving aspect ratio
pub fn scale_to_fit(image: &GrayImage, max_size: u32) -> TransformResult<GrayImage> {
    let (w, h) = fit_size(image.width(), image.height(), max_size)?;
    scale_to_size(image, w, h)
}

fn scale_linear(image: &GrayImage, dst_w: u32, dst_h: u32) -> inkdigit_core::Result<GrayImage> {
    let (src_w, src_h) = image.dimensions();
    let x_ratio = src_w as f64 / dst_w as f64;
    let y_ratio = src_h as f64 / dst_h as f64;
    let mut out = GrayImage::new(dst_w, dst_h)?;
    for y in 0..dst_h {
        let src_y = y as f64 * y_ratio;
        let y1 = (src_y.floor() as u32).min(src_h - 1);
        let y2 = (y1 + 1).min(src_h - 1);
        let dy = (src_y - y1 as f64) as f32;
        for x in 0..dst_w {
            let src_x = x as f64 * x_ratio;
            let x1 = (src_x.floor() as u32).min(src_w - 1);
            let x2 = (x1 + 1).min(src_w - 1);
            let dx = (src_x - x1 as f64) as f32;

            let p1 = image.get_pixel_unchecked(x1, y1);
            let p2 = image.get_pixel_unchecked(x2, y1);
            let p3 = image.get_pixel_unchecked(x1, y2);
            let p4 = image.get_pixel_unchecked(x2, y2);

            let v = p1 * (1.0 - dx) * (1.0 - dy)
                + p2 * dx * (1.0 - dy)
                + p3 * (1.0 - dx) * dy
                + p4 * dx * dy;
            out.set_pixel_unchecked(x, y, v);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_size() {
        assert_eq!(fit_size(41, 61, 20).unwrap(), (13, 20));
        assert_eq!(fit_size(61, 41, 20).unwrap(), (20, 13));
        assert_eq!(fit_size(30, 30, 20).unwrap(), (20, 20));
        assert_eq!(fit_size(1, 100, 20).unwrap(), (1, 20));
        assert_eq!(fit_size(100, 1, 20).unwrap(), (20, 1));
        assert!(fit_size(0, 5, 20).is_err());
    }

    #[test]
    fn test_linear_constant_image() {
        let img = GrayImage::new_with_value(7, 5, 0.75).unwrap();
        let out = scale_to_size(&img, 20, 13).unwrap();
        assert_eq!(out.dimensions(), (20, 13));
        for v in out.data() {
            assert!((v - 0.75).abs() < 1e-6);
        }
    }

    #[test]
    fn test_linear_interpolates_ramp() {
        let img = GrayImage::from_data(2, 1, vec![0.0, 1.0]).unwrap();
        let out = scale_to_size(&img, 4, 1).unwrap();
        // source x = 0, 0.5, 1.0, 1.5 (last two clamp to the edge)
        assert_eq!(out.data(), &[0.0, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn test_scale_to_fit() {
        let img = GrayImage::new_with_value(41, 61, 1.0).unwrap();
        let out = scale_to_fit(&img, 20).unwrap();
        assert_eq!(out.dimensions(), (13, 20));
        assert!(scale_to_size(&img, 0, 3).is_err());
    }
}
