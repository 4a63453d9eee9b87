//! Convolution operations
//!
//! Convolves a [`GrayImage`] with a [`Kernel`] centred on each pixel.

use crate::{FilterResult, Kernel};
use inkdigit_core::GrayImage;

/// Convolve a grayscale image with a kernel
///
/// The output has the same dimensions as the input. Pixels outside the
/// image contribute 0.
pub fn convolve(image: &GrayImage, kernel: &Kernel) -> FilterResult<GrayImage> {
    let w = image.width();
    let h = image.height();
    let kw = kernel.width();
    let kh = kernel.height();
    let kcx = kernel.center_x() as i64;
    let kcy = kernel.center_y() as i64;

    let mut out = GrayImage::new(w, h)?;

    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0f32;

            for ky in 0..kh {
                for kx in 0..kw {
                    let sx = x as i64 + (kx as i64 - kcx);
                    let sy = y as i64 + (ky as i64 - kcy);

                    let pixel = image.get_signed(sx, sy).unwrap_or(0.0);
                    let k = kernel.get(kx, ky).unwrap_or(0.0);
                    sum += pixel * k;
                }
            }

            out.set_pixel_unchecked(x, y, sum);
        }
    }

    Ok(out)
}

/// Apply the 3x3 smoothing kernel with zero padding
pub fn smooth(image: &GrayImage) -> FilterResult<GrayImage> {
    convolve(image, &Kernel::smoothing())
}
