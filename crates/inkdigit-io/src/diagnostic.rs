//! 8-bit rendering of intensity images for debugging
//!
//! Canonical images hold standardized floats. [`DiagnosticImage`] maps a
//! value range onto dark ink on a white background and optionally upscales
//! with nearest-neighbour replication so a 28x28 glyph is easy to inspect.

use crate::error::{IoError, IoResult};
use inkdigit_core::{BitGrid, GrayImage};

/// Value range of a standardized canonical image (background, full ink)
pub const STANDARDIZED_RANGE: (f32, f32) = (-0.1307 / 0.3081, (1.0 - 0.1307) / 0.3081);

/// Value range of a plain intensity image
pub const UNIT_RANGE: (f32, f32) = (0.0, 1.0);

/// 8-bit grayscale image, `0` = black ink, `255` = white paper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl DiagnosticImage {
    /// Render an intensity image as dark ink
    ///
    /// # Arguments
    ///
    /// * `image` - Source intensities
    /// * `range` - `(background, ink)` values; values are clamped into it
    /// * `upscale` - Integer replication factor (must be > 0)
    ///
    /// # Errors
    ///
    /// Returns `IoError::InvalidData` if `upscale` is 0 or the range is empty.
    pub fn from_gray(image: &GrayImage, range: (f32, f32), upscale: u32) -> IoResult<Self> {
        let (lo, hi) = range;
        if upscale == 0 {
            return Err(IoError::InvalidData("upscale factor must be > 0".into()));
        }
        if lo.is_nan() || hi.is_nan() || hi <= lo {
            return Err(IoError::InvalidData(format!(
                "empty value range [{lo}, {hi}]"
            )));
        }
        let width = image.width() * upscale;
        let height = image.height() * upscale;
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            let row = image.row(y / upscale);
            for x in 0..width {
                let t = ((row[(x / upscale) as usize] - lo) / (hi - lo)).clamp(0.0, 1.0);
                pixels.push(255 - (t * 255.0).round() as u8);
            }
        }
        Ok(DiagnosticImage {
            width,
            height,
            pixels,
        })
    }

    /// Wrap raw 8-bit pixels
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are zero or the length mismatches.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> IoResult<Self> {
        if width == 0 || height == 0 {
            return Err(inkdigit_core::Error::InvalidDimension { width, height }.into());
        }
        if pixels.len() != (width as usize) * (height as usize) {
            return Err(IoError::InvalidData(format!(
                "pixel length {} doesn't match {}x{}",
                pixels.len(),
                width,
                height
            )));
        }
        Ok(DiagnosticImage {
            width,
            height,
            pixels,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Ink intensity in `[0, 1]` (white paper = 0)
    pub fn to_ink(&self) -> IoResult<GrayImage> {
        let data = self
            .pixels
            .iter()
            .map(|&p| (255 - p) as f32 / 255.0)
            .collect();
        Ok(GrayImage::from_data(self.width, self.height, data)?)
    }

    /// Binary ink mask: pixels darker than `threshold` are foreground
    pub fn to_bit_grid(&self, threshold: u8) -> IoResult<BitGrid> {
        let data = self.pixels.iter().map(|&p| p < threshold).collect();
        Ok(BitGrid::from_bools(self.width, self.height, data)?)
    }
}
