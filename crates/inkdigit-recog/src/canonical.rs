//! Canonical classifier input
//!
//! A fixed-size `f32` raster with ink as high intensity, standardized with
//! the MNIST mean and standard deviation.

use crate::{RecogError, RecogResult};
use inkdigit_core::GrayImage;
use inkdigit_io::{DiagnosticImage, IoResult};

/// Side of the canonical image (default: 28)
pub const CANONICAL_SIZE: u32 = 28;

/// Mean used to standardize intensities
pub const MNIST_MEAN: f32 = 0.1307;

/// Standard deviation used to standardize intensities
pub const MNIST_STD: f32 = 0.3081;

/// Number of digit classes
pub const NUM_CLASSES: usize = 10;

/// A normalized, standardized character image
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalImage {
    image: GrayImage,
    mean: f32,
    std: f32,
}

impl CanonicalImage {
    /// Wrap an already standardized image
    pub fn new(image: GrayImage, mean: f32, std: f32) -> RecogResult<Self> {
        if !(std.is_finite() && std > 0.0) || !mean.is_finite() {
            return Err(RecogError::InvalidParameter(format!(
                "standardization needs finite mean and positive std, got {mean} / {std}"
            )));
        }
        Ok(Self { image, mean, std })
    }

    /// Standardize a `[0, 1]` intensity image in place and wrap it
    pub fn standardize(mut image: GrayImage, mean: f32, std: f32) -> RecogResult<Self> {
        if !(std.is_finite() && std > 0.0) || !mean.is_finite() {
            return Err(RecogError::InvalidParameter(format!(
                "standardization needs finite mean and positive std, got {mean} / {std}"
            )));
        }
        for v in image.data_mut() {
            *v = (*v - mean) / std;
        }
        Ok(Self { image, mean, std })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Standardized values in row-major order
    pub fn data(&self) -> &[f32] {
        self.image.data()
    }

    /// The underlying raster
    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    pub fn mean(&self) -> f32 {
        self.mean
    }

    pub fn std(&self) -> f32 {
        self.std
    }

    /// Undo the standardization, giving `[0, 1]` intensities
    pub fn to_intensity(&self) -> Vec<f32> {
        self.image
            .data()
            .iter()
            .map(|v| v * self.std + self.mean)
            .collect()
    }

    /// Render as dark ink on white, each pixel upscaled to a
    /// `upscale x upscale` block
    pub fn to_diagnostic(&self, upscale: u32) -> IoResult<DiagnosticImage> {
        let lo = -self.mean / self.std;
        let hi = (1.0 - self.mean) / self.std;
        DiagnosticImage::from_gray(&self.image, (lo, hi), upscale)
    }
}
