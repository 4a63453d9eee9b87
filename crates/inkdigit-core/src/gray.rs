//! GrayImage - Floating-point intensity raster
//!
//! `GrayImage` is a 2D array of `f32` intensities. The recognition pipeline
//! keeps ink as foreground `1.0` on a `0.0` background from the moment a
//! group is rendered until the final standardization step.
//!
//! # Examples
//!
//! ```
//! use inkdigit_core::GrayImage;
//!
//! let mut img = GrayImage::new(28, 28).unwrap();
//! img.set_pixel(3, 4, 0.5).unwrap();
//! assert_eq!(img.get_pixel(3, 4).unwrap(), 0.5);
//! ```

use crate::error::{Error, Result};
use crate::grid::BitGrid;

/// Floating-point intensity image
///
/// # Memory Layout
///
/// Data is stored in row-major order with no padding. The pixel at (x, y)
/// is at index `y * width + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayImage {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl GrayImage {
    /// Create a new image with all pixels set to zero
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::new_with_value(width, height, 0.0)
    }

    /// Create a new image with all pixels set to `value`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new_with_value(width: u32, height: u32, value: f32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let size = (width as usize) * (height as usize);
        Ok(GrayImage {
            width,
            height,
            data: vec![value; size],
        })
    }

    /// Create an image from row-major data
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions are invalid or data length doesn't match.
    pub fn from_data(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = (width as usize) * (height as usize);
        if data.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "data length {} doesn't match {}x{} = {}",
                data.len(),
                width,
                height,
                expected
            )));
        }
        Ok(GrayImage {
            width,
            height,
            data,
        })
    }

    /// Convert a binary raster to intensities (foreground 1.0, background 0.0)
    pub fn from_bit_grid(grid: &BitGrid) -> Self {
        let data = grid
            .data()
            .iter()
            .map(|&on| if on { 1.0 } else { 0.0 })
            .collect();
        GrayImage {
            width: grid.width(),
            height: grid.height(),
            data,
        }
    }

    /// Get the image width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the image dimensions as (width, height)
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get the pixel value at (x, y)
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if coordinates are out of range.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<f32> {
        let idx = self.checked_index(x, y)?;
        Ok(self.data[idx])
    }

    /// Set the pixel value at (x, y)
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if coordinates are out of range.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, value: f32) -> Result<()> {
        let idx = self.checked_index(x, y)?;
        self.data[idx] = value;
        Ok(())
    }

    /// Get the pixel value at (x, y) without bounds checking
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> f32 {
        self.data[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Set the pixel value at (x, y) without bounds checking
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, value: f32) {
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        self.data[idx] = value;
    }

    /// Pixel value at signed coordinates, or `None` outside the image
    #[inline]
    pub fn get_signed(&self, x: i64, y: i64) -> Option<f32> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.get_pixel_unchecked(x as u32, y as u32))
    }

    /// Get raw access to the pixel data
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Get mutable access to the pixel data
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consume the image and return its pixel data
    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Get a row of pixel data
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[f32] {
        let start = (y as usize) * (self.width as usize);
        &self.data[start..start + self.width as usize]
    }

    /// Clear all pixels to zero
    pub fn clear(&mut self) {
        self.data.fill(0.0);
    }

    /// Sum of all pixel values
    pub fn sum(&self) -> f64 {
        self.data.iter().map(|&v| v as f64).sum()
    }

    /// Number of pixels strictly above `threshold`
    pub fn count_above(&self, threshold: f32) -> usize {
        self.data.iter().filter(|&&v| v > threshold).count()
    }

    /// Intensity-weighted centre of mass `(cx, cy)`
    ///
    /// Negative values are ignored. Returns `None` when the image carries
    /// no positive mass.
    pub fn center_of_mass(&self) -> Option<(f64, f64)> {
        let mut total = 0.0f64;
        let mut sx = 0.0f64;
        let mut sy = 0.0f64;
        for y in 0..self.height {
            for (x, &v) in self.row(y).iter().enumerate() {
                if v > 0.0 {
                    let w = v as f64;
                    total += w;
                    sx += w * x as f64;
                    sy += w * y as f64;
                }
            }
        }
        if total > 0.0 {
            Some((sx / total, sy / total))
        } else {
            None
        }
    }

    #[inline]
    fn checked_index(&self, x: u32, y: u32) -> Result<usize> {
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: idx,
                len: self.data.len(),
            });
        }
        Ok(idx)
    }
}
