//! PixelComponent - a connected set of foreground pixels

use crate::error::{Error, Result};
use crate::geometry::BoundingBox;

/// A maximal 8-connected set of foreground pixels
///
/// The bounding box spans pixel coordinates, so a single pixel has a
/// continuous width of 0 and a [`BoundingBox::pixel_width`] of 1.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelComponent {
    pixels: Vec<(u32, u32)>,
    bbox: BoundingBox,
}

impl PixelComponent {
    /// Create a component from its pixel coordinates
    ///
    /// # Errors
    ///
    /// Returns `Error::NullInput` if `pixels` is empty.
    pub fn new(pixels: Vec<(u32, u32)>) -> Result<Self> {
        let (&(x0, y0), rest) = pixels
            .split_first()
            .ok_or(Error::NullInput("component pixels"))?;
        let mut bbox = BoundingBox::from_point(x0 as f64, y0 as f64);
        for &(x, y) in rest {
            bbox.include(x as f64, y as f64);
        }
        Ok(PixelComponent { pixels, bbox })
    }

    #[inline]
    pub fn pixels(&self) -> &[(u32, u32)] {
        &self.pixels
    }

    /// Pixel count
    #[inline]
    pub fn area(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }
}
