//! Structuring Element (SEL) for morphological operations
//!
//! A structuring element defines the neighborhood used in morphological operations.

use crate::{MorphError, MorphResult};

/// Structuring Element (SEL)
///
/// A grid of hits around an origin `(cx, cy)`. Positions that are not hits
/// are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sel {
    width: u32,
    height: u32,
    cx: u32,
    cy: u32,
    hits: Vec<bool>,
}

impl Sel {
    /// Create a structuring element with no hits, origin at the centre
    pub fn new(width: u32, height: u32) -> MorphResult<Self> {
        if width == 0 || height == 0 {
            return Err(MorphError::InvalidSel(format!(
                "dimensions must be positive, got {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            cx: width / 2,
            cy: height / 2,
            hits: vec![false; (width * height) as usize],
        })
    }

    /// Create a rectangular "brick" structuring element with all hits
    pub fn create_brick(width: u32, height: u32) -> MorphResult<Self> {
        let mut sel = Self::new(width, height)?;
        sel.hits.fill(true);
        Ok(sel)
    }

    /// Get the width
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the origin
    pub fn origin(&self) -> (u32, u32) {
        (self.cx, self.cy)
    }

    /// Whether `(x, y)` is a hit
    pub fn is_hit(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.hits[(y * self.width + x) as usize]
    }

    /// Offsets of every hit relative to the origin
    pub fn hit_offsets(&self) -> Vec<(i64, i64)> {
        let mut offsets = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.is_hit(x, y) {
                    offsets.push((x as i64 - self.cx as i64, y as i64 - self.cy as i64));
                }
            }
        }
        offsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brick() {
        let sel = Sel::create_brick(3, 3).unwrap();
        assert_eq!(sel.origin(), (1, 1));
        assert_eq!(sel.hit_offsets().len(), 9);
        assert!(sel.hit_offsets().contains(&(-1, -1)));
        assert!(Sel::create_brick(0, 3).is_err());
    }
}
