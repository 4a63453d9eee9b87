//! BitGrid - binary raster
//!
//! A width x height grid of foreground/background cells. This is both the
//! raster input to the pipeline (a rendered bitmap of the drawing surface)
//! and the scratch canvas that character groups are rendered onto.

use crate::error::{Error, Result};

/// Binary raster, row-major, `true` = ink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitGrid {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

impl BitGrid {
    /// Create an all-background grid
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        Ok(BitGrid {
            width,
            height,
            data: vec![false; (width as usize) * (height as usize)],
        })
    }

    /// Create a grid from row-major booleans
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are zero or the data length does
    /// not equal `width * height`.
    pub fn from_bools(width: u32, height: u32, data: Vec<bool>) -> Result<Self> {
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
        Ok(BitGrid {
            width,
            height,
            data,
        })
    }

    /// Create a grid from RGBA bytes, marking pixels whose alpha exceeds
    /// `alpha_threshold` as foreground
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are zero or `rgba.len()` is not
    /// `4 * width * height`.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8], alpha_threshold: u8) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = (width as usize) * (height as usize) * 4;
        if rgba.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "rgba length {} doesn't match 4 * {}x{} = {}",
                rgba.len(),
                width,
                height,
                expected
            )));
        }
        let data = rgba
            .chunks_exact(4)
            .map(|px| px[3] > alpha_threshold)
            .collect();
        Ok(BitGrid {
            width,
            height,
            data,
        })
    }

    /// Create a grid from single-channel alpha bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are zero or the length mismatches.
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8], alpha_threshold: u8) -> Result<Self> {
        let data = alpha.iter().map(|&a| a > alpha_threshold).collect();
        Self::from_bools(width, height, data)
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
    pub fn data(&self) -> &[bool] {
        &self.data
    }

    /// Whether (x, y) is foreground; out-of-range reads are background
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.data[self.index(x, y)]
    }

    /// Set a cell
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if coordinates are out of range.
    pub fn set(&mut self, x: u32, y: u32, value: bool) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: self.index(x, y),
                len: self.data.len(),
            });
        }
        let idx = self.index(x, y);
        self.data[idx] = value;
        Ok(())
    }

    /// Set a cell at signed coordinates, silently clipping to the grid
    #[inline]
    pub fn set_clipped(&mut self, x: i64, y: i64) {
        if x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64 {
            let idx = self.index(x as u32, y as u32);
            self.data[idx] = true;
        }
    }

    /// Stamp a square pen of side `pen_width` at (x, y), clipped to the grid
    ///
    /// The pen covers offsets `-(pen_width - 1) / 2 ..= pen_width / 2`.
    pub fn stamp(&mut self, x: i64, y: i64, pen_width: u32) {
        let pen = pen_width.max(1) as i64;
        let lo = -(pen - 1) / 2;
        let hi = pen / 2;
        for dy in lo..=hi {
            for dx in lo..=hi {
                self.set_clipped(x + dx, y + dy);
            }
        }
    }

    /// Draw a line segment with a square pen (Bresenham), clipped to the grid
    pub fn draw_line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, pen_width: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);
        loop {
            self.stamp(x, y, pen_width);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Number of foreground cells
    pub fn count_foreground(&self) -> usize {
        self.data.iter().filter(|&&b| b).count()
    }

    /// Whether the grid holds no ink at all
    pub fn is_blank(&self) -> bool {
        !self.data.iter().any(|&b| b)
    }

    /// Reset every cell to background
    pub fn clear(&mut self) {
        self.data.fill(false);
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_alpha_threshold() {
        let rgba = [0, 0, 0, 255, 0, 0, 0, 0, 0, 0, 0, 128, 0, 0, 0, 10];
        let grid = BitGrid::from_rgba(2, 2, &rgba, 127).unwrap();
        assert_eq!(grid.data(), &[true, false, true, false]);
        assert!(BitGrid::from_rgba(2, 2, &rgba[..12], 127).is_err());
    }

    #[test]
    fn test_out_of_range() {
        let mut grid = BitGrid::new(3, 3).unwrap();
        assert!(!grid.get(5, 5));
        assert!(grid.set(3, 0, true).is_err());
        grid.set_clipped(-1, 2);
        assert!(grid.is_blank());
    }

    #[test]
    fn test_draw_line_horizontal() {
        let mut grid = BitGrid::new(10, 5).unwrap();
        grid.draw_line(1, 2, 8, 2, 1);
        assert_eq!(grid.count_foreground(), 8);
        assert!(grid.get(1, 2) && grid.get(8, 2));
    }

    #[test]
    fn test_stamp_clipped_at_border() {
        let mut grid = BitGrid::new(4, 4).unwrap();
        grid.stamp(3, 3, 3);
        // Only the 2x2 corner of the 3x3 pen lands inside the grid
        assert_eq!(grid.count_foreground(), 4);
    }

    #[test]
    fn test_diagonal_line_is_connected() {
        let mut grid = BitGrid::new(6, 6).unwrap();
        grid.draw_line(0, 0, 5, 5, 1);
        for i in 0..6 {
            assert!(grid.get(i, i));
        }
    }
}
