//! Point and bounding-box geometry
//!
//! These types are the leaf dependency of every other inkdigit component.
//! Coordinates are canvas pixels with `x` growing to the right and `y`
//! growing downward.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// One sampled ink position
///
/// Immutable once recorded. `timestamp` is in milliseconds on whatever
/// monotonic clock the capture layer uses.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub timestamp: u64,
    pub pressure: f32,
}

impl Point {
    /// Create a point with full pressure
    pub const fn new(x: f64, y: f64, timestamp: u64) -> Self {
        Self {
            x,
            y,
            timestamp,
            pressure: 1.0,
        }
    }

    /// Create a point with an explicit pressure sample
    pub const fn with_pressure(x: f64, y: f64, timestamp: u64, pressure: f32) -> Self {
        Self {
            x,
            y,
            timestamp,
            pressure,
        }
    }

    /// Euclidean distance to another point (time is ignored)
    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        distance(self.x, self.y, other.x, other.y)
    }

    /// Whether both coordinates are finite
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Euclidean distance between two coordinate pairs
#[inline]
pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x1 - x2;
    let dy = y1 - y2;
    (dx * dx + dy * dy).sqrt()
}

/// Overlap fraction of two closed 1-D ranges
///
/// Returns `overlap / min(len1, len2)` when the ranges intersect over a
/// positive length, else 0. Touching or zero-length ranges give 0.
pub fn range_overlap_fraction(min1: f64, max1: f64, min2: f64, max2: f64) -> f64 {
    let start = min1.max(min2);
    let end = max1.min(max2);
    if start < end {
        let shorter = (max1 - min1).min(max2 - min2);
        if shorter > 0.0 {
            return (end - start) / shorter;
        }
    }
    0.0
}

/// Gap between two closed 1-D ranges (0 when they overlap or touch)
#[inline]
pub fn range_gap(min1: f64, max1: f64, min2: f64, max2: f64) -> f64 {
    (min1.max(min2) - max1.min(max2)).max(0.0)
}

/// An axis-aligned bounding box in canvas coordinates
///
/// Invariant: `min_x <= max_x` and `min_y <= max_y`. The continuous
/// width is `max_x - min_x`; use [`BoundingBox::pixel_width`] for the
/// discretized `max - min + 1` extent of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a bounding box
    ///
    /// # Errors
    ///
    /// Returns an error if a bound is not finite or min exceeds max.
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Result<Self> {
        for (x, y) in [(min_x, min_y), (max_x, max_y)] {
            if !x.is_finite() || !y.is_finite() {
                return Err(Error::NonFiniteCoordinate { x, y });
            }
        }
        if min_x > max_x || min_y > max_y {
            return Err(Error::InvalidParameter(format!(
                "inverted bounding box: x [{min_x}, {max_x}], y [{min_y}, {max_y}]"
            )));
        }
        Ok(Self {
            min_x,
            max_x,
            min_y,
            max_y,
        })
    }

    /// Degenerate box covering a single point
    pub const fn from_point(x: f64, y: f64) -> Self {
        Self {
            min_x: x,
            max_x: x,
            min_y: y,
            max_y: y,
        }
    }

    /// Smallest box containing every point
    ///
    /// Returns `None` for an empty iterator.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = Self::from_point(first.x, first.y);
        for p in iter {
            bbox.include(p.x, p.y);
        }
        Some(bbox)
    }

    /// Grow the box to contain `(x, y)`
    pub fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    /// Union (merged box) of two boxes
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Continuous width (`max_x - min_x`)
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Continuous height (`max_y - min_y`)
    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Larger of width and height
    #[inline]
    pub fn max_side(&self) -> f64 {
        self.width().max(self.height())
    }

    /// Centre x coordinate
    #[inline]
    pub fn center_x(&self) -> f64 {
        (self.min_x + self.max_x) / 2.0
    }

    /// Centre y coordinate
    #[inline]
    pub fn center_y(&self) -> f64 {
        (self.min_y + self.max_y) / 2.0
    }

    /// Width/height ratio of the box
    ///
    /// A box with zero height is infinitely wide; a box with zero extent
    /// in both directions is treated as square.
    pub fn aspect_ratio(&self) -> f64 {
        let w = self.width();
        let h = self.height();
        if h > 0.0 {
            w / h
        } else if w > 0.0 {
            f64::INFINITY
        } else {
            1.0
        }
    }

    /// Discretized `(width, height)` as floats, before any integer cast
    pub fn pixel_extent(&self) -> (f64, f64) {
        (
            pixel_span(self.min_x, self.max_x) + 1.0,
            pixel_span(self.min_y, self.max_y) + 1.0,
        )
    }

    /// Discretized width (`floor(max) - floor(min) + 1`), saturating at
    /// `u32::MAX`
    pub fn pixel_width(&self) -> u32 {
        (pixel_span(self.min_x, self.max_x) as u32).saturating_add(1)
    }

    /// Discretized height (`floor(max) - floor(min) + 1`), saturating at
    /// `u32::MAX`
    pub fn pixel_height(&self) -> u32 {
        (pixel_span(self.min_y, self.max_y) as u32).saturating_add(1)
    }

    /// Whether all four bounds are finite
    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.max_x.is_finite()
            && self.min_y.is_finite()
            && self.max_y.is_finite()
    }

    /// Horizontal gap to another box (0 when the x ranges overlap)
    #[inline]
    pub fn horizontal_gap(&self, other: &BoundingBox) -> f64 {
        range_gap(self.min_x, self.max_x, other.min_x, other.max_x)
    }

    /// Vertical gap to another box (0 when the y ranges overlap)
    #[inline]
    pub fn vertical_gap(&self, other: &BoundingBox) -> f64 {
        range_gap(self.min_y, self.max_y, other.min_y, other.max_y)
    }

    /// Box-to-box gap distance, `sqrt(hgap^2 + vgap^2)`
    pub fn gap_distance(&self, other: &BoundingBox) -> f64 {
        let h = self.horizontal_gap(other);
        let v = self.vertical_gap(other);
        (h * h + v * v).sqrt()
    }

    /// Overlap fraction of the x ranges
    #[inline]
    pub fn horizontal_overlap(&self, other: &BoundingBox) -> f64 {
        range_overlap_fraction(self.min_x, self.max_x, other.min_x, other.max_x)
    }

    /// Overlap fraction of the y ranges
    #[inline]
    pub fn vertical_overlap(&self, other: &BoundingBox) -> f64 {
        range_overlap_fraction(self.min_y, self.max_y, other.min_y, other.max_y)
    }

    /// Check if a point lies inside the closed box
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

fn pixel_span(lo: f64, hi: f64) -> f64 {
    (hi.floor() - lo.floor()).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Point::new(0.0, 0.0, 0);
        let b = Point::new(3.0, 4.0, 10);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(b.distance(&a), 5.0);
    }

    #[test]
    fn test_bbox_new_rejects_inverted() {
        assert!(BoundingBox::new(5.0, 1.0, 0.0, 1.0).is_err());
        assert!(BoundingBox::new(0.0, 1.0, f64::NAN, 1.0).is_err());
        assert!(BoundingBox::new(0.0, 1.0, 0.0, 1.0).is_ok());
    }

    #[test]
    fn test_bbox_union_and_extent() {
        let a = BoundingBox::new(0.0, 10.0, 0.0, 5.0).unwrap();
        let b = BoundingBox::new(20.0, 30.0, -5.0, 2.0).unwrap();
        let u = a.union(&b);
        assert_eq!((u.min_x, u.max_x, u.min_y, u.max_y), (0.0, 30.0, -5.0, 5.0));
        assert_eq!(u.width(), 30.0);
        assert_eq!(u.pixel_width(), 31);
        assert_eq!(u.pixel_height(), 11);
    }

    #[test]
    fn test_huge_box_pixel_size_saturates() {
        let b = BoundingBox::new(0.0, 5e9, 0.0, 1.0).unwrap();
        assert_eq!(b.pixel_width(), u32::MAX);
        assert_eq!(b.pixel_height(), 2);
        assert_eq!(b.pixel_extent(), (5e9 + 1.0, 2.0));
        let edge = BoundingBox::new(0.0, u32::MAX as f64, 0.0, 0.0).unwrap();
        assert_eq!(edge.pixel_width(), u32::MAX);
    }

    #[test]
    fn test_gap_distance() {
        let a = BoundingBox::new(0.0, 10.0, 0.0, 10.0).unwrap();
        let b = BoundingBox::new(13.0, 20.0, 14.0, 20.0).unwrap();
        assert_eq!(a.horizontal_gap(&b), 3.0);
        assert_eq!(a.vertical_gap(&b), 4.0);
        assert_eq!(a.gap_distance(&b), 5.0);
        let c = BoundingBox::new(5.0, 8.0, 5.0, 8.0).unwrap();
        assert_eq!(a.gap_distance(&c), 0.0);
    }

    #[test]
    fn test_range_overlap_fraction() {
        // [0,10] and [5,20]: overlap 5, shorter range 10
        assert_eq!(range_overlap_fraction(0.0, 10.0, 5.0, 20.0), 0.5);
        // Nested range overlaps fully
        assert_eq!(range_overlap_fraction(0.0, 10.0, 2.0, 4.0), 1.0);
        // Touching ranges do not overlap
        assert_eq!(range_overlap_fraction(0.0, 10.0, 10.0, 20.0), 0.0);
        // Zero-length range never overlaps
        assert_eq!(range_overlap_fraction(0.0, 10.0, 5.0, 5.0), 0.0);
    }

    #[test]
    fn test_aspect_ratio_degenerate() {
        assert_eq!(BoundingBox::from_point(1.0, 1.0).aspect_ratio(), 1.0);
        let flat = BoundingBox::new(0.0, 10.0, 3.0, 3.0).unwrap();
        assert!(flat.aspect_ratio().is_infinite());
        let tall = BoundingBox::new(0.0, 0.0, 0.0, 10.0).unwrap();
        assert_eq!(tall.aspect_ratio(), 0.0);
    }

    #[test]
    fn test_from_points() {
        let pts = [
            Point::new(3.0, 1.0, 0),
            Point::new(-1.0, 4.0, 1),
            Point::new(2.0, -2.0, 2),
        ];
        let b = BoundingBox::from_points(&pts).unwrap();
        assert_eq!((b.min_x, b.max_x, b.min_y, b.max_y), (-1.0, 3.0, -2.0, 4.0));
        assert!(BoundingBox::from_points(&[]).is_none());
    }
}
