//! Stroke - one pen-down to pen-up gesture
//!
//! A [`Stroke`] is an immutable, non-empty point sequence with its derived
//! geometry computed once at construction. [`StrokeBuilder`] accumulates
//! samples from the capture layer and finalizes strokes on pen-up.

use crate::error::{Error, Result};
use crate::geometry::{BoundingBox, Point};

/// An ordered, non-empty sequence of ink samples
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
    bbox: BoundingBox,
    length: f64,
}

impl Stroke {
    /// Create a stroke from its samples
    ///
    /// # Errors
    ///
    /// Returns `Error::NullInput` for an empty sequence and
    /// `Error::NonFiniteCoordinate` if any sample is NaN or infinite.
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if let Some(p) = points.iter().find(|p| !p.is_finite()) {
            return Err(Error::NonFiniteCoordinate { x: p.x, y: p.y });
        }
        let bbox = BoundingBox::from_points(&points).ok_or(Error::NullInput("stroke points"))?;
        let length = points.windows(2).map(|w| w[0].distance(&w[1])).sum();
        Ok(Stroke {
            points,
            bbox,
            length,
        })
    }

    /// Create a stroke from `(x, y, timestamp)` triples
    pub fn from_xyt(samples: &[(f64, f64, u64)]) -> Result<Self> {
        Self::new(
            samples
                .iter()
                .map(|&(x, y, t)| Point::new(x, y, t))
                .collect(),
        )
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with `len`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    /// Total polyline length
    #[inline]
    pub fn path_length(&self) -> f64 {
        self.length
    }

    /// Centre of the bounding box
    pub fn centroid(&self) -> (f64, f64) {
        (self.bbox.center_x(), self.bbox.center_y())
    }

    /// First sample
    #[inline]
    pub fn start(&self) -> Point {
        self.points[0]
    }

    /// Last sample
    #[inline]
    pub fn end(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    #[inline]
    pub fn start_time(&self) -> u64 {
        self.start().timestamp
    }

    /// Milliseconds between the first and last sample
    pub fn duration(&self) -> u64 {
        self.end().timestamp.saturating_sub(self.start().timestamp)
    }

    /// Unit vector from start to end, or `(0, 0)` for a closed stroke
    pub fn direction(&self) -> (f64, f64) {
        let (s, e) = (self.start(), self.end());
        let d = s.distance(&e);
        if d > 0.0 {
            ((e.x - s.x) / d, (e.y - s.y) / d)
        } else {
            (0.0, 0.0)
        }
    }
}

/// Accumulates pointer samples into strokes
///
/// # Examples
///
/// ```
/// use inkdigit_core::{Point, StrokeBuilder};
///
/// let mut builder = StrokeBuilder::new();
/// builder.pen_down(Point::new(0.0, 0.0, 0));
/// builder.pen_move(Point::new(5.0, 0.0, 16));
/// builder.pen_move(Point::new(10.0, 0.0, 32));
/// let stroke = builder.pen_up().unwrap().unwrap();
/// assert_eq!(stroke.path_length(), 10.0);
/// ```
#[derive(Debug, Default)]
pub struct StrokeBuilder {
    current: Option<Vec<Point>>,
}

impl StrokeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new stroke, discarding any unfinished one
    pub fn pen_down(&mut self, point: Point) {
        self.current = Some(vec![point]);
    }

    /// Append a sample to the active stroke; ignored when the pen is up
    pub fn pen_move(&mut self, point: Point) {
        if let Some(points) = self.current.as_mut() {
            points.push(point);
        }
    }

    /// Whether a stroke is in progress
    pub fn is_drawing(&self) -> bool {
        self.current.is_some()
    }

    /// Finish the active stroke
    ///
    /// Returns `Ok(None)` when no stroke was in progress.
    ///
    /// # Errors
    ///
    /// Returns an error if a recorded sample is not finite.
    pub fn pen_up(&mut self) -> Result<Option<Stroke>> {
        match self.current.take() {
            Some(points) => Stroke::new(points).map(Some),
            None => Ok(None),
        }
    }
}
