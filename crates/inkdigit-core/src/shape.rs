//! The [`Shape`] trait shared by strokes and pixel components
//!
//! Segmentation, scoring and rendering are written once against this
//! trait. Strokes carry endpoints and timing; pixel components do not, and
//! the scorer falls back accordingly.

use crate::component::PixelComponent;
use crate::geometry::{BoundingBox, Point};
use crate::grid::BitGrid;
use crate::stroke::Stroke;

/// A unit of ink that can be grouped into a character
pub trait Shape {
    /// Bounding box in canvas coordinates
    fn bounds(&self) -> BoundingBox;

    /// First and last sample, if the shape is an ordered path
    fn endpoints(&self) -> Option<(Point, Point)> {
        None
    }

    /// Capture time of the first sample, if known
    fn start_time(&self) -> Option<u64> {
        None
    }

    /// Pixel count, for raster shapes
    fn pixel_area(&self) -> Option<usize> {
        None
    }

    /// Rasterize onto `canvas`, whose top-left cell sits at canvas
    /// coordinate `(origin_x, origin_y)`. Cells outside the grid are
    /// clipped.
    fn render(&self, canvas: &mut BitGrid, origin_x: i64, origin_y: i64, pen_width: u32);
}

impl Shape for Stroke {
    fn bounds(&self) -> BoundingBox {
        self.bounding_box()
    }

    fn endpoints(&self) -> Option<(Point, Point)> {
        Some((self.start(), self.end()))
    }

    fn start_time(&self) -> Option<u64> {
        Some(Stroke::start_time(self))
    }

    fn render(&self, canvas: &mut BitGrid, origin_x: i64, origin_y: i64, pen_width: u32) {
        let to_cell = |p: &Point| (p.x.floor() as i64 - origin_x, p.y.floor() as i64 - origin_y);
        let points = self.points();
        let (x0, y0) = to_cell(&points[0]);
        canvas.stamp(x0, y0, pen_width);
        for pair in points.windows(2) {
            let (ax, ay) = to_cell(&pair[0]);
            let (bx, by) = to_cell(&pair[1]);
            canvas.draw_line(ax, ay, bx, by, pen_width);
        }
    }
}

impl Shape for PixelComponent {
    fn bounds(&self) -> BoundingBox {
        self.bounding_box()
    }

    fn pixel_area(&self) -> Option<usize> {
        Some(self.area())
    }

    fn render(&self, canvas: &mut BitGrid, origin_x: i64, origin_y: i64, _pen_width: u32) {
        for &(x, y) in self.pixels() {
            canvas.set_clipped(x as i64 - origin_x, y as i64 - origin_y);
        }
    }
}
