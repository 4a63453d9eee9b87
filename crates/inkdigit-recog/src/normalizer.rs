//! Image normalization
//!
//! Turns a [`CharacterGroup`] into a [`CanonicalImage`]:
//!
//! 1. Render the members onto a canvas covering the group's bounding box
//!    (ink 1.0, background 0.0)
//! 2. Small canvases are smoothed, binarized at a low threshold and
//!    dilated once; larger ones are binarized at 0.5
//! 3. Resize so the longer side fits the inner box, preserving aspect
//! 4. Centre on the canonical canvas and standardize
//!
//! Degenerate geometry (a non-finite or oversized box, or nothing drawn)
//! is replaced by a single ink pixel and flagged on the outcome.

use crate::canonical::{CANONICAL_SIZE, CanonicalImage, MNIST_MEAN, MNIST_STD};
use crate::pool::BufferPool;
use crate::{RecogError, RecogResult};
use inkdigit_core::{BitGrid, BoundingBox, GrayImage, Shape};
use inkdigit_filter::{binarize_in_place, smooth};
use inkdigit_morph::dilate_gray;
use inkdigit_region::CharacterGroup;
use inkdigit_transform::{pad_centered, scale_to_fit};
use serde::{Deserialize, Serialize};

/// Options for [`ImageNormalizer`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    /// Square pen used to rasterize strokes (default: 2)
    pub pen_width: u32,
    /// Canvases with fewer pixels than this take the smoothing path
    /// (default: 400)
    pub small_object_area: u32,
    /// Binarization threshold after smoothing (default: 0.2)
    pub small_object_threshold: f32,
    /// Binarization threshold for larger canvases (default: 0.5)
    pub large_object_threshold: f32,
    /// Longer side after resizing (default: 20)
    pub inner_size: u32,
    /// Side of the canonical image (default: 28)
    pub canonical_size: u32,
    /// Standardization mean (default: 0.1307)
    pub mean: f32,
    /// Standardization standard deviation (default: 0.3081)
    pub std: f32,
    /// Largest canvas side rendered before the box counts as degenerate
    /// (default: 4096)
    pub max_canvas_side: u32,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            pen_width: 2,
            small_object_area: 400,
            small_object_threshold: 0.2,
            large_object_threshold: 0.5,
            inner_size: 20,
            canonical_size: CANONICAL_SIZE,
            mean: MNIST_MEAN,
            std: MNIST_STD,
            max_canvas_side: 4096,
        }
    }
}

impl NormalizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stroke pen width
    pub fn with_pen_width(mut self, pen_width: u32) -> Self {
        self.pen_width = pen_width;
        self
    }

    /// Set the inner and canonical sizes
    pub fn with_sizes(mut self, inner_size: u32, canonical_size: u32) -> Self {
        self.inner_size = inner_size;
        self.canonical_size = canonical_size;
        self
    }

    /// Set the standardization constants
    pub fn with_standardization(mut self, mean: f32, std: f32) -> Self {
        self.mean = mean;
        self.std = std;
        self
    }

    /// Check that every option is in range
    pub fn validate(&self) -> RecogResult<()> {
        if self.pen_width == 0 {
            return Err(RecogError::InvalidConfig("pen_width must be > 0".into()));
        }
        if self.inner_size == 0 || self.inner_size > self.canonical_size {
            return Err(RecogError::InvalidConfig(format!(
                "inner_size must be in 1..={}, got {}",
                self.canonical_size, self.inner_size
            )));
        }
        if self.max_canvas_side == 0 {
            return Err(RecogError::InvalidConfig(
                "max_canvas_side must be > 0".into(),
            ));
        }
        for (name, t) in [
            ("small_object_threshold", self.small_object_threshold),
            ("large_object_threshold", self.large_object_threshold),
        ] {
            if !(0.0..1.0).contains(&t) {
                return Err(RecogError::InvalidConfig(format!(
                    "{name} must be in [0, 1), got {t}"
                )));
            }
        }
        if !self.mean.is_finite() || !(self.std.is_finite() && self.std > 0.0) {
            return Err(RecogError::InvalidConfig(format!(
                "standardization needs finite mean and positive std, got {} / {}",
                self.mean, self.std
            )));
        }
        Ok(())
    }
}

/// A canonical image plus whether it came from degenerate geometry
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeOutcome {
    pub image: CanonicalImage,
    pub degenerate: bool,
}

/// Renders character groups into canonical images
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    options: NormalizeOptions,
    pool: BufferPool,
}

impl ImageNormalizer {
    /// Create a normalizer with its own scratch pool
    pub fn new(options: NormalizeOptions) -> RecogResult<Self> {
        Self::with_pool(options, BufferPool::default())
    }

    /// Create a normalizer that borrows scratch canvases from `pool`
    pub fn with_pool(options: NormalizeOptions, pool: BufferPool) -> RecogResult<Self> {
        options.validate()?;
        Ok(Self { options, pool })
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }

    /// Normalize one character group
    pub fn normalize<S: Shape>(&self, group: &CharacterGroup<S>) -> RecogResult<NormalizeOutcome> {
        self.normalize_shapes(group.members(), group.bounds())
    }

    /// Normalize shapes whose merged bounding box is `bounds`
    pub fn normalize_shapes<S: Shape>(
        &self,
        shapes: &[S],
        bounds: BoundingBox,
    ) -> RecogResult<NormalizeOutcome> {
        match self.render(shapes, &bounds)? {
            Some(canvas) => self.canonicalize(&canvas, false),
            None => {
                tracing::debug!(?bounds, "degenerate group geometry, using placeholder");
                self.placeholder()
            }
        }
    }

    /// The outcome used for degenerate groups: one ink pixel, normalized
    /// like any other canvas and flagged degenerate
    pub fn placeholder(&self) -> RecogResult<NormalizeOutcome> {
        let mut canvas = BitGrid::new(1, 1)?;
        canvas.set(0, 0, true)?;
        self.canonicalize(&canvas, true)
    }

    fn canonicalize(&self, canvas: &BitGrid, degenerate: bool) -> RecogResult<NormalizeOutcome> {
        let opts = &self.options;
        let (w, h) = (canvas.width(), canvas.height());
        let mut scratch = self.pool.acquire((w as usize) * (h as usize));
        for (dst, &on) in scratch.iter_mut().zip(canvas.data()) {
            *dst = if on { 1.0 } else { 0.0 };
        }
        let mut intensity = GrayImage::from_data(w, h, std::mem::take(&mut *scratch))?;

        let scaled = if u64::from(w) * u64::from(h) < u64::from(opts.small_object_area) {
            let mut smoothed = smooth(&intensity)?;
            binarize_in_place(&mut smoothed, opts.small_object_threshold)?;
            let thick = dilate_gray(&smoothed, 3, 3)?;
            scale_to_fit(&thick, opts.inner_size)?
        } else {
            binarize_in_place(&mut intensity, opts.large_object_threshold)?;
            scale_to_fit(&intensity, opts.inner_size)?
        };
        *scratch = intensity.into_data();

        let padded = pad_centered(&scaled, opts.canonical_size, opts.canonical_size, 0.0)?;
        let image = CanonicalImage::standardize(padded, opts.mean, opts.std)?;
        Ok(NormalizeOutcome { image, degenerate })
    }

    fn render<S: Shape>(&self, shapes: &[S], bounds: &BoundingBox) -> RecogResult<Option<BitGrid>> {
        if shapes.is_empty() || !bounds.is_finite() {
            return Ok(None);
        }
        let (extent_w, extent_h) = bounds.pixel_extent();
        let limit = f64::from(self.options.max_canvas_side);
        if extent_w > limit || extent_h > limit {
            return Ok(None);
        }
        let (w, h) = (bounds.pixel_width(), bounds.pixel_height());
        let origin_x = bounds.min_x.floor() as i64;
        let origin_y = bounds.min_y.floor() as i64;
        let mut canvas = BitGrid::new(w, h)?;
        for shape in shapes {
            shape.render(&mut canvas, origin_x, origin_y, self.options.pen_width);
        }
        if canvas.is_blank() {
            return Ok(None);
        }
        Ok(Some(canvas))
    }
}
