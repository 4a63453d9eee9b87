//! Connected component analysis
//!
//! Labels foreground pixels of a [`BitGrid`] with 8-connectivity using the
//! [`DisjointSet`], then filters out specks that cannot be glyphs.

use crate::error::RegionResult;
use crate::union_find::DisjointSet;
use inkdigit_core::{BitGrid, PixelComponent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Thresholds for [`filter_noise_components`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseFilter {
    /// Minimum pixel count (default: 5)
    pub min_area: usize,
    /// Minimum discretized width and height (default: 3)
    pub min_side: u32,
    /// Maximum ratio of longer to shorter side (default: 20.0)
    pub max_elongation: f64,
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self {
            min_area: 5,
            min_side: 3,
            max_elongation: 20.0,
        }
    }
}

impl NoiseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum pixel count
    pub fn with_min_area(mut self, min_area: usize) -> Self {
        self.min_area = min_area;
        self
    }

    /// Set the minimum side length
    pub fn with_min_side(mut self, min_side: u32) -> Self {
        self.min_side = min_side;
        self
    }

    /// Set the maximum elongation
    pub fn with_max_elongation(mut self, max_elongation: f64) -> Self {
        self.max_elongation = max_elongation;
        self
    }

    /// Whether a component survives the filter
    pub fn keeps(&self, component: &PixelComponent) -> bool {
        if component.area() < self.min_area {
            return false;
        }
        let bbox = component.bounding_box();
        let (w, h) = (bbox.pixel_width(), bbox.pixel_height());
        if w < self.min_side || h < self.min_side {
            return false;
        }
        let elongation = w.max(h) as f64 / w.min(h).max(1) as f64;
        elongation <= self.max_elongation
    }
}

/// Find all 8-connected foreground components of a binary raster
///
/// Components are returned in raster order of their first (top-most,
/// then left-most) pixel; pixels within a component are in raster order.
pub fn find_pixel_components(grid: &BitGrid) -> RegionResult<Vec<PixelComponent>> {
    let width = grid.width() as usize;
    let height = grid.height() as usize;
    let mut ds = DisjointSet::new(width * height);

    for y in 0..height {
        for x in 0..width {
            if !grid.get(x as u32, y as u32) {
                continue;
            }
            let idx = y * width + x;
            // Previously visited neighbours: W, NW, N, NE
            if x > 0 && grid.get(x as u32 - 1, y as u32) {
                ds.union(idx, idx - 1)?;
            }
            if y > 0 {
                let up = idx - width;
                if x > 0 && grid.get(x as u32 - 1, y as u32 - 1) {
                    ds.union(idx, up - 1)?;
                }
                if grid.get(x as u32, y as u32 - 1) {
                    ds.union(idx, up)?;
                }
                if x + 1 < width && grid.get(x as u32 + 1, y as u32 - 1) {
                    ds.union(idx, up + 1)?;
                }
            }
        }
    }

    let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
    let mut pixel_sets: Vec<Vec<(u32, u32)>> = Vec::new();
    for y in 0..height {
        for x in 0..width {
            if !grid.get(x as u32, y as u32) {
                continue;
            }
            let root = ds.find(y * width + x)?;
            let slot = *slot_of_root.entry(root).or_insert_with(|| {
                pixel_sets.push(Vec::new());
                pixel_sets.len() - 1
            });
            pixel_sets[slot].push((x as u32, y as u32));
        }
    }

    let components = pixel_sets
        .into_iter()
        .map(PixelComponent::new)
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(count = components.len(), "labeled pixel components");
    Ok(components)
}

/// Drop components that are too small, too thin or too elongated
pub fn filter_noise_components(
    components: Vec<PixelComponent>,
    filter: &NoiseFilter,
) -> Vec<PixelComponent> {
    let before = components.len();
    let kept: Vec<PixelComponent> = components.into_iter().filter(|c| filter.keeps(c)).collect();
    if kept.len() != before {
        tracing::debug!(before, after = kept.len(), "removed noise components");
    }
    kept
}
