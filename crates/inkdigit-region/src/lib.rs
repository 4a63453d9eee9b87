//! inkdigit-region - grouping ink into characters
//!
//! This crate provides:
//!
//! - **Disjoint-set** - union-find with iterative path compression
//! - **Connected component analysis** - 8-connected labeling of a raster
//!   plus noise filtering
//! - **Connectivity scoring** - weighted geometric/temporal heuristics
//! - **Segmentation** - greedy fixed-point grouping into left-to-right
//!   character groups
//!
//! # Examples
//!
//! ```
//! use inkdigit_core::Stroke;
//! use inkdigit_region::{SegmentationConfig, Segmenter};
//!
//! let bar = Stroke::from_xyt(&[(0.0, 0.0, 0), (20.0, 0.0, 16), (40.0, 0.0, 32)]).unwrap();
//! let stem = Stroke::from_xyt(&[(40.0, 0.0, 300), (27.5, 30.0, 316), (15.0, 60.0, 332)]).unwrap();
//!
//! let segmenter = Segmenter::new(SegmentationConfig::default()).unwrap();
//! let groups = segmenter.segment_strokes(vec![bar, stem], 400.0).unwrap();
//! assert_eq!(groups.len(), 1);
//! ```

pub mod conncomp;
pub mod error;
pub mod scorer;
pub mod segmenter;
pub mod union_find;

// Re-export core types
pub use inkdigit_core;

pub use conncomp::{NoiseFilter, filter_noise_components, find_pixel_components};
pub use error::{RegionError, RegionResult};
pub use scorer::{ConnectivityScorer, ScoreBreakdown, ScoringConfig, ScoringWeights};
pub use segmenter::{CharacterGroup, SegmentationConfig, Segmenter};
pub use union_find::DisjointSet;
