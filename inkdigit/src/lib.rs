//! inkdigit - handwritten digit recognition for Rust
//!
//! # Overview
//!
//! Strokes captured on a drawing surface (or the ink of a binary raster)
//! are grouped into characters, each character is normalized to a 28x28
//! canonical image and classified, and the per-character predictions are
//! joined into a left-to-right digit string.
//!
//! - Character segmentation with union-find and connectivity heuristics
//! - Image normalization (smoothing, dilation, bilinear resize, centering)
//! - An embedded two-layer perceptron or any external model backend
//! - Softmax confidence, low-confidence flags and aggregation
//! - Debounced recognition on a background worker
//! - PNG / PGM diagnostic images and JSON weight files
//!
//! # Example
//!
//! ```
//! use inkdigit::{Stroke, recog::{ModelSlot, Recognizer, RecognizerConfig}};
//!
//! let bar = Stroke::from_xyt(&[(50.0, 20.0, 0), (50.0, 40.0, 16), (50.0, 60.0, 32)]).unwrap();
//!
//! let recognizer = Recognizer::with_perceptron(RecognizerConfig::default(), ModelSlot::empty()).unwrap();
//! let result = recognizer.recognize_strokes(vec![bar], 400.0).unwrap();
//! // no weights loaded: the group is reported, but without a digit
//! assert_eq!(result.per_group.len(), 1);
//! assert_eq!(result.per_group[0].predicted_digit, -1);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use inkdigit_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use inkdigit_filter as filter;
pub use inkdigit_io as io;
pub use inkdigit_morph as morph;
pub use inkdigit_recog as recog;
pub use inkdigit_region as region;
pub use inkdigit_transform as transform;
