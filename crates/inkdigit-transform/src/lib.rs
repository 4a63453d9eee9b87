//! inkdigit-transform - Geometric transformations
//!
//! This crate provides:
//!
//! - Aspect-preserving size fitting
//! - Bilinear resampling
//! - Centered padding onto a fixed canvas

mod error;
pub mod pad;
pub mod scale;

pub use error::{TransformError, TransformResult};
pub use pad::{center_offset, pad_centered};
pub use scale::{fit_size, scale_to_fit, scale_to_size};
