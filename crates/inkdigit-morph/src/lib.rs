//! inkdigit-morph - Morphological operations
//!
//! This crate provides:
//!
//! - Rectangular structuring elements
//! - Grayscale max dilation on [`inkdigit_core::GrayImage`]
//!
//! The recognizer uses a single 3x3 grayscale dilation to thicken small
//! glyphs before resizing.

mod error;
pub mod grayscale;
pub mod sel;

pub use error::{MorphError, MorphResult};
pub use sel::Sel;

pub use grayscale::{dilate_gray, dilate_gray_sel};
