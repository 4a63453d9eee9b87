//! inkdigit-filter - Image filtering operations
//!
//! This crate provides:
//!
//! - Zero-padded convolution with small odd-sized kernels
//! - The 3x3 smoothing kernel applied to small glyphs
//! - Strict-threshold binarization

pub mod convolve;
mod error;
pub mod kernel;
pub mod threshold;

pub use error::{FilterError, FilterResult};
pub use kernel::Kernel;

// Re-export commonly used functions
pub use convolve::{convolve, smooth};
pub use threshold::binarize_in_place;
