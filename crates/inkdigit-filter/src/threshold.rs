//! Binarization
//!
//! Maps intensities strictly above a threshold to 1.0 and everything else
//! to 0.0.

use crate::{FilterError, FilterResult};
use inkdigit_core::GrayImage;

fn check_threshold(threshold: f32) -> FilterResult<()> {
    if !threshold.is_finite() {
        return Err(FilterError::InvalidParameters(format!(
            "threshold must be finite, got {threshold}"
        )));
    }
    Ok(())
}

/// Binarize an image in place
pub fn binarize_in_place(image: &mut GrayImage, threshold: f32) -> FilterResult<()> {
    check_threshold(threshold)?;
    for v in image.data_mut() {
        *v = if *v > threshold { 1.0 } else { 0.0 };
    }
    Ok(())
}
