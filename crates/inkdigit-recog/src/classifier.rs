//! Classifier seam
//!
//! A [`DigitClassifier`] maps canonical images to ten raw class scores.
//! The pipeline is written against this trait; the embedded perceptron and
//! the external-model adapter are the two implementations.

use crate::canonical::{CanonicalImage, NUM_CLASSES};
use crate::RecogResult;

/// Raw per-class output, indexed by digit
pub type ClassScores = [f64; NUM_CLASSES];

/// A digit classifier over canonical images
pub trait DigitClassifier: Send + Sync {
    /// Score a single image
    fn infer(&self, image: &CanonicalImage) -> RecogResult<ClassScores>;

    /// Score several images; row `i` of the output belongs to `images[i]`
    fn infer_batch(&self, images: &[CanonicalImage]) -> RecogResult<Vec<ClassScores>> {
        images.iter().map(|image| self.infer(image)).collect()
    }

    /// Whether weights or the backend are loaded
    fn is_ready(&self) -> bool;
}

impl<C: DigitClassifier + ?Sized> DigitClassifier for Box<C> {
    fn infer(&self, image: &CanonicalImage) -> RecogResult<ClassScores> {
        (**self).infer(image)
    }

    fn infer_batch(&self, images: &[CanonicalImage]) -> RecogResult<Vec<ClassScores>> {
        (**self).infer_batch(images)
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}

impl<C: DigitClassifier + ?Sized> DigitClassifier for std::sync::Arc<C> {
    fn infer(&self, image: &CanonicalImage) -> RecogResult<ClassScores> {
        (**self).infer(image)
    }

    fn infer_batch(&self, images: &[CanonicalImage]) -> RecogResult<Vec<ClassScores>> {
        (**self).infer_batch(images)
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}
