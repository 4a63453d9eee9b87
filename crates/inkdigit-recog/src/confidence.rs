//! Confidence scoring
//!
//! Converts raw class scores to probabilities with a numerically stable
//! softmax and picks the first most probable digit.

use crate::canonical::NUM_CLASSES;
use crate::classifier::ClassScores;
use crate::{RecogError, RecogResult};

/// Default confidence below which a prediction is flagged
pub const DEFAULT_LOW_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Softmax over ten scores, shifted by the maximum before exponentiating
///
/// Returns `None` if any score is not finite.
pub fn softmax(scores: &ClassScores) -> Option<[f64; NUM_CLASSES]> {
    if scores.iter().any(|s| !s.is_finite()) {
        return None;
    }
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut probs = [0.0; NUM_CLASSES];
    let mut sum = 0.0;
    for (p, &s) in probs.iter_mut().zip(scores) {
        *p = (s - max).exp();
        sum += *p;
    }
    for p in &mut probs {
        *p /= sum;
    }
    Some(probs)
}

/// Index of the first maximum
pub fn argmax(values: &[f64; NUM_CLASSES]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// A scored prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub digit: u8,
    pub confidence: f64,
    pub probabilities: [f64; NUM_CLASSES],
    pub is_low_confidence: bool,
}

/// Turns class scores into predictions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceScorer {
    low_confidence_threshold: f64,
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self {
            low_confidence_threshold: DEFAULT_LOW_CONFIDENCE_THRESHOLD,
        }
    }
}

impl ConfidenceScorer {
    /// Create a scorer flagging predictions below `threshold`
    pub fn new(threshold: f64) -> RecogResult<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(RecogError::InvalidConfig(format!(
                "low confidence threshold must be in [0, 1], got {threshold}"
            )));
        }
        Ok(Self {
            low_confidence_threshold: threshold,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.low_confidence_threshold
    }

    /// Score one output row
    ///
    /// # Errors
    ///
    /// Non-finite scores are reported as an inference backend failure.
    pub fn evaluate(&self, scores: &ClassScores) -> RecogResult<Prediction> {
        let probabilities = softmax(scores).ok_or_else(|| {
            RecogError::InferenceBackendFailure(format!("non-finite class scores {scores:?}"))
        })?;
        let digit = argmax(&probabilities);
        let confidence = probabilities[digit];
        Ok(Prediction {
            digit: digit as u8,
            confidence,
            probabilities,
            is_low_confidence: confidence < self.low_confidence_threshold,
        })
    }
}
