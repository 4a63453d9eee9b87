//! Recognition results

use crate::canonical::{CanonicalImage, NUM_CLASSES};
use crate::confidence::Prediction;
use inkdigit_core::BoundingBox;
use serde::Serialize;

/// Why a group produced no digit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Weights or backend were not loaded yet
    ModelNotReady,
    /// The backend failed or returned malformed output
    InferenceBackendFailure,
}

/// Outcome for one character group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognitionResult {
    /// Position of the group in segmentation order
    pub group_index: usize,
    pub bounds: BoundingBox,
    /// 0-9, or -1 on failure
    pub predicted_digit: i8,
    pub confidence: f64,
    pub probabilities: [f64; NUM_CLASSES],
    pub is_low_confidence: bool,
    pub failure: Option<FailureKind>,
    /// Whether the group's geometry was replaced by a placeholder
    pub degenerate: bool,
    #[serde(skip)]
    pub diagnostic: Option<CanonicalImage>,
}

impl RecognitionResult {
    /// A successful prediction
    pub fn predicted(group_index: usize, bounds: BoundingBox, prediction: Prediction) -> Self {
        Self {
            group_index,
            bounds,
            predicted_digit: prediction.digit as i8,
            confidence: prediction.confidence,
            probabilities: prediction.probabilities,
            is_low_confidence: prediction.is_low_confidence,
            failure: None,
            degenerate: false,
            diagnostic: None,
        }
    }

    /// A failed group: digit -1, confidence 0, flagged low confidence
    pub fn failed(group_index: usize, bounds: BoundingBox, kind: FailureKind) -> Self {
        Self {
            group_index,
            bounds,
            predicted_digit: -1,
            confidence: 0.0,
            probabilities: [0.0; NUM_CLASSES],
            is_low_confidence: true,
            failure: Some(kind),
            degenerate: false,
            diagnostic: None,
        }
    }

    /// The digit, if one was predicted
    pub fn digit(&self) -> Option<u8> {
        if (0..=9).contains(&self.predicted_digit) {
            Some(self.predicted_digit as u8)
        } else {
            None
        }
    }
}

/// Outcome of one recognition pass
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AggregateResult {
    /// Recognized digits, left to right
    pub text: String,
    /// Mean confidence over recognized digits (0 when there are none)
    pub average_confidence: f64,
    /// Recognized digits below the confidence threshold
    pub low_confidence_count: usize,
    /// Groups that produced no digit
    pub failed_count: usize,
    pub per_group: Vec<RecognitionResult>,
}

impl AggregateResult {
    /// The result of a pass over no ink
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.per_group.is_empty()
    }
}
