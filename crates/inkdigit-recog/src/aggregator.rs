//! Result aggregation
//!
//! Orders per-group results left to right and folds them into the text
//! and summary statistics of an [`AggregateResult`].

use crate::result::{AggregateResult, RecognitionResult};

/// Combine per-group results
///
/// Results are stably sorted by the left edge of their group. Groups that
/// produced no digit count towards `failed_count` only.
pub fn aggregate(mut results: Vec<RecognitionResult>) -> AggregateResult {
    results.sort_by(|a, b| a.bounds.min_x.total_cmp(&b.bounds.min_x));

    let mut text = String::new();
    let mut confidence_sum = 0.0;
    let mut recognized = 0usize;
    let mut low_confidence_count = 0;
    let mut failed_count = 0;
    for r in &results {
        match r.digit() {
            Some(d) => {
                text.push(char::from(b'0' + d));
                confidence_sum += r.confidence;
                recognized += 1;
                if r.is_low_confidence {
                    low_confidence_count += 1;
                }
            }
            None => failed_count += 1,
        }
    }

    AggregateResult {
        text,
        average_confidence: if recognized > 0 {
            confidence_sum / recognized as f64
        } else {
            0.0
        },
        low_confidence_count,
        failed_count,
        per_group: results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confidence::Prediction;
    use crate::result::FailureKind;
    use inkdigit_core::BoundingBox;

    fn bounds(min_x: f64) -> BoundingBox {
        BoundingBox::new(min_x, min_x + 10.0, 0.0, 20.0).unwrap()
    }

    fn ok(index: usize, min_x: f64, digit: u8, confidence: f64) -> RecognitionResult {
        let mut probabilities = [0.0; 10];
        probabilities[digit as usize] = confidence;
        RecognitionResult::predicted(
            index,
            bounds(min_x),
            Prediction {
                digit,
                confidence,
                probabilities,
                is_low_confidence: confidence < 0.7,
            },
        )
    }

    #[test]
    fn test_empty() {
        let agg = aggregate(Vec::new());
        assert_eq!(agg.text, "");
        assert_eq!(agg.average_confidence, 0.0);
        assert!(agg.is_empty());
    }

    #[test]
    fn test_sorted_text_and_average() {
        let agg = aggregate(vec![ok(0, 120.0, 3, 0.9), ok(1, 20.0, 4, 0.5)]);
        assert_eq!(agg.text, "43");
        assert!((agg.average_confidence - 0.7).abs() < 1e-12);
        assert_eq!(agg.low_confidence_count, 1);
        assert_eq!(agg.per_group[0].group_index, 1);
    }

    #[test]
    fn test_failures_excluded() {
        let failed = RecognitionResult::failed(1, bounds(50.0), FailureKind::ModelNotReady);
        let agg = aggregate(vec![ok(0, 0.0, 1, 0.8), failed, ok(2, 90.0, 2, 0.6)]);
        assert_eq!(agg.text, "12");
        assert_eq!(agg.failed_count, 1);
        assert_eq!(agg.low_confidence_count, 1);
        assert!((agg.average_confidence - 0.7).abs() < 1e-12);
        assert_eq!(agg.per_group.len(), 3);
        assert_eq!(agg.per_group[1].predicted_digit, -1);
    }

    #[test]
    fn test_all_failed() {
        let agg = aggregate(vec![
            RecognitionResult::failed(0, bounds(0.0), FailureKind::InferenceBackendFailure),
            RecognitionResult::failed(1, bounds(30.0), FailureKind::InferenceBackendFailure),
        ]);
        assert_eq!(agg.text, "");
        assert_eq!(agg.average_confidence, 0.0);
        assert_eq!(agg.failed_count, 2);
        assert!(agg.per_group.iter().all(|r| r.is_low_confidence));
    }

    #[test]
    fn test_equal_left_edges_keep_order() {
        let agg = aggregate(vec![ok(0, 10.0, 5, 0.9), ok(1, 10.0, 6, 0.9)]);
        assert_eq!(agg.text, "56");
    }
}
