//! Recognition pipeline
//!
//! One pass runs segmentation, normalization, classification, confidence
//! scoring and aggregation over a stroke snapshot or a binary raster.

use crate::aggregator::aggregate;
use crate::canonical::CanonicalImage;
use crate::classifier::{ClassScores, DigitClassifier};
use crate::confidence::ConfidenceScorer;
use crate::config::RecognizerConfig;
use crate::model_slot::ModelSlot;
use crate::normalizer::{ImageNormalizer, NormalizeOutcome};
use crate::perceptron::{PerceptronClassifier, PerceptronWeights};
use crate::pool::BufferPool;
use crate::result::{AggregateResult, RecognitionResult};
use crate::{RecogError, RecogResult};
use inkdigit_core::{BitGrid, Shape, Stroke};
use inkdigit_io::DiagnosticImage;
use inkdigit_region::{CharacterGroup, Segmenter};
use std::sync::Arc;

/// The stroke-to-digit pipeline
///
/// A recognizer is immutable once built and can be shared between threads.
#[derive(Clone)]
pub struct Recognizer {
    config: RecognizerConfig,
    segmenter: Segmenter,
    normalizer: ImageNormalizer,
    classifier: Arc<dyn DigitClassifier>,
    scorer: ConfidenceScorer,
}

impl std::fmt::Debug for Recognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recognizer")
            .field("config", &self.config)
            .field("classifier_ready", &self.classifier.is_ready())
            .finish()
    }
}

impl Recognizer {
    /// Build a pipeline around `classifier`
    ///
    /// # Errors
    ///
    /// Returns `RecogError::InvalidConfig` (or the stage's own error) if
    /// any section of `config` is out of range.
    pub fn new<C: DigitClassifier + 'static>(config: RecognizerConfig, classifier: C) -> RecogResult<Self> {
        Self::with_shared_classifier(config, Arc::new(classifier))
    }

    /// Build a pipeline around an already shared classifier
    pub fn with_shared_classifier(
        config: RecognizerConfig,
        classifier: Arc<dyn DigitClassifier>,
    ) -> RecogResult<Self> {
        config.validate()?;
        let segmenter = Segmenter::new(config.segmentation)?;
        let normalizer =
            ImageNormalizer::with_pool(config.normalize, BufferPool::new(config.pool_capacity))?;
        let scorer = ConfidenceScorer::new(config.low_confidence_threshold)?;
        Ok(Self {
            config,
            segmenter,
            normalizer,
            classifier,
            scorer,
        })
    }

    /// Build a pipeline around the embedded perceptron reading from `slot`
    ///
    /// The slot may still be empty; groups fail with `ModelNotReady` until
    /// it is filled.
    pub fn with_perceptron(
        config: RecognizerConfig,
        slot: ModelSlot<PerceptronWeights>,
    ) -> RecogResult<Self> {
        let classifier = PerceptronClassifier::new(slot).with_encoding(config.encoding);
        Self::new(config, classifier)
    }

    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    pub fn normalizer(&self) -> &ImageNormalizer {
        &self.normalizer
    }

    pub fn classifier(&self) -> &Arc<dyn DigitClassifier> {
        &self.classifier
    }

    /// Recognize a stroke snapshot from a canvas `canvas_width` pixels wide
    pub fn recognize_strokes(&self, strokes: Vec<Stroke>, canvas_width: f64) -> RecogResult<AggregateResult> {
        let groups = self.segmenter.segment_strokes(strokes, canvas_width)?;
        self.recognize_groups(&groups)
    }

    /// Recognize the ink of a binary raster
    pub fn recognize_raster(&self, grid: &BitGrid) -> RecogResult<AggregateResult> {
        let groups = self.segmenter.segment_grid(grid)?;
        self.recognize_groups(&groups)
    }

    /// Recognize pre-segmented groups
    ///
    /// A group that fails normalization is replaced by the degenerate
    /// placeholder. Groups the classifier cannot score (model not ready,
    /// backend failure) come back as failed results; other classifier
    /// errors abort the pass.
    pub fn recognize_groups<S: Shape>(&self, groups: &[CharacterGroup<S>]) -> RecogResult<AggregateResult> {
        self.recognize_with(groups, |group| self.normalizer.normalize(group))
    }

    fn recognize_with<S, F>(&self, groups: &[CharacterGroup<S>], normalize: F) -> RecogResult<AggregateResult>
    where
        S: Shape,
        F: Fn(&CharacterGroup<S>) -> RecogResult<NormalizeOutcome>,
    {
        if groups.is_empty() {
            tracing::debug!("no ink, empty result");
            return Ok(AggregateResult::empty());
        }

        let mut images = Vec::with_capacity(groups.len());
        let mut degenerate = Vec::with_capacity(groups.len());
        for (index, group) in groups.iter().enumerate() {
            let outcome = match normalize(group) {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(index, error = %e, "normalization failed, using placeholder");
                    self.normalizer.placeholder()?
                }
            };
            images.push(outcome.image);
            degenerate.push(outcome.degenerate);
        }

        let scores = self.classify(&images)?;

        let mut results = Vec::with_capacity(groups.len());
        for (index, ((group, image), row)) in groups.iter().zip(images).zip(scores).enumerate() {
            let bounds = group.bounds();
            let mut result = match row.and_then(|s| self.scorer.evaluate(&s)) {
                Ok(prediction) => {
                    tracing::debug!(
                        index,
                        digit = prediction.digit,
                        confidence = prediction.confidence,
                        "group recognized"
                    );
                    RecognitionResult::predicted(index, bounds, prediction)
                }
                Err(e) => match e.failure_kind() {
                    Some(kind) => {
                        tracing::warn!(index, error = %e, "group not recognized");
                        RecognitionResult::failed(index, bounds, kind)
                    }
                    None => return Err(e),
                },
            };
            result.degenerate = degenerate[index];
            if self.config.collect_diagnostics {
                result.diagnostic = Some(image);
            }
            results.push(result);
        }

        let agg = aggregate(results);
        tracing::info!(
            groups = agg.per_group.len(),
            text = %agg.text,
            average_confidence = agg.average_confidence,
            low_confidence = agg.low_confidence_count,
            failed = agg.failed_count,
            "recognition pass complete"
        );
        Ok(agg)
    }

    /// Encode the diagnostic images attached to `result`
    ///
    /// Returns `(group_index, image)` pairs in reading order; empty unless
    /// `collect_diagnostics` was enabled.
    pub fn diagnostic_images(&self, result: &AggregateResult) -> RecogResult<Vec<(usize, DiagnosticImage)>> {
        let mut out = Vec::new();
        for r in &result.per_group {
            if let Some(image) = &r.diagnostic {
                out.push((r.group_index, image.to_diagnostic(self.config.diagnostic_upscale)?));
            }
        }
        Ok(out)
    }

    /// Score every image, falling back to one call per image when the
    /// batch call fails
    fn classify(&self, images: &[CanonicalImage]) -> RecogResult<Vec<RecogResult<ClassScores>>> {
        match self.classifier.infer_batch(images) {
            Ok(rows) if rows.len() == images.len() => Ok(rows.into_iter().map(Ok).collect()),
            Ok(rows) => {
                tracing::warn!(
                    rows = rows.len(),
                    images = images.len(),
                    "batch inference returned the wrong row count, retrying per image"
                );
                Ok(images.iter().map(|image| self.classifier.infer(image)).collect())
            }
            Err(RecogError::ModelNotReady) => {
                Ok(images.iter().map(|_| Err(RecogError::ModelNotReady)).collect())
            }
            Err(e) if e.failure_kind().is_some() => {
                tracing::debug!(error = %e, "batch inference failed, retrying per image");
                Ok(images.iter().map(|image| self.classifier.infer(image)).collect())
            }
            Err(e) => Err(e),
        }
    }
}
