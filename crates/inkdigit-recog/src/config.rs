//! Recognizer configuration
//!
//! Every stage's options in one typed document. Missing fields take their
//! defaults, so `{}` is a valid configuration:
//!
//! ```
//! use inkdigit_recog::RecognizerConfig;
//!
//! let config = RecognizerConfig::from_json_str(
//!     r#"{ "low_confidence_threshold": 0.8, "debounce": { "delay_ms": 300 } }"#,
//! ).unwrap();
//! assert_eq!(config.low_confidence_threshold, 0.8);
//! assert_eq!(config.normalize.inner_size, 20);
//! ```

use crate::confidence::DEFAULT_LOW_CONFIDENCE_THRESHOLD;
use crate::debounce::DebounceConfig;
use crate::normalizer::NormalizeOptions;
use crate::perceptron::InputEncoding;
use crate::pool::DEFAULT_POOL_CAPACITY;
use crate::{RecogError, RecogResult};
use inkdigit_io::IoError;
use inkdigit_region::SegmentationConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for [`Recognizer`](crate::Recognizer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Grouping and connectivity scoring
    pub segmentation: SegmentationConfig,
    /// Canonical image construction
    pub normalize: NormalizeOptions,
    /// Predictions below this confidence are flagged (default: 0.7)
    pub low_confidence_threshold: f64,
    /// Scratch buffers kept for reuse (default: 10)
    pub pool_capacity: usize,
    /// Attach each group's canonical image to its result (default: false)
    pub collect_diagnostics: bool,
    /// Pixel upscale for diagnostic images (default: 8)
    pub diagnostic_upscale: u32,
    /// Debounced recognition timing
    pub debounce: DebounceConfig,
    /// Input encoding expected by perceptron weights (default: standardized)
    pub encoding: InputEncoding,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            segmentation: SegmentationConfig::default(),
            normalize: NormalizeOptions::default(),
            low_confidence_threshold: DEFAULT_LOW_CONFIDENCE_THRESHOLD,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            collect_diagnostics: false,
            diagnostic_upscale: 8,
            debounce: DebounceConfig::default(),
            encoding: InputEncoding::default(),
        }
    }
}

impl RecognizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the segmentation options
    pub fn with_segmentation(mut self, segmentation: SegmentationConfig) -> Self {
        self.segmentation = segmentation;
        self
    }

    /// Set the normalization options
    pub fn with_normalize(mut self, normalize: NormalizeOptions) -> Self {
        self.normalize = normalize;
        self
    }

    /// Set the low-confidence threshold
    pub fn with_low_confidence_threshold(mut self, threshold: f64) -> Self {
        self.low_confidence_threshold = threshold;
        self
    }

    /// Set the scratch pool capacity
    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = capacity;
        self
    }

    /// Enable or disable diagnostic images
    pub fn with_diagnostics(mut self, collect: bool) -> Self {
        self.collect_diagnostics = collect;
        self
    }

    /// Set the debounce timing
    pub fn with_debounce(mut self, debounce: DebounceConfig) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the perceptron input encoding
    pub fn with_encoding(mut self, encoding: InputEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> RecogResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(IoError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> RecogResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(IoError::from)?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), "loaded recognizer config");
        Ok(config)
    }

    /// Check every section
    pub fn validate(&self) -> RecogResult<()> {
        self.segmentation.validate()?;
        self.normalize.validate()?;
        self.debounce.validate()?;
        if !(0.0..=1.0).contains(&self.low_confidence_threshold) {
            return Err(RecogError::InvalidConfig(format!(
                "low_confidence_threshold must be in [0, 1], got {}",
                self.low_confidence_threshold
            )));
        }
        if self.diagnostic_upscale == 0 {
            return Err(RecogError::InvalidConfig(
                "diagnostic_upscale must be > 0".into(),
            ));
        }
        Ok(())
    }
}
