//! Error types for inkdigit-recog

use crate::result::FailureKind;
use thiserror::Error;

/// Errors that can occur during recognition operations
#[derive(Debug, Error)]
pub enum RecogError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] inkdigit_core::Error),

    /// Segmentation error
    #[error("region error: {0}")]
    Region(#[from] inkdigit_region::RegionError),

    /// Filter library error
    #[error("filter error: {0}")]
    Filter(#[from] inkdigit_filter::FilterError),

    /// Morphology library error
    #[error("morph error: {0}")]
    Morph(#[from] inkdigit_morph::MorphError),

    /// Transform library error
    #[error("transform error: {0}")]
    Transform(#[from] inkdigit_transform::TransformError),

    /// Weight or config file error
    #[error("io error: {0}")]
    Io(#[from] inkdigit_io::IoError),

    /// The classifier has no weights or backend yet
    #[error("model not ready")]
    ModelNotReady,

    /// A weight matrix does not have the expected shape
    #[error("weight shape mismatch in {layer}: expected {expected}, got {actual}")]
    WeightShapeMismatch {
        layer: &'static str,
        expected: String,
        actual: String,
    },

    /// A weight file does not exist
    #[error("missing weights: {0}")]
    MissingWeights(String),

    /// The external model failed or returned malformed output
    #[error("inference backend failure: {0}")]
    InferenceBackendFailure(String),

    /// A configuration value is out of range
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Invalid parameter provided
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl RecogError {
    /// The per-group failure this error maps to, if it is recoverable
    /// without aborting the pass
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            RecogError::ModelNotReady => Some(FailureKind::ModelNotReady),
            RecogError::InferenceBackendFailure(_) => Some(FailureKind::InferenceBackendFailure),
            _ => None,
        }
    }
}

/// Result type for recognition operations
pub type RecogResult<T> = Result<T, RecogError>;
