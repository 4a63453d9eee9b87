//! inkdigit-recog - digit recognition pipeline
//!
//! This crate provides:
//!
//! - **Image normalization** - character groups to 28x28 standardized images
//! - **Classification** - an embedded two-layer perceptron, or any external
//!   model behind [`InferenceBackend`]
//! - **Confidence scoring** - stable softmax and low-confidence flags
//! - **Aggregation** - left-to-right digit strings with summary statistics
//! - **Recognizer** - the full pass over strokes or a binary raster, plus a
//!   debounced background worker
//!
//! # Examples
//!
//! ```
//! use inkdigit_recog::{ModelSlot, Recognizer, RecognizerConfig};
//!
//! // weights not loaded yet: groups fail instead of the pass
//! let recognizer = Recognizer::with_perceptron(RecognizerConfig::default(), ModelSlot::empty()).unwrap();
//! let result = recognizer.recognize_strokes(Vec::new(), 400.0).unwrap();
//! assert_eq!(result.text, "");
//! ```

pub mod aggregator;
pub mod canonical;
pub mod classifier;
pub mod confidence;
pub mod config;
pub mod debounce;
mod error;
pub mod external;
pub mod model_slot;
pub mod normalizer;
pub mod perceptron;
pub mod pool;
pub mod recognizer;
pub mod result;

// Re-export core types
pub use inkdigit_core;

pub use aggregator::aggregate;
pub use canonical::{CANONICAL_SIZE, CanonicalImage, MNIST_MEAN, MNIST_STD, NUM_CLASSES};
pub use classifier::{ClassScores, DigitClassifier};
pub use confidence::{ConfidenceScorer, DEFAULT_LOW_CONFIDENCE_THRESHOLD, Prediction, argmax, softmax};
pub use config::RecognizerConfig;
pub use debounce::{
    DebounceConfig, DebounceScheduler, DebounceState, DebouncedWorker, InputOutcome,
    MAX_DEBOUNCE_DELAY_MS, RetriggerPolicy,
};
pub use error::{RecogError, RecogResult};
pub use external::{BackendError, ExternalModelClassifier, InferenceBackend, Tensor};
pub use model_slot::ModelSlot;
pub use normalizer::{ImageNormalizer, NormalizeOptions, NormalizeOutcome};
pub use perceptron::{InputEncoding, PerceptronClassifier, PerceptronWeights};
pub use pool::{BufferPool, DEFAULT_POOL_CAPACITY, PooledBuffer};
pub use recognizer::Recognizer;
pub use result::{AggregateResult, FailureKind, RecognitionResult};
