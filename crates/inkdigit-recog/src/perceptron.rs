//! Embedded two-layer perceptron
//!
//! ```text
//! a1 = [1, x]                  (input_dim + 1)
//! h  = sigmoid(a1 * theta1)    (hidden_dim)
//! a2 = [1, h]                  (hidden_dim + 1)
//! y  = sigmoid(a2 * theta2)    (10)
//! ```
//!
//! `theta1` is `(input_dim + 1) x hidden_dim` and `theta2` is
//! `(hidden_dim + 1) x 10`, both row-major with the bias in row 0. The
//! reference model is 785 x 300 and 301 x 10.

use crate::canonical::{CanonicalImage, NUM_CLASSES};
use crate::classifier::{ClassScores, DigitClassifier};
use crate::model_slot::ModelSlot;
use crate::{RecogError, RecogResult};
use inkdigit_io::{IoError, Matrix};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How canonical pixels are fed to the first layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEncoding {
    /// Standardized values as produced by the normalizer
    #[default]
    Standardized,
    /// Standardization undone, giving `[0, 1]` intensities
    Intensity,
}

/// Validated perceptron weights, stored flat
#[derive(Debug, Clone, PartialEq)]
pub struct PerceptronWeights {
    input_dim: usize,
    hidden_dim: usize,
    theta1: Vec<f32>,
    theta2: Vec<f32>,
}

fn shape_error(layer: &'static str, expected: String, actual: String) -> RecogError {
    RecogError::WeightShapeMismatch {
        layer,
        expected,
        actual,
    }
}

fn flatten(layer: &'static str, matrix: &Matrix, rows: usize, cols: usize) -> RecogResult<Vec<f32>> {
    if matrix.len() != rows {
        return Err(shape_error(
            layer,
            format!("{rows} rows"),
            format!("{} rows", matrix.len()),
        ));
    }
    let mut flat = Vec::with_capacity(rows * cols);
    for (r, row) in matrix.iter().enumerate() {
        if row.len() != cols {
            return Err(shape_error(
                layer,
                format!("{cols} columns in row {r}"),
                format!("{} columns", row.len()),
            ));
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(RecogError::InvalidParameter(format!(
                "non-finite weight in {layer} row {r}"
            )));
        }
        flat.extend_from_slice(row);
    }
    Ok(flat)
}

fn missing_or(path: &Path, err: IoError) -> RecogError {
    if err.is_not_found() {
        RecogError::MissingWeights(path.display().to_string())
    } else {
        err.into()
    }
}

impl PerceptronWeights {
    /// Validate and flatten both weight matrices
    ///
    /// # Errors
    ///
    /// Returns `RecogError::WeightShapeMismatch` if either matrix does not
    /// match `input_dim`, a consistent hidden width, and 10 outputs.
    pub fn from_matrices(theta1: &Matrix, theta2: &Matrix, input_dim: usize) -> RecogResult<Self> {
        let hidden_dim = theta1.first().map_or(0, Vec::len);
        if hidden_dim == 0 {
            return Err(shape_error(
                "theta1",
                "at least one hidden unit".into(),
                "0 columns".into(),
            ));
        }
        let theta1 = flatten("theta1", theta1, input_dim + 1, hidden_dim)?;
        let theta2 = flatten("theta2", theta2, hidden_dim + 1, NUM_CLASSES)?;
        Ok(Self {
            input_dim,
            hidden_dim,
            theta1,
            theta2,
        })
    }

    /// Load a combined `{"theta1": .., "theta2": ..}` JSON document
    pub fn load_document<P: AsRef<Path>>(path: P, input_dim: usize) -> RecogResult<Self> {
        let path = path.as_ref();
        let doc = inkdigit_io::read_weight_document_file(path).map_err(|e| missing_or(path, e))?;
        Self::from_matrices(&doc.theta1, &doc.theta2, input_dim)
    }

    /// Load one JSON matrix file per layer
    pub fn load_pair<P: AsRef<Path>, Q: AsRef<Path>>(
        theta1_path: P,
        theta2_path: Q,
        input_dim: usize,
    ) -> RecogResult<Self> {
        let (p1, p2) = (theta1_path.as_ref(), theta2_path.as_ref());
        let theta1 = inkdigit_io::read_matrix_file(p1).map_err(|e| missing_or(p1, e))?;
        let theta2 = inkdigit_io::read_matrix_file(p2).map_err(|e| missing_or(p2, e))?;
        Self::from_matrices(&theta1, &theta2, input_dim)
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn hidden_dim(&self) -> usize {
        self.hidden_dim
    }

    /// Forward pass over one input vector
    pub fn forward(&self, input: impl ExactSizeIterator<Item = f32>) -> RecogResult<ClassScores> {
        if input.len() != self.input_dim {
            return Err(shape_error(
                "input",
                format!("{} values", self.input_dim),
                format!("{} values", input.len()),
            ));
        }
        let hidden = layer(input.map(f64::from), &self.theta1, self.hidden_dim);
        let output = layer(hidden.into_iter(), &self.theta2, NUM_CLASSES);
        let mut scores = [0.0; NUM_CLASSES];
        scores.copy_from_slice(&output);
        Ok(scores)
    }
}

/// `sigmoid([1, x] * theta)` for a row-major `(len(x) + 1) x cols` theta
fn layer(input: impl Iterator<Item = f64>, theta: &[f32], cols: usize) -> Vec<f64> {
    let mut acc: Vec<f64> = theta[..cols].iter().map(|&b| b as f64).collect();
    for (v, row) in input.zip(theta[cols..].chunks_exact(cols)) {
        for (a, &w) in acc.iter_mut().zip(row) {
            *a += v * w as f64;
        }
    }
    acc.into_iter().map(sigmoid).collect()
}

#[inline]
fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// The embedded perceptron as a [`DigitClassifier`]
#[derive(Debug, Clone)]
pub struct PerceptronClassifier {
    slot: ModelSlot<PerceptronWeights>,
    encoding: InputEncoding,
}

impl PerceptronClassifier {
    /// A classifier reading weights from `slot` whenever they arrive
    pub fn new(slot: ModelSlot<PerceptronWeights>) -> Self {
        Self {
            slot,
            encoding: InputEncoding::default(),
        }
    }

    /// A classifier with weights already loaded
    pub fn with_weights(weights: PerceptronWeights) -> Self {
        Self::new(ModelSlot::ready(weights))
    }

    /// Set the input encoding
    pub fn with_encoding(mut self, encoding: InputEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn slot(&self) -> &ModelSlot<PerceptronWeights> {
        &self.slot
    }

    pub fn encoding(&self) -> InputEncoding {
        self.encoding
    }
}

impl DigitClassifier for PerceptronClassifier {
    fn infer(&self, image: &CanonicalImage) -> RecogResult<ClassScores> {
        let weights = self.slot.require()?;
        match self.encoding {
            InputEncoding::Standardized => weights.forward(image.data().iter().copied()),
            InputEncoding::Intensity => {
                let (mean, std) = (image.mean(), image.std());
                weights.forward(image.data().iter().map(|v| v * std + mean))
            }
        }
    }

    fn is_ready(&self) -> bool {
        self.slot.is_ready()
    }
}
