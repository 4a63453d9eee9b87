//! Perceptron weight files
//!
//! Weights are dense matrices serialized as nested JSON arrays, either one
//! matrix per file (`theta1.json`, `theta2.json`) or both in a single
//! document `{"theta1": [[...]], "theta2": [[...]]}`. This module only
//! parses; shape validation belongs to the classifier that consumes them.

use crate::IoResult;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A dense row-major matrix as stored on disk
pub type Matrix = Vec<Vec<f32>>;

/// Both perceptron layers in one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightDocument {
    pub theta1: Matrix,
    pub theta2: Matrix,
}

/// Parse one matrix from a reader
pub fn read_matrix<R: Read>(reader: R) -> IoResult<Matrix> {
    Ok(serde_json::from_reader(reader)?)
}

/// Parse one matrix from a JSON file
pub fn read_matrix_file<P: AsRef<Path>>(path: P) -> IoResult<Matrix> {
    let file = File::open(path)?;
    read_matrix(BufReader::new(file))
}

/// Parse a combined weight document from a reader
pub fn read_weight_document<R: Read>(reader: R) -> IoResult<WeightDocument> {
    Ok(serde_json::from_reader(reader)?)
}

/// Parse a combined weight document from a JSON file
pub fn read_weight_document_file<P: AsRef<Path>>(path: P) -> IoResult<WeightDocument> {
    let file = File::open(path)?;
    read_weight_document(BufReader::new(file))
}

/// Serialize a combined weight document
pub fn write_weight_document<W: std::io::Write>(doc: &WeightDocument, writer: W) -> IoResult<()> {
    serde_json::to_writer(writer, doc)?;
    Ok(())
}
