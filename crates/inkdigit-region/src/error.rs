//! Error types for inkdigit-region

use thiserror::Error;

/// Errors that can occur during grouping and component analysis
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] inkdigit_core::Error),

    /// Disjoint-set index outside `0..len`
    #[error("index out of range: {index} >= {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
