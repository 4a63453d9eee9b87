//! I/O error types
//!
//! Format-specific modules map their underlying library errors into
//! `IoError` variants so that callers only need to handle one error type.

use thiserror::Error;

/// Error type for diagnostic image and weight-file I/O
#[derive(Error, Debug)]
pub enum IoError {
    /// Standard I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The format is not supported or not enabled via features
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The data is structurally invalid
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A format-specific decoder returned an error
    #[error("decode error: {0}")]
    DecodeError(String),

    /// A format-specific encoder returned an error
    #[error("encode error: {0}")]
    EncodeError(String),

    /// A weight file is not valid JSON of the expected layout
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An error from the core crate (e.g. zero-sized raster)
    #[error("core error: {0}")]
    Core(#[from] inkdigit_core::Error),
}

impl IoError {
    /// Whether this error means the file does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, IoError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Convenience alias for I/O results.
pub type IoResult<T> = Result<T, IoError>;
