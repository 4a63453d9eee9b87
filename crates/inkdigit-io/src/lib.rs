//! inkdigit-io - diagnostic image encoding and weight-file reading
//!
//! - [`DiagnosticImage`] renders float rasters as dark ink on white
//! - PNG (`png-format` feature) and binary PGM (`pnm` feature) codecs
//! - JSON weight matrices for the embedded perceptron

pub mod diagnostic;
pub mod error;
#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "pnm")]
pub mod pnm;
pub mod weights;

pub use diagnostic::{DiagnosticImage, STANDARDIZED_RANGE, UNIT_RANGE};
pub use error::{IoError, IoResult};
#[cfg(feature = "png-format")]
pub use self::png::{encode_png, read_png, write_png};
#[cfg(feature = "pnm")]
pub use self::pnm::{read_pgm, write_pgm};
pub use weights::{
    Matrix, WeightDocument, read_matrix, read_matrix_file, read_weight_document,
    read_weight_document_file, write_weight_document,
};

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Diagnostic image file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Pgm,
}

impl ImageFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Pgm => "pgm",
        }
    }

    /// Guess the format from a path's extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(ImageFormat::Png),
            "pgm" | "pnm" => Some(ImageFormat::Pgm),
            _ => None,
        }
    }
}

/// Write a diagnostic image to a file
pub fn write_image<P: AsRef<Path>>(
    image: &DiagnosticImage,
    path: P,
    format: ImageFormat,
) -> IoResult<()> {
    let writer = BufWriter::new(File::create(path)?);
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => self::png::write_png(image, writer),
        #[cfg(feature = "pnm")]
        ImageFormat::Pgm => pnm::write_pgm(image, writer),
        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(format!(
            "{other:?} support is not enabled"
        ))),
    }
}

/// Read a diagnostic image, choosing the codec by file extension
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<DiagnosticImage> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path).ok_or_else(|| {
        IoError::UnsupportedFormat(format!("unknown image extension: {}", path.display()))
    })?;
    let reader = BufReader::new(File::open(path)?);
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => self::png::read_png(reader),
        #[cfg(feature = "pnm")]
        ImageFormat::Pgm => pnm::read_pgm(reader),
        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(format!(
            "{other:?} support is not enabled"
        ))),
    }
}
