//! External model adapter
//!
//! Any runtime that can evaluate a `(batch, 1, H, W) -> (batch, 10)` f32
//! graph plugs in through [`InferenceBackend`]. The adapter builds the input
//! tensor, checks the output shape and maps rows back to images by index.

use crate::canonical::{CanonicalImage, NUM_CLASSES};
use crate::classifier::{ClassScores, DigitClassifier};
use crate::{RecogError, RecogResult};

/// Error type returned by backends
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// A dense row-major f32 tensor
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl Tensor {
    /// Create a tensor, checking that `data` fills `shape`
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> RecogResult<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(RecogError::InvalidParameter(format!(
                "tensor of shape {shape:?} needs {expected} values, got {}",
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }
}

/// A neural-network runtime evaluating the digit model
pub trait InferenceBackend: Send + Sync {
    /// Evaluate the model on a `(batch, 1, H, W)` input
    fn run(&self, input: &Tensor) -> Result<Tensor, BackendError>;

    /// Whether the model session is loaded
    fn is_ready(&self) -> bool {
        true
    }
}

/// Adapts an [`InferenceBackend`] to [`DigitClassifier`]
#[derive(Debug, Clone)]
pub struct ExternalModelClassifier<B> {
    backend: B,
}

impl<B: InferenceBackend> ExternalModelClassifier<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn input_tensor(images: &[CanonicalImage]) -> RecogResult<Tensor> {
        let (w, h) = (images[0].width(), images[0].height());
        let mut data = Vec::with_capacity(images.len() * (w * h) as usize);
        for image in images {
            if (image.width(), image.height()) != (w, h) {
                return Err(RecogError::InvalidParameter(format!(
                    "batch mixes {}x{} and {w}x{h} images",
                    image.width(),
                    image.height()
                )));
            }
            data.extend_from_slice(image.data());
        }
        Tensor::new(vec![images.len(), 1, h as usize, w as usize], data)
    }
}

impl<B: InferenceBackend> DigitClassifier for ExternalModelClassifier<B> {
    fn infer(&self, image: &CanonicalImage) -> RecogResult<ClassScores> {
        let mut rows = self.infer_batch(std::slice::from_ref(image))?;
        rows.pop()
            .ok_or_else(|| RecogError::InferenceBackendFailure("empty output".into()))
    }

    fn infer_batch(&self, images: &[CanonicalImage]) -> RecogResult<Vec<ClassScores>> {
        if images.is_empty() {
            return Ok(Vec::new());
        }
        if !self.backend.is_ready() {
            return Err(RecogError::ModelNotReady);
        }
        let input = Self::input_tensor(images)?;
        let output = self
            .backend
            .run(&input)
            .map_err(|e| RecogError::InferenceBackendFailure(e.to_string()))?;
        if output.shape() != [images.len(), NUM_CLASSES] {
            return Err(RecogError::InferenceBackendFailure(format!(
                "expected output shape [{}, {NUM_CLASSES}], got {:?}",
                images.len(),
                output.shape()
            )));
        }
        Ok(output
            .data()
            .chunks_exact(NUM_CLASSES)
            .map(|row| {
                let mut scores = [0.0; NUM_CLASSES];
                for (s, &v) in scores.iter_mut().zip(row) {
                    *s = v as f64;
                }
                scores
            })
            .collect())
    }

    fn is_ready(&self) -> bool {
        self.backend.is_ready()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::{MNIST_MEAN, MNIST_STD};
    use inkdigit_core::GrayImage;
    use std::sync::Mutex;

    /// Scores each image by its first pixel in class `first_pixel as usize`
    struct EchoBackend {
        seen_shapes: Mutex<Vec<Vec<usize>>>,
    }

    impl InferenceBackend for EchoBackend {
        fn run(&self, input: &Tensor) -> Result<Tensor, BackendError> {
            self.seen_shapes.lock().unwrap().push(input.shape().to_vec());
            let batch = input.shape()[0];
            let per = input.data().len() / batch;
            let mut out = vec![0.0f32; batch * NUM_CLASSES];
            for b in 0..batch {
                let class = input.data()[b * per] as usize;
                out[b * NUM_CLASSES + class] = 1.0;
            }
            Ok(Tensor::new(vec![batch, NUM_CLASSES], out)?)
        }
    }

    struct FailingBackend;

    impl InferenceBackend for FailingBackend {
        fn run(&self, _input: &Tensor) -> Result<Tensor, BackendError> {
            Err("session crashed".into())
        }
    }

    struct WrongShapeBackend;

    impl InferenceBackend for WrongShapeBackend {
        fn run(&self, _input: &Tensor) -> Result<Tensor, BackendError> {
            Ok(Tensor::new(vec![1, 9], vec![0.0; 9])?)
        }
    }

    struct LoadingBackend;

    impl InferenceBackend for LoadingBackend {
        fn run(&self, _input: &Tensor) -> Result<Tensor, BackendError> {
            Err("not loaded".into())
        }

        fn is_ready(&self) -> bool {
            false
        }
    }

    fn image(first: f32) -> CanonicalImage {
        let mut img = GrayImage::new(28, 28).unwrap();
        img.set_pixel(0, 0, first).unwrap();
        CanonicalImage::new(img, MNIST_MEAN, MNIST_STD).unwrap()
    }

    #[test]
    fn test_batch_rows_map_back_by_index() {
        let clf = ExternalModelClassifier::new(EchoBackend {
            seen_shapes: Mutex::new(Vec::new()),
        });
        let rows = clf.infer_batch(&[image(3.0), image(7.0), image(0.0)]).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][3], 1.0);
        assert_eq!(rows[1][7], 1.0);
        assert_eq!(rows[2][0], 1.0);
        let shapes = clf.backend().seen_shapes.lock().unwrap();
        assert_eq!(shapes[0], vec![3, 1, 28, 28]);
    }

    #[test]
    fn test_single_infer() {
        let clf = ExternalModelClassifier::new(EchoBackend {
            seen_shapes: Mutex::new(Vec::new()),
        });
        assert_eq!(clf.infer(&image(5.0)).unwrap()[5], 1.0);
        assert!(clf.infer_batch(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_backend_failure() {
        let clf = ExternalModelClassifier::new(FailingBackend);
        let err = clf.infer(&image(1.0)).unwrap_err();
        assert!(matches!(err, RecogError::InferenceBackendFailure(ref m) if m.contains("crashed")));
        let clf = ExternalModelClassifier::new(WrongShapeBackend);
        assert!(matches!(
            clf.infer(&image(1.0)),
            Err(RecogError::InferenceBackendFailure(_))
        ));
    }

    #[test]
    fn test_not_ready_backend() {
        let clf = ExternalModelClassifier::new(LoadingBackend);
        assert!(!clf.is_ready());
        assert!(matches!(clf.infer(&image(1.0)), Err(RecogError::ModelNotReady)));
    }

    #[test]
    fn test_tensor_shape_checked() {
        assert!(Tensor::new(vec![2, 3], vec![0.0; 5]).is_err());
        let t = Tensor::new(vec![2, 3], vec![1.0; 6]).unwrap();
        assert_eq!(t.shape(), &[2, 3]);
        assert_eq!(t.into_data().len(), 6);
    }
}
