//! Image processing backend trait.
//!
//! The [`ImageBackend`] trait covers the two pixel operations the pipeline
//! needs: decode a source fully into memory, and write one resized, encoded
//! derivative. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::params::DerivativeParams;
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Decode the whole image. Corrupt data must fail here, not later.
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Convert to RGB, resize to the exact box, encode and write a new file.
    fn write_derivative(
        &self,
        image: &DynamicImage,
        params: &DerivativeParams,
    ) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// Mock backend that records operations without touching pixels or disk.
    #[derive(Default)]
    pub struct MockBackend {
        /// Size of the image `decode` hands back; `None` makes decoding fail.
        pub dimensions: Option<(u32, u32)>,
        /// Number of writes that succeed before the rest fail.
        pub writes_before_failure: Option<usize>,
        writes: Cell<usize>,
        pub operations: RefCell<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Decode(String),
        Write {
            output: String,
            width: u32,
            height: u32,
            quality: u32,
        },
    }

    impl MockBackend {
        pub fn with_dimensions(width: u32, height: u32) -> Self {
            Self {
                dimensions: Some((width, height)),
                ..Self::default()
            }
        }

        pub fn undecodable() -> Self {
            Self::default()
        }

        pub fn failing_after(width: u32, height: u32, writes: usize) -> Self {
            Self {
                dimensions: Some((width, height)),
                writes_before_failure: Some(writes),
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.borrow().clone()
        }
    }

    impl ImageBackend for MockBackend {
        fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
            self.operations
                .borrow_mut()
                .push(RecordedOp::Decode(path.to_string_lossy().to_string()));

            self.dimensions
                .map(|(w, h)| DynamicImage::new_rgb8(w, h))
                .ok_or_else(|| BackendError::Decode("mock: not an image".to_string()))
        }

        fn write_derivative(
            &self,
            _image: &DynamicImage,
            params: &DerivativeParams,
        ) -> Result<(), BackendError> {
            if self
                .writes_before_failure
                .is_some_and(|limit| self.writes.get() >= limit)
            {
                return Err(BackendError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "mock: read-only",
                )));
            }
            self.writes.set(self.writes.get() + 1);
            self.operations.borrow_mut().push(RecordedOp::Write {
                output: params.output.to_string_lossy().to_string(),
                width: params.width,
                height: params.height,
                quality: params.quality.value(),
            });
            Ok(())
        }
    }

    #[test]
    fn mock_records_decode() {
        let backend = MockBackend::with_dimensions(800, 600);

        let img = backend.decode(Path::new("/test/image.jpg")).unwrap();
        assert_eq!((img.width(), img.height()), (800, 600));

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Decode(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_undecodable_fails() {
        let backend = MockBackend::undecodable();
        assert!(matches!(
            backend.decode(Path::new("/x.png")),
            Err(BackendError::Decode(_))
        ));
    }

    #[test]
    fn mock_fails_after_limit() {
        let backend = MockBackend::failing_after(10, 10, 1);
        let img = DynamicImage::new_rgb8(10, 10);
        let params = DerivativeParams {
            output: "/out.webp".into(),
            width: 5,
            height: 5,
            quality: super::super::params::Quality::default(),
        };
        assert!(backend.write_derivative(&img, &params).is_ok());
        assert!(backend.write_derivative(&img, &params).is_err());
        assert_eq!(backend.get_operations().len(), 1);
    }
}
