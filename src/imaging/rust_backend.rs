//! Production backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image::ImageReader` with content sniffing |
//! | RGB conversion | `image::DynamicImage::to_rgb8` |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Encode → WebP | `webp::Encoder` (libwebp, lossy, method 6) |

use super::backend::{BackendError, ImageBackend};
use super::params::{DerivativeParams, Quality};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, RgbImage};
use std::io::Write;
use std::path::Path;

/// libwebp effort setting: 0 = fast, 6 = slowest / smallest.
const WEBP_METHOD: i32 = 6;

/// Backend built on the `image` and `webp` crates.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode an RGB buffer as lossy WebP.
fn encode_webp(img: &RgbImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let mut config = webp::WebPConfig::new()
        .map_err(|_| BackendError::Encode("failed to initialise WebP config".into()))?;
    config.lossless = 0;
    config.quality = quality.value() as f32;
    config.method = WEBP_METHOD;

    let encoder = webp::Encoder::from_rgb(img.as_raw(), img.width(), img.height());
    let memory = encoder
        .encode_advanced(&config)
        .map_err(|e| BackendError::Encode(format!("WebP encode failed: {e:?}")))?;
    Ok(memory.to_vec())
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        // The reader starts from the extension; sniffing fixes mislabelled files.
        ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| {
                BackendError::Decode(format!("Failed to decode {}: {}", path.display(), e))
            })
    }

    fn write_derivative(
        &self,
        image: &DynamicImage,
        params: &DerivativeParams,
    ) -> Result<(), BackendError> {
        let rgb = image.to_rgb8();
        let resized = image::imageops::resize(&rgb, params.width, params.height, FilterType::Lanczos3);
        let bytes = encode_webp(&resized, params.quality)?;

        // Derivative names are unique; an existing file is never overwritten.
        let mut file = std::fs::File::create_new(&params.output)?;
        file.write_all(&bytes)?;
        Ok(())
    }
}
