//! Source image → preview and export derivatives.
//!
//! One call validates a source, decodes it once, and writes two WebP files
//! under the same fresh stem:
//!
//! ```text
//! header: temp/img/head_<micros>_<hex>.webp   exp/img/head_p/head_<micros>_<hex>.webp
//! body:   temp/img/img_<micros>_<hex>.webp    exp/img/post/img_<micros>_<hex>.webp
//! ```
//!
//! Validation runs in a fixed order, and each step fails with its own error:
//! missing file, extension outside the allow-list, undecodable content,
//! then (body images only) dimensions below 778×514.

use super::backend::{BackendError, ImageBackend};
use super::params::{DerivativeParams, Quality};
use super::rust_backend::RustBackend;
use crate::error::{ErrorKind, TraversalError};
use crate::naming;
use crate::paths::{self, ProjectPaths};
use crate::types::{DerivativePaths, ImageRole};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Source extensions accepted before decoding is attempted.
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Extension of every derivative.
pub const OUTPUT_EXTENSION: &str = "webp";

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Image not found: {0}")]
    NotFound(PathBuf),
    #[error("Unsupported extension {extension:?} for {path} (allowed: .jpg, .jpeg, .png, .webp)")]
    UnsupportedFormat { path: PathBuf, extension: String },
    #[error("Invalid image file {path}: {reason}")]
    InvalidImage { path: PathBuf, reason: String },
    #[error("Image too small for article body (min {min_width}x{min_height}), got {width}x{height}")]
    TooSmall {
        width: u32,
        height: u32,
        min_width: u32,
        min_height: u32,
    },
    #[error(transparent)]
    PathTraversal(#[from] TraversalError),
    #[error("Failed to encode {path}: {reason}")]
    Encode { path: PathBuf, reason: String },
    #[error("Filesystem error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ImageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ImageError::NotFound(_) => ErrorKind::NotFound,
            ImageError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            ImageError::InvalidImage { .. } | ImageError::Encode { .. } => ErrorKind::InvalidImage,
            ImageError::TooSmall { .. } => ErrorKind::TooSmall,
            ImageError::PathTraversal(_) => ErrorKind::PathTraversal,
            ImageError::Io { .. } => ErrorKind::Filesystem,
        }
    }

    fn from_backend(path: &Path, err: BackendError) -> Self {
        let path = path.to_path_buf();
        match err {
            BackendError::Io(source) => ImageError::Io { path, source },
            BackendError::Decode(reason) => ImageError::InvalidImage { path, reason },
            BackendError::Encode(reason) => ImageError::Encode { path, reason },
        }
    }
}

/// Extension check, case-insensitive.
pub fn is_accepted_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| ACCEPTED_EXTENSIONS.iter().any(|a| e.eq_ignore_ascii_case(a)))
}

/// Produces header and body derivatives for one project.
pub struct ImagePipeline<B = RustBackend> {
    paths: ProjectPaths,
    backend: B,
    quality: Quality,
}

impl ImagePipeline<RustBackend> {
    pub fn new(paths: ProjectPaths) -> Self {
        Self::with_backend(paths, RustBackend::new())
    }
}

impl<B: ImageBackend> ImagePipeline<B> {
    /// Use a specific backend (allows testing with a mock).
    pub fn with_backend(paths: ProjectPaths, backend: B) -> Self {
        Self {
            paths,
            backend,
            quality: Quality::default(),
        }
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Header banner: 1900×800, export copy under `exp/img/head_p/`.
    pub fn generate_header_assets(&self, source: &Path) -> Result<DerivativePaths, ImageError> {
        self.generate(ImageRole::Header, source)
    }

    /// In-article image: 778×514, export copy under `exp/img/post/`.
    /// Sources smaller than 778×514 are rejected.
    pub fn generate_post_image(&self, source: &Path) -> Result<DerivativePaths, ImageError> {
        self.generate(ImageRole::Body, source)
    }

    fn export_dir(&self, role: ImageRole) -> &Path {
        match role {
            ImageRole::Header => self.paths.exp_img_head(),
            ImageRole::Body => self.paths.exp_img_post(),
        }
    }

    fn load_validated(&self, role: ImageRole, source: &Path) -> Result<DynamicImage, ImageError> {
        if !source.is_file() {
            return Err(ImageError::NotFound(source.to_path_buf()));
        }
        if !is_accepted_extension(source) {
            let extension = source
                .extension()
                .map(|e| e.to_string_lossy().to_string())
                .unwrap_or_default();
            return Err(ImageError::UnsupportedFormat {
                path: source.to_path_buf(),
                extension,
            });
        }

        let image = self
            .backend
            .decode(source)
            .map_err(|e| ImageError::from_backend(source, e))?;

        if let Some((min_width, min_height)) = role.minimum_source() {
            let (width, height) = (image.width(), image.height());
            if width < min_width || height < min_height {
                return Err(ImageError::TooSmall {
                    width,
                    height,
                    min_width,
                    min_height,
                });
            }
        }
        Ok(image)
    }

    fn generate(&self, role: ImageRole, source: &Path) -> Result<DerivativePaths, ImageError> {
        let image = self.load_validated(role, source)?;

        self.paths.ensure_dirs().map_err(|source| ImageError::Io {
            path: self.paths.root().to_path_buf(),
            source,
        })?;

        let file_name = format!("{}.{}", naming::unique_stem(role), OUTPUT_EXTENSION);
        let preview_abs = paths::safe_join(self.paths.temp_img_dir(), &file_name)?;
        let export_abs = paths::safe_join(self.export_dir(role), &file_name)?;

        let (width, height) = role.target();
        for output in [&preview_abs, &export_abs] {
            self.backend
                .write_derivative(
                    &image,
                    &DerivativeParams {
                        output: output.clone(),
                        width,
                        height,
                        quality: self.quality,
                    },
                )
                .map_err(|e| ImageError::from_backend(output, e))?;
        }

        let export_abs = std::path::absolute(&export_abs).map_err(|source| ImageError::Io {
            path: export_abs.clone(),
            source,
        })?;
        tracing::debug!(
            role = ?role,
            source = %source.display(),
            export = %export_abs.display(),
            "wrote derivatives"
        );

        Ok(DerivativePaths {
            export_abs,
            preview_rel: format!("img/{file_name}"),
            export_rel: format!("../img/{}/{file_name}", role.export_subdir()),
        })
    }
}
