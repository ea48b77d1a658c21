//! Error taxonomy shared by the image pipeline and the HTML builder.
//!
//! Each module owns its own `thiserror` enum ([`ImageError`](crate::imaging::ImageError),
//! [`BuildError`](crate::builder::BuildError)). Both classify into one
//! [`ErrorKind`] so callers can react to the category of a failure without
//! matching on every variant.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing source image or missing documents to resume.
    NotFound,
    /// Source extension outside the accepted list.
    UnsupportedFormat,
    /// Source content does not decode as a raster image.
    InvalidImage,
    /// Body image below the minimum dimensions.
    TooSmall,
    /// Content append attempted outside an open post.
    InvalidState,
    /// Permission or I/O failure.
    Filesystem,
    /// A resolved path escapes its base directory.
    PathTraversal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::UnsupportedFormat => "unsupported format",
            ErrorKind::InvalidImage => "invalid image",
            ErrorKind::TooSmall => "too small",
            ErrorKind::InvalidState => "invalid state",
            ErrorKind::Filesystem => "filesystem error",
            ErrorKind::PathTraversal => "path traversal",
        };
        f.write_str(name)
    }
}

/// A joined or resolved path landed outside the directory it must stay in.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("path traversal detected: {path} escapes {base}")]
pub struct TraversalError {
    pub base: PathBuf,
    pub path: PathBuf,
}
