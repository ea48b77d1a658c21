//! Shared test utilities.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (tmp, paths) = test_project();
//! write_test_image(&tmp.path().join("photo.jpg"), 800, 600);
//! ```

use crate::paths::ProjectPaths;
use image::{ImageBuffer, Rgb};
use std::path::Path;
use tempfile::TempDir;

/// Empty project root in a temp directory. No subdirectories are created.
pub fn test_project() -> (TempDir, ProjectPaths) {
    let tmp = TempDir::new().unwrap();
    let paths = ProjectPaths::from_root(tmp.path());
    (tmp, paths)
}

/// Write a gradient image; the format follows the extension of `path`.
pub fn write_test_image(path: &Path, width: u32, height: u32) {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    img.save(path).unwrap();
}
