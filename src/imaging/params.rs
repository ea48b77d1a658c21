//! Parameter types for derivative generation.
//!
//! These structs describe *what* to write, not *how*. The
//! [`pipeline`](super::pipeline) decides names and sizes; the
//! [`backend`](super::backend) does the pixel work.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// One derivative to write: exact box, no aspect preservation.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivativeParams {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}
