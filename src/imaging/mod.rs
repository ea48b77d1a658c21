//! Image processing: pure Rust, no external binaries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, PNG, WebP) |
//! | **Resize** | `image::imageops::resize`, Lanczos3, exact box |
//! | **Encode → WebP** | `webp` (libwebp), lossy, quality 90, method 6 |
//!
//! The module is split into:
//! - **Parameters**: Data structures describing one derivative
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Pipeline**: validation, naming and the two-tree write ([`ImagePipeline`])

pub mod backend;
mod params;
pub mod pipeline;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use params::{DerivativeParams, Quality};
pub use pipeline::{ACCEPTED_EXTENSIONS, ImageError, ImagePipeline};
pub use rust_backend::RustBackend;
