//! # postpress
//!
//! Compose a single Clean Blog post (header banner, section titles,
//! paragraphs, quotes and images) and get it as static HTML, written twice:
//! once as a preview you can open straight from disk, once as the final
//! export that drops into the live site.
//!
//! # Project Layout
//!
//! ```text
//! <root>/
//! ├── postpress.toml            # Optional configuration
//! ├── needs/                    # Bundled CSS/JS used by the preview
//! ├── temp/                     # Preview tree
//! │   ├── post.html
//! │   └── img/
//! └── exp/                      # Export tree
//!     ├── post/post.html
//!     └── img/{head_p,post,item}/
//! ```
//!
//! # Architecture
//!
//! ```text
//! controller ──▶ imaging (source image → two WebP derivatives)
//!      │                         │ relative paths
//!      └───────▶ builder ◀───────┘  (append to both documents)
//!                   │
//!                render (maud fragments)
//! ```
//!
//! The controller collects and validates input, the image pipeline produces
//! one derivative per tree, and the builder appends the same block to both
//! documents with tree-specific URLs.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`paths`] | Fixed directory layout and traversal-checked joins |
//! | [`assets`] | Stylesheet and script URLs for each tree |
//! | [`imaging`] | Validation, resize and WebP encoding of source images |
//! | [`naming`] | Collision-resistant derivative stems |
//! | [`render`] | Maud fragments for the post shell and content blocks |
//! | [`builder`] | Append-only writer for the two documents, session lifecycle |
//! | [`cleanup`] | Advisory removal of the preview tree |
//! | [`controller`] | Headless screen router driving the pipeline and builder |
//! | [`status`] | Read-only project inventory |
//! | [`config`] | `postpress.toml` loading, merging and validation |
//! | [`error`] | Shared error categories |
//! | [`types`] | Types shared between modules |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Two Documents, One Post
//!
//! The preview and the export differ only in where they find their assets.
//! Instead of rendering once and rewriting URLs, every block is rendered per
//! tree and appended to both files in the same call. The files are never
//! re-read or re-parsed, so a resumed session simply keeps appending.
//!
//! ## Maud Over String Templates
//!
//! Every user string reaches the page through maud interpolation, which
//! escapes it. The only raw insertions are the image URLs produced by the
//! pipeline, and those are checked to resolve inside their own tree first.
//!
//! ## WebP at a Fixed Box
//!
//! Derivatives are resized to an exact box (1900×800 for headers, 778×514
//! for body images) to match the Clean Blog layout, and encoded as lossy
//! WebP through libwebp.

pub mod assets;
pub mod builder;
pub mod cleanup;
pub mod config;
pub mod controller;
pub mod error;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod paths;
pub mod render;
pub mod status;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
