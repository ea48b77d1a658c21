//! Shared types passed between the pipeline, the builder and the controller.

use serde::Serialize;
use std::path::PathBuf;

/// User-supplied header text. Every field is escaped before it reaches HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostMetadata {
    /// Shown in the browser tab after the site title
    pub page_title: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    /// Already formatted, e.g. `17/10/26`
    pub date: String,
}

/// Display role of a derivative image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageRole {
    /// Header banner, 1900×800
    Header,
    /// In-article image, 778×514
    Body,
}

impl ImageRole {
    /// Filename stem prefix.
    pub fn prefix(self) -> &'static str {
        match self {
            ImageRole::Header => "head_",
            ImageRole::Body => "img_",
        }
    }

    /// Exact output box `(width, height)`.
    pub fn target(self) -> (u32, u32) {
        match self {
            ImageRole::Header => (1900, 800),
            ImageRole::Body => (778, 514),
        }
    }

    /// Smallest accepted source, if any.
    pub fn minimum_source(self) -> Option<(u32, u32)> {
        match self {
            ImageRole::Header => None,
            ImageRole::Body => Some((778, 514)),
        }
    }

    /// Export subdirectory name under `exp/img/`.
    pub fn export_subdir(self) -> &'static str {
        match self {
            ImageRole::Header => "head_p",
            ImageRole::Body => "post",
        }
    }
}

/// Where a pair of derivatives landed, and how each document references them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivativePaths {
    /// Absolute path of the export-tree file
    pub export_abs: PathBuf,
    /// Relative to `temp/post.html`, always `img/<stem>.webp`
    pub preview_rel: String,
    /// Relative to `exp/post/post.html`, e.g. `../img/post/<stem>.webp`
    pub export_rel: String,
}
