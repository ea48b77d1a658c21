//! Read-only inventory of a project: which documents exist, whether the
//! export has been closed, and how many derivatives each tree holds.

use crate::builder;
use crate::naming;
use crate::paths::ProjectPaths;
use crate::types::ImageRole;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Derivative files per role in one directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoleCounts {
    pub header: usize,
    pub body: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectStatus {
    pub root: PathBuf,
    /// `temp/post.html`, when present
    pub preview_document: Option<PathBuf>,
    /// `exp/post/post.html`, when present
    pub export_document: Option<PathBuf>,
    /// Both documents exist, so the next start resumes.
    pub resumable: bool,
    /// The export document ends with a closing `</html>`.
    pub export_closed: bool,
    pub preview_images: RoleCounts,
    pub export_images: RoleCounts,
}

impl ProjectStatus {
    pub fn collect(paths: &ProjectPaths) -> Self {
        let existing = |p: PathBuf| p.is_file().then_some(p);
        let preview_document = existing(paths.preview_document());
        let export_document = existing(paths.export_document());
        let export_closed = export_document.as_deref().is_some_and(builder::is_closed);

        let head = count_derivatives(paths.exp_img_head());
        let body = count_derivatives(paths.exp_img_post());

        Self {
            root: paths.root().to_path_buf(),
            resumable: preview_document.is_some() && export_document.is_some(),
            preview_document,
            export_document,
            export_closed,
            preview_images: count_derivatives(paths.temp_img_dir()),
            export_images: RoleCounts {
                header: head.header,
                body: body.body,
            },
        }
    }
}

/// Count `.webp` files whose stem is a derivative stem. Unreadable
/// directories count as empty.
fn count_derivatives(dir: &Path) -> RoleCounts {
    let mut counts = RoleCounts::default();
    let Ok(entries) = fs::read_dir(dir) else {
        return counts;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.extension().and_then(|e| e.to_str()) != Some("webp") {
            continue;
        }
        let parsed = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(naming::parse_stem);
        match parsed.map(|p| p.role) {
            Some(ImageRole::Header) => counts.header += 1,
            Some(ImageRole::Body) => counts.body += 1,
            None => {}
        }
    }
    counts
}
