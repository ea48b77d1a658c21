//! Advisory cleanup of the preview tree.
//!
//! Removing preview files is never allowed to fail an operation: a file
//! that cannot be removed is skipped and reported as a debug event only.

use crate::paths::ProjectPaths;
use std::fs;

/// Remove everything inside `temp/` but keep the directory itself.
///
/// Returns the number of entries removed. A missing `temp/` removes nothing.
pub fn clean_preview(paths: &ProjectPaths) -> usize {
    let dir = paths.temp_dir();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "preview not cleaned");
            return 0;
        }
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        // file_type() does not follow symlinks, so a link to a directory is unlinked
        let result = match entry.file_type() {
            Ok(ft) if ft.is_dir() => fs::remove_dir_all(&path),
            Ok(_) => fs::remove_file(&path),
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => removed += 1,
            Err(e) => tracing::debug!(path = %path.display(), error = %e, "skipped preview entry"),
        }
    }
    tracing::debug!(removed, "cleaned preview");
    removed
}
