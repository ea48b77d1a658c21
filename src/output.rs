//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Status
//!
//! ```text
//! Project /srv/blog
//! Post
//!     Preview: temp/post.html
//!     Export: exp/post/post.html (open)
//!     Next start resumes the post
//! Images
//!     Preview: 1 header, 2 body
//!     Export: 1 header, 2 body
//! ```
//!
//! ## Init
//!
//! ```text
//! Project /srv/blog
//!     temp/img/
//!     exp/post/
//!     …
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::controller::Feedback;
use crate::paths::ProjectPaths;
use crate::status::{ProjectStatus, RoleCounts};
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Path relative to the project root when it lives inside it.
fn display_rel(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn role_counts(counts: RoleCounts) -> String {
    format!("{} header, {} body", counts.header, counts.body)
}

// ============================================================================
// Controller feedback
// ============================================================================

pub fn format_feedback(feedback: &Feedback) -> Vec<String> {
    match feedback {
        Feedback::Error(message) => vec![format!("Error: {message}")],
        Feedback::Info(message) => vec![message.clone()],
    }
}

/// Errors go to stderr, information to stdout.
pub fn print_feedback(feedback: &Feedback) {
    for line in format_feedback(feedback) {
        if feedback.is_error() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

// ============================================================================
// Status
// ============================================================================

pub fn format_status(status: &ProjectStatus) -> Vec<String> {
    let root = status.root.as_path();
    let document = |doc: Option<&Path>| match doc {
        Some(p) => display_rel(root, p),
        None => "(none)".to_string(),
    };

    let mut lines = vec![format!("Project {}", root.display()), "Post".to_string()];
    lines.push(format!(
        "{}Preview: {}",
        indent(1),
        document(status.preview_document.as_deref())
    ));
    let export_state = match (&status.export_document, status.export_closed) {
        (Some(_), true) => " (closed)",
        (Some(_), false) => " (open)",
        (None, _) => "",
    };
    lines.push(format!(
        "{}Export: {}{}",
        indent(1),
        document(status.export_document.as_deref()),
        export_state
    ));
    if status.resumable {
        lines.push(format!("{}Next start resumes the post", indent(1)));
    }

    lines.push("Images".to_string());
    lines.push(format!("{}Preview: {}", indent(1), role_counts(status.preview_images)));
    lines.push(format!("{}Export: {}", indent(1), role_counts(status.export_images)));
    lines
}

pub fn print_status(status: &ProjectStatus) {
    for line in format_status(status) {
        println!("{}", line);
    }
}

// ============================================================================
// Init / clean
// ============================================================================

/// `needs_present` tells whether the bundled `needs/` directory exists.
pub fn format_init(paths: &ProjectPaths, needs_present: bool) -> Vec<String> {
    let root = paths.root();
    let mut lines = vec![format!("Project {}", root.display())];
    for dir in [
        paths.temp_img_dir(),
        paths.exp_post_dir(),
        paths.exp_img_head(),
        paths.exp_img_post(),
        paths.exp_img_item(),
    ] {
        lines.push(format!("{}{}/", indent(1), display_rel(root, dir)));
    }
    if !needs_present {
        lines.push(format!(
            "{}Note: {}/ is missing; the preview will render without styles",
            indent(1),
            display_rel(root, paths.needs_dir())
        ));
    }
    lines
}

pub fn print_init(paths: &ProjectPaths) {
    for line in format_init(paths, paths.needs_dir().is_dir()) {
        println!("{}", line);
    }
}

pub fn format_clean(removed: usize) -> Vec<String> {
    match removed {
        0 => vec!["Preview already clean".to_string()],
        1 => vec!["Removed 1 preview entry".to_string()],
        n => vec![format!("Removed {n} preview entries")],
    }
}

pub fn print_clean(removed: usize) {
    for line in format_clean(removed) {
        println!("{}", line);
    }
}
