//! Fixed project directory layout.
//!
//! Everything the tool writes lives under a single project root:
//!
//! ```text
//! <root>/
//! ├── postpress.toml         # Optional configuration
//! ├── needs/                 # Bundled CSS/JS for the preview tree (not generated)
//! ├── temp/                  # Preview tree
//! │   ├── post.html
//! │   └── img/               # Preview derivatives (header and body)
//! └── exp/                   # Export tree
//!     ├── post/post.html
//!     └── img/
//!         ├── head_p/        # Header derivatives
//!         ├── post/          # Body derivatives
//!         └── item/
//! ```
//!
//! Paths are a pure function of the root. [`ProjectPaths::ensure_dirs`] is the
//! only operation that touches the filesystem.
//!
//! The module also owns the traversal checks: [`safe_join`] for joining a file
//! name under a directory and [`resolve_within`] for resolving a URL path that
//! an HTML document will reference.

use crate::error::TraversalError;
use std::io;
use std::path::{Component, Path, PathBuf};

/// File name of both HTML documents.
pub const DOCUMENT_NAME: &str = "post.html";

/// Absolute (or root-relative) locations of every directory the tool uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    root: PathBuf,
    temp_dir: PathBuf,
    temp_img_dir: PathBuf,
    needs_dir: PathBuf,
    exp_dir: PathBuf,
    exp_post_dir: PathBuf,
    exp_img_head: PathBuf,
    exp_img_post: PathBuf,
    exp_img_item: PathBuf,
}

impl ProjectPaths {
    /// Compute the layout under `root`.
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let temp_dir = root.join("temp");
        let exp_dir = root.join("exp");
        let exp_img = exp_dir.join("img");
        Self {
            temp_img_dir: temp_dir.join("img"),
            needs_dir: root.join("needs"),
            exp_post_dir: exp_dir.join("post"),
            exp_img_head: exp_img.join("head_p"),
            exp_img_post: exp_img.join("post"),
            exp_img_item: exp_img.join("item"),
            temp_dir,
            exp_dir,
            root,
        }
    }

    /// The project root is the parent of the directory the application is
    /// installed in.
    pub fn from_install_dir(install_dir: &Path) -> Self {
        let root = install_dir.parent().unwrap_or(install_dir);
        Self::from_root(root)
    }

    /// Derive the layout from the location of the running executable.
    pub fn discover() -> io::Result<Self> {
        let exe = std::env::current_exe()?;
        let install_dir = exe.parent().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "executable has no parent directory",
            )
        })?;
        Ok(Self::from_install_dir(install_dir))
    }

    /// Create every writable directory. Existing directories are left alone.
    pub fn ensure_dirs(&self) -> io::Result<()> {
        for dir in self.writable_dirs() {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    fn writable_dirs(&self) -> [&Path; 7] {
        [
            &self.temp_dir,
            &self.temp_img_dir,
            &self.exp_dir,
            &self.exp_post_dir,
            &self.exp_img_head,
            &self.exp_img_post,
            &self.exp_img_item,
        ]
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Preview tree root (`temp/`).
    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    pub fn temp_img_dir(&self) -> &Path {
        &self.temp_img_dir
    }

    pub fn needs_dir(&self) -> &Path {
        &self.needs_dir
    }

    /// Export tree root (`exp/`).
    pub fn exp_dir(&self) -> &Path {
        &self.exp_dir
    }

    pub fn exp_post_dir(&self) -> &Path {
        &self.exp_post_dir
    }

    pub fn exp_img_head(&self) -> &Path {
        &self.exp_img_head
    }

    pub fn exp_img_post(&self) -> &Path {
        &self.exp_img_post
    }

    pub fn exp_img_item(&self) -> &Path {
        &self.exp_img_item
    }

    /// `temp/post.html`
    pub fn preview_document(&self) -> PathBuf {
        self.temp_dir.join(DOCUMENT_NAME)
    }

    /// `exp/post/post.html`
    pub fn export_document(&self) -> PathBuf {
        self.exp_post_dir.join(DOCUMENT_NAME)
    }
}

/// Lexically normalize a path: drop `.` and fold `..` into its parent.
///
/// Does not touch the filesystem, so symlinks are not resolved. A `..` that
/// would climb above the start of a relative path is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Join `relative` under `base`, refusing results that escape `base`.
pub fn safe_join(base: &Path, relative: impl AsRef<Path>) -> Result<PathBuf, TraversalError> {
    let norm_base = normalize(base);
    let joined = normalize(&norm_base.join(relative.as_ref()));
    if joined.starts_with(&norm_base) {
        Ok(joined)
    } else {
        Err(TraversalError {
            base: norm_base,
            path: joined,
        })
    }
}

/// Resolve a document-relative URL path against the document's directory and
/// require the result to stay under `base`.
pub fn resolve_within(
    document_dir: &Path,
    url_path: &str,
    base: &Path,
) -> Result<PathBuf, TraversalError> {
    let norm_base = normalize(base);
    let resolved = normalize(&document_dir.join(url_path));
    if resolved.starts_with(&norm_base) && resolved != norm_base {
        Ok(resolved)
    } else {
        Err(TraversalError {
            base: norm_base,
            path: resolved,
        })
    }
}
