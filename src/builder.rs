//! Append-only builder for the two parallel post documents.
//!
//! The same logical post is kept in two files that only differ in asset and
//! image URLs:
//!
//! ```text
//! temp/post.html          preview, references ../needs/ and img/
//! exp/post/post.html      export, references ../css/, ../js/ and ../img/
//! ```
//!
//! ## Session lifecycle
//!
//! ```text
//!              start_post / resume_post
//! NotStarted ───────────────────────────▶ Started ──┐ add_* (append both)
//!                                          │  ▲ ◀───┘
//!                                 end_post │  │ start_post / resume_post
//!                                          ▼  │
//!                                         Finished      (after_end = "finish")
//! ```
//!
//! With `after_end = "keep_open"` the session stays in `Started` after
//! `end_post`, and later appends land after the closing shell.
//!
//! ## Write order
//!
//! The session state is checked before any file is touched. Each operation
//! then writes the preview document first and the export document second,
//! with one `write_all` per document. If the preview write fails the export
//! write is not attempted. If the export write fails after the preview
//! succeeded, the error is [`BuildError::PartialWrite`]; nothing is rolled
//! back.

use crate::assets::Tree;
use crate::config::{AfterEnd, SiteConfig};
use crate::error::{ErrorKind, TraversalError};
use crate::paths::{self, ProjectPaths};
use crate::render;
use crate::types::PostMetadata;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("{0}")]
    NotFound(String),
    #[error("Cannot {operation}: post is {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },
    #[error(transparent)]
    PathTraversal(#[from] TraversalError),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Partial write: {written} was updated but {failed} failed: {source}")]
    PartialWrite {
        written: PathBuf,
        failed: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BuildError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::NotFound(_) => ErrorKind::NotFound,
            BuildError::InvalidState { .. } => ErrorKind::InvalidState,
            BuildError::PathTraversal(_) => ErrorKind::PathTraversal,
            BuildError::Io { .. } | BuildError::PartialWrite { .. } => ErrorKind::Filesystem,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    Started,
    Finished,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionState::NotStarted => "not started",
            SessionState::Started => "started",
            SessionState::Finished => "finished",
        })
    }
}

/// The two files a session writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPair {
    pub preview: PathBuf,
    pub export: PathBuf,
}

impl DocumentPair {
    fn get(&self, tree: Tree) -> &Path {
        match tree {
            Tree::Preview => &self.preview,
            Tree::Export => &self.export,
        }
    }
}

/// The one in-progress post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSession {
    pub state: SessionState,
    pub documents: Option<DocumentPair>,
}

impl Default for PostSession {
    fn default() -> Self {
        Self {
            state: SessionState::NotStarted,
            documents: None,
        }
    }
}

pub struct HtmlBuilder {
    paths: ProjectPaths,
    site_title: String,
    after_end: AfterEnd,
    session: PostSession,
}

impl HtmlBuilder {
    pub fn new(paths: ProjectPaths, site_title: impl Into<String>) -> Self {
        Self {
            paths,
            site_title: site_title.into(),
            after_end: AfterEnd::default(),
            session: PostSession::default(),
        }
    }

    pub fn from_config(paths: ProjectPaths, config: &SiteConfig) -> Self {
        Self::new(paths, config.site_title.clone()).with_after_end(config.session.after_end)
    }

    pub fn with_after_end(mut self, after_end: AfterEnd) -> Self {
        self.after_end = after_end;
        self
    }

    pub fn state(&self) -> SessionState {
        self.session.state
    }

    pub fn session(&self) -> &PostSession {
        &self.session
    }

    pub fn documents(&self) -> Option<&DocumentPair> {
        self.session.documents.as_ref()
    }

    pub fn paths(&self) -> &ProjectPaths {
        &self.paths
    }

    pub fn after_end(&self) -> AfterEnd {
        self.after_end
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Create both documents from scratch, truncating any existing ones, and
    /// open a new session. Allowed from every state.
    ///
    /// `header_preview` is relative to `temp/post.html`, `header_export` to
    /// `exp/post/post.html`. Each must resolve inside its own tree.
    pub fn start_post(
        &mut self,
        meta: &PostMetadata,
        header_preview: &str,
        header_export: &str,
    ) -> Result<(), BuildError> {
        self.check_image_url(Tree::Preview, header_preview)?;
        self.check_image_url(Tree::Export, header_export)?;

        self.paths.ensure_dirs().map_err(|source| BuildError::Io {
            path: self.paths.root().to_path_buf(),
            source,
        })?;

        let documents = DocumentPair {
            preview: self.paths.preview_document(),
            export: self.paths.export_document(),
        };
        let preview_html =
            render::opening_shell(&self.site_title, meta, Tree::Preview, header_preview);
        let export_html = render::opening_shell(&self.site_title, meta, Tree::Export, header_export);

        write_pair(
            &documents,
            &preview_html.into_string(),
            &export_html.into_string(),
            |path, html| fs::write(path, html),
        )?;

        tracing::debug!(
            preview = %documents.preview.display(),
            export = %documents.export.display(),
            "started post"
        );
        self.session = PostSession {
            state: SessionState::Started,
            documents: Some(documents),
        };
        Ok(())
    }

    /// Continue appending to existing documents. Both must exist as files;
    /// their content is not inspected. On failure the current session is kept.
    pub fn resume_post(&mut self, preview: &Path, export: &Path) -> Result<(), BuildError> {
        if !(preview.is_file() && export.is_file()) {
            return Err(BuildError::NotFound(
                "cannot resume: missing HTML files".to_string(),
            ));
        }
        tracing::debug!(preview = %preview.display(), "resumed post");
        self.session = PostSession {
            state: SessionState::Started,
            documents: Some(DocumentPair {
                preview: preview.to_path_buf(),
                export: export.to_path_buf(),
            }),
        };
        Ok(())
    }

    /// Append the closing shell (footer and scripts) to both documents.
    pub fn end_post(&mut self) -> Result<(), BuildError> {
        let documents = self.open_documents("end the post")?;
        let preview = render::closing_shell(&self.site_title, Tree::Preview).into_string();
        let export = render::closing_shell(&self.site_title, Tree::Export).into_string();
        write_pair(documents, &preview, &export, append)?;

        if self.after_end == AfterEnd::Finish {
            self.session.state = SessionState::Finished;
        }
        tracing::debug!(state = %self.session.state, "ended post");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Content
    // -------------------------------------------------------------------------

    pub fn add_section_heading(&mut self, text: &str) -> Result<(), BuildError> {
        let html = render::section_heading(text).into_string();
        self.append_same("add a section heading", &html)
    }

    /// Line breaks (`\n` or `\r\n`) become `<br>`.
    pub fn add_paragraph(&mut self, text: &str) -> Result<(), BuildError> {
        let html = render::paragraph(text).into_string();
        self.append_same("add a paragraph", &html)
    }

    pub fn add_quote(&mut self, text: &str) -> Result<(), BuildError> {
        let html = render::quote(text).into_string();
        self.append_same("add a quote", &html)
    }

    /// Append an image block. `preview_src` and `export_src` are the relative
    /// paths returned by the image pipeline.
    pub fn add_image(
        &mut self,
        preview_src: &str,
        export_src: &str,
        alt: &str,
        caption: &str,
    ) -> Result<(), BuildError> {
        let documents = self.open_documents("add an image")?;
        self.check_image_url(Tree::Preview, preview_src)?;
        self.check_image_url(Tree::Export, export_src)?;

        let preview = render::image(preview_src, alt, caption).into_string();
        let export = render::image(export_src, alt, caption).into_string();
        write_pair(documents, &preview, &export, append)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn open_documents(&self, operation: &'static str) -> Result<&DocumentPair, BuildError> {
        match (&self.session.state, &self.session.documents) {
            (SessionState::Started, Some(documents)) => Ok(documents),
            (state, _) => Err(BuildError::InvalidState {
                operation,
                state: *state,
            }),
        }
    }

    fn append_same(&self, operation: &'static str, html: &str) -> Result<(), BuildError> {
        let documents = self.open_documents(operation)?;
        write_pair(documents, html, html, append)
    }

    /// Image URLs must stay inside the tree of the document that uses them.
    fn check_image_url(&self, tree: Tree, url: &str) -> Result<PathBuf, TraversalError> {
        match tree {
            Tree::Preview => {
                paths::resolve_within(self.paths.temp_dir(), url, self.paths.temp_dir())
            }
            Tree::Export => {
                paths::resolve_within(self.paths.exp_post_dir(), url, self.paths.exp_dir())
            }
        }
    }
}

/// A document is closed once its closing shell has been written.
pub fn is_closed(path: &Path) -> bool {
    fs::read_to_string(path).is_ok_and(|html| html.trim_end().ends_with("</html>"))
}

fn append(path: &Path, html: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().append(true).open(path)?;
    file.write_all(html.as_bytes())
}

/// Preview first, export second.
fn write_pair(
    documents: &DocumentPair,
    preview_html: &str,
    export_html: &str,
    write: impl Fn(&Path, &str) -> io::Result<()>,
) -> Result<(), BuildError> {
    let preview = documents.get(Tree::Preview);
    let export = documents.get(Tree::Export);

    write(preview, preview_html).map_err(|source| BuildError::Io {
        path: preview.to_path_buf(),
        source,
    })?;
    write(export, export_html).map_err(|source| BuildError::PartialWrite {
        written: preview.to_path_buf(),
        failed: export.to_path_buf(),
        source,
    })
}
