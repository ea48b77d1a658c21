//! Headless screen router.
//!
//! The editor is a stack of form screens. Each [`Screen`] has one handler,
//! looked up with [`handler_for`]. A handler receives the shared services,
//! the mutable [`Session`] and the user's [`Action`], and answers with a
//! [`Reply`]: the next screen plus optional feedback for the user.
//!
//! ```text
//!            Start ──(documents exist)──▶ Menu ◀──────────────────────────┐
//!              │                           │                             │
//!   (no post / NewPost)        AddImage / Navigate(…)                    │
//!              ▼                           ▼                             │
//!         FileChooser ──(Header flow)──▶ Header ──(start_post)──────────▶│
//!              │                                                         │
//!              └──(ContentImage flow)──▶ Image ──(add_image)────────────▶│
//!                                                                        │
//!      SectionHeading / Text / Quote ──(add_*)──────────────────────────▶│
//!      Preview ──(file:// URL)──────────────────────────────────────────▶┘
//!      Export ──(end_post, clean preview)──▶ Start
//! ```
//!
//! Under `after_end = "finish"` an export that already ends in `</html>` is
//! not resumed: Start begins the header flow instead.
//!
//! Form input is validated before any core call. Core errors never escape a
//! handler: they become [`Feedback::Error`] and the user stays on the screen
//! that failed.

use crate::builder::{self, HtmlBuilder};
use crate::cleanup;
use crate::config::{AfterEnd, SiteConfig};
use crate::imaging::{ImageBackend, ImagePipeline, Quality, RustBackend};
use crate::paths::ProjectPaths;
use crate::types::PostMetadata;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Start,
    FileChooser,
    Header,
    Menu,
    SectionHeading,
    Text,
    Image,
    Quote,
    Preview,
    Export,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What the file chooser is choosing for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Flow {
    /// Header image of a new post
    #[default]
    Header,
    /// Image block inside the article
    ContentImage,
}

/// Transient UI state shared by all screens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub flow: Flow,
    pub selected_file: Option<PathBuf>,
}

impl Session {
    fn reset(&mut self) {
        *self = Session::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Error(String),
    Info(String),
}

impl Feedback {
    pub fn is_error(&self) -> bool {
        matches!(self, Feedback::Error(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Feedback::Error(m) | Feedback::Info(m) => m,
        }
    }
}

/// Transition returned by every handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub next: Screen,
    pub feedback: Option<Feedback>,
}

impl Reply {
    fn go(next: Screen) -> Self {
        Self {
            next,
            feedback: None,
        }
    }

    fn error(stay: Screen, message: impl Into<String>) -> Self {
        Self {
            next: stay,
            feedback: Some(Feedback::Error(message.into())),
        }
    }

    fn info(next: Screen, message: impl Into<String>) -> Self {
        Self {
            next,
            feedback: Some(Feedback::Info(message.into())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Resume the existing post, or begin the header flow when there is none.
    Start,
    /// Begin the header flow even when a post exists.
    NewPost,
    /// File chooser result; `None` when nothing was selected.
    ChooseFile(Option<PathBuf>),
    Cancel,
    SubmitHeader(HeaderForm),
    /// Menu entry that opens the file chooser for an article image.
    AddImage,
    Navigate(Screen),
    SubmitHeading(String),
    SubmitText(String),
    SubmitQuote(String),
    SubmitImage(ImageForm),
    ShowPreview,
    ConfirmExport,
    Back,
}

// =============================================================================
// Forms
// =============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Enter all header fields (page title, title, subtitle, author)")]
    MissingHeaderFields,
    #[error("Select a file first")]
    NoFileSelected,
    #[error("Enter {0}")]
    Empty(&'static str),
    #[error("Enter both alternative text and caption")]
    MissingImageFields,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderForm {
    pub page_title: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    /// Defaults to today, `dd/mm/yy`.
    pub date: Option<String>,
}

impl HeaderForm {
    /// Trimmed metadata, or an error when any text field is blank.
    pub fn validate(&self) -> Result<PostMetadata, ValidationError> {
        let fields = [&self.page_title, &self.title, &self.subtitle, &self.author];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(ValidationError::MissingHeaderFields);
        }
        Ok(PostMetadata {
            page_title: self.page_title.trim().to_string(),
            title: self.title.trim().to_string(),
            subtitle: self.subtitle.trim().to_string(),
            author: self.author.trim().to_string(),
            date: self
                .date
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
                .unwrap_or_else(today),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageForm {
    pub alt: String,
    pub caption: String,
}

impl ImageForm {
    pub fn validate(&self) -> Result<(String, String), ValidationError> {
        let (alt, caption) = (self.alt.trim(), self.caption.trim());
        if alt.is_empty() || caption.is_empty() {
            return Err(ValidationError::MissingImageFields);
        }
        Ok((alt.to_string(), caption.to_string()))
    }
}

fn today() -> String {
    chrono::Local::now().format("%d/%m/%y").to_string()
}

/// Free text must not be empty; whitespace is kept as typed.
fn non_empty(text: &str, what: &'static str) -> Result<(), ValidationError> {
    if text.is_empty() {
        Err(ValidationError::Empty(what))
    } else {
        Ok(())
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Collaborators every handler may call.
pub struct Services<B = RustBackend> {
    pub paths: ProjectPaths,
    pub images: ImagePipeline<B>,
    pub html: HtmlBuilder,
    pub clean_preview_on_export: bool,
}

pub type Handler<B> = fn(&mut Services<B>, &mut Session, Action) -> Reply;

/// Dispatch table: one handler per screen.
pub fn handler_for<B: ImageBackend>(screen: Screen) -> Handler<B> {
    match screen {
        Screen::Start => start,
        Screen::FileChooser => file_chooser,
        Screen::Header => header,
        Screen::Menu => menu,
        Screen::SectionHeading => section_heading,
        Screen::Text => text,
        Screen::Image => image,
        Screen::Quote => quote,
        Screen::Preview => preview,
        Screen::Export => export,
    }
}

pub struct Controller<B = RustBackend> {
    screen: Screen,
    session: Session,
    services: Services<B>,
}

impl Controller<RustBackend> {
    pub fn new(paths: ProjectPaths, config: &SiteConfig) -> Self {
        Self::with_backend(paths, config, RustBackend::new())
    }
}

impl<B: ImageBackend> Controller<B> {
    pub fn with_backend(paths: ProjectPaths, config: &SiteConfig, backend: B) -> Self {
        let images = ImagePipeline::with_backend(paths.clone(), backend)
            .with_quality(Quality::new(config.images.quality));
        let html = HtmlBuilder::from_config(paths.clone(), config);
        Self {
            screen: Screen::Start,
            session: Session::default(),
            services: Services {
                paths,
                images,
                html,
                clean_preview_on_export: config.session.clean_preview_on_export,
            },
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn services(&self) -> &Services<B> {
        &self.services
    }

    /// Route `action` to the current screen's handler and move to the screen
    /// it names.
    pub fn dispatch(&mut self, action: Action) -> Reply {
        let from = self.screen;
        let handler = handler_for::<B>(from);
        let reply = handler(&mut self.services, &mut self.session, action);
        self.screen = reply.next;
        tracing::debug!(%from, to = %reply.next, "screen transition");
        reply
    }
}

// =============================================================================
// Handlers
// =============================================================================

fn unavailable(screen: Screen, action: &Action) -> Reply {
    Reply::error(screen, format!("{action:?} is not available on the {screen} screen"))
}

fn start<B: ImageBackend>(services: &mut Services<B>, session: &mut Session, action: Action) -> Reply {
    match action {
        Action::Start => {
            let (preview, export) = (
                services.paths.preview_document(),
                services.paths.export_document(),
            );
            if !(preview.is_file() && export.is_file()) {
                session.reset();
                return Reply::go(Screen::FileChooser);
            }
            if services.html.after_end() == AfterEnd::Finish && builder::is_closed(&export) {
                session.reset();
                return Reply::info(
                    Screen::FileChooser,
                    "The last post was already exported; choose a header image for a new one",
                );
            }
            match services.html.resume_post(&preview, &export) {
                Ok(()) => Reply::go(Screen::Menu),
                Err(e) => Reply::error(Screen::Start, format!("Cannot resume the post: {e}")),
            }
        }
        Action::NewPost => new_post(services, session),
        other => unavailable(Screen::Start, &other),
    }
}

fn new_post<B>(services: &Services<B>, session: &mut Session) -> Reply {
    if let Err(e) = services.paths.ensure_dirs() {
        return Reply::error(Screen::Start, format!("Cannot create project directories: {e}"));
    }
    session.reset();
    Reply::go(Screen::FileChooser)
}

fn file_chooser<B: ImageBackend>(
    services: &mut Services<B>,
    session: &mut Session,
    action: Action,
) -> Reply {
    match action {
        Action::ChooseFile(Some(path)) => {
            session.selected_file = Some(path);
            match session.flow {
                Flow::Header => Reply::go(Screen::Header),
                Flow::ContentImage => Reply::go(Screen::Image),
            }
        }
        Action::ChooseFile(None) => {
            Reply::error(Screen::FileChooser, ValidationError::NoFileSelected.to_string())
        }
        Action::Cancel => match session.flow {
            Flow::Header => {
                cleanup::clean_preview(&services.paths);
                Reply::go(Screen::Start)
            }
            Flow::ContentImage => Reply::go(Screen::Menu),
        },
        other => unavailable(Screen::FileChooser, &other),
    }
}

fn header<B: ImageBackend>(services: &mut Services<B>, session: &mut Session, action: Action) -> Reply {
    let form = match action {
        Action::SubmitHeader(form) => form,
        other => return unavailable(Screen::Header, &other),
    };
    let meta = match form.validate() {
        Ok(meta) => meta,
        Err(e) => return Reply::error(Screen::Header, e.to_string()),
    };
    let Some(source) = session.selected_file.as_deref() else {
        return Reply::error(Screen::Header, "Select a header image first");
    };

    let created = services
        .images
        .generate_header_assets(source)
        .map_err(|e| e.to_string())
        .and_then(|header| {
            services
                .html
                .start_post(&meta, &header.preview_rel, &header.export_rel)
                .map_err(|e| e.to_string())
        });
    match created {
        Ok(()) => {
            session.selected_file = None;
            Reply::go(Screen::Menu)
        }
        Err(e) => Reply::error(Screen::Header, format!("Could not create the header: {e}")),
    }
}

fn menu<B: ImageBackend>(_services: &mut Services<B>, session: &mut Session, action: Action) -> Reply {
    match action {
        Action::AddImage => {
            session.flow = Flow::ContentImage;
            Reply::go(Screen::FileChooser)
        }
        Action::Navigate(
            target @ (Screen::SectionHeading
            | Screen::Text
            | Screen::Quote
            | Screen::Preview
            | Screen::Export),
        ) => Reply::go(target),
        other => unavailable(Screen::Menu, &other),
    }
}

/// Shared shape of the three text screens.
fn text_block<B>(
    screen: Screen,
    services: &mut Services<B>,
    action: Action,
    extract: fn(Action) -> Result<String, Action>,
    what: &'static str,
    append: fn(&mut HtmlBuilder, &str) -> Result<(), crate::builder::BuildError>,
) -> Reply {
    if action == Action::Back {
        return Reply::go(Screen::Menu);
    }
    let text = match extract(action) {
        Ok(text) => text,
        Err(other) => return unavailable(screen, &other),
    };
    if let Err(e) = non_empty(&text, what) {
        return Reply::error(screen, e.to_string());
    }
    match append(&mut services.html, &text) {
        Ok(()) => Reply::go(Screen::Menu),
        Err(e) => Reply::error(screen, format!("HTML error: {e}")),
    }
}

fn section_heading<B: ImageBackend>(
    services: &mut Services<B>,
    _session: &mut Session,
    action: Action,
) -> Reply {
    let extract = |a: Action| match a {
        Action::SubmitHeading(t) => Ok(t.trim().to_string()),
        other => Err(other),
    };
    text_block(
        Screen::SectionHeading,
        services,
        action,
        extract,
        "a section title",
        HtmlBuilder::add_section_heading,
    )
}

fn text<B: ImageBackend>(services: &mut Services<B>, _session: &mut Session, action: Action) -> Reply {
    let extract = |a: Action| match a {
        Action::SubmitText(t) => Ok(t),
        other => Err(other),
    };
    text_block(
        Screen::Text,
        services,
        action,
        extract,
        "some text",
        HtmlBuilder::add_paragraph,
    )
}

fn quote<B: ImageBackend>(services: &mut Services<B>, _session: &mut Session, action: Action) -> Reply {
    let extract = |a: Action| match a {
        Action::SubmitQuote(t) => Ok(t),
        other => Err(other),
    };
    text_block(
        Screen::Quote,
        services,
        action,
        extract,
        "a quote",
        HtmlBuilder::add_quote,
    )
}

fn image<B: ImageBackend>(services: &mut Services<B>, session: &mut Session, action: Action) -> Reply {
    let form = match action {
        Action::SubmitImage(form) => form,
        Action::Back => return Reply::go(Screen::Menu),
        other => return unavailable(Screen::Image, &other),
    };
    let Some(source) = session.selected_file.as_deref() else {
        return Reply::error(Screen::Image, "Select an image first");
    };
    let (alt, caption) = match form.validate() {
        Ok(fields) => fields,
        Err(e) => return Reply::error(Screen::Image, e.to_string()),
    };

    let added = services
        .images
        .generate_post_image(source)
        .map_err(|e| e.to_string())
        .and_then(|img| {
            services
                .html
                .add_image(&img.preview_rel, &img.export_rel, &alt, &caption)
                .map_err(|e| e.to_string())
        });
    match added {
        Ok(()) => {
            session.selected_file = None;
            Reply::go(Screen::Menu)
        }
        Err(e) => Reply::error(Screen::Image, format!("Image error: {e}")),
    }
}

fn preview<B: ImageBackend>(services: &mut Services<B>, _session: &mut Session, action: Action) -> Reply {
    match action {
        Action::ShowPreview => {
            let document = services.paths.preview_document();
            if !document.is_file() {
                return Reply::error(Screen::Preview, "No post in progress. Create a header first");
            }
            match std::path::absolute(&document) {
                Ok(abs) => Reply::info(Screen::Menu, format!("file://{}", abs.display())),
                Err(e) => Reply::error(Screen::Preview, format!("Cannot open the preview: {e}")),
            }
        }
        Action::Back => Reply::go(Screen::Menu),
        other => unavailable(Screen::Preview, &other),
    }
}

fn export<B: ImageBackend>(services: &mut Services<B>, session: &mut Session, action: Action) -> Reply {
    match action {
        Action::ConfirmExport => {
            if let Err(e) = services.html.end_post() {
                return Reply::error(Screen::Export, format!("Could not finish the post: {e}"));
            }
            if services.clean_preview_on_export {
                cleanup::clean_preview(&services.paths);
            }
            session.reset();
            Reply::info(
                Screen::Start,
                format!(
                    "Export finished. File: {}",
                    services.paths.export_document().display()
                ),
            )
        }
        Action::Back => Reply::go(Screen::Menu),
        other => unavailable(Screen::Export, &other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SessionState;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::test_helpers::test_project;
    use std::fs;

    fn header_form() -> HeaderForm {
        HeaderForm {
            page_title: "Balade".into(),
            title: "Le port".into(),
            subtitle: "Un matin".into(),
            author: "Camille".into(),
            date: Some("17/10/26".into()),
        }
    }

    fn controller(backend: MockBackend) -> (tempfile::TempDir, Controller<MockBackend>, PathBuf) {
        let (tmp, paths) = test_project();
        let source = tmp.path().join("photo.jpg");
        fs::write(&source, b"mock decodes anything").unwrap();
        let ctrl = Controller::with_backend(paths, &SiteConfig::default(), backend);
        (tmp, ctrl, source)
    }

    /// Walks Start → FileChooser → Header → Menu.
    fn with_post() -> (tempfile::TempDir, Controller<MockBackend>, PathBuf) {
        let (tmp, mut ctrl, source) = controller(MockBackend::with_dimensions(2000, 1200));
        assert_eq!(ctrl.dispatch(Action::Start).next, Screen::FileChooser);
        assert_eq!(
            ctrl.dispatch(Action::ChooseFile(Some(source.clone()))).next,
            Screen::Header
        );
        let reply = ctrl.dispatch(Action::SubmitHeader(header_form()));
        assert_eq!(reply, Reply::go(Screen::Menu));
        (tmp, ctrl, source)
    }

    fn preview_html(ctrl: &Controller<MockBackend>) -> String {
        fs::read_to_string(ctrl.services().paths.preview_document()).unwrap()
    }

    #[test]
    fn handler_table_covers_every_screen() {
        let (_tmp, mut ctrl, _) = controller(MockBackend::with_dimensions(1, 1));
        for screen in [
            Screen::Start,
            Screen::FileChooser,
            Screen::Header,
            Screen::Menu,
            Screen::SectionHeading,
            Screen::Text,
            Screen::Image,
            Screen::Quote,
            Screen::Preview,
            Screen::Export,
        ] {
            let handler = handler_for::<MockBackend>(screen);
            // Menu navigation is not meaningful anywhere but the menu
            let reply = handler(
                &mut ctrl.services,
                &mut ctrl.session,
                Action::Navigate(Screen::Start),
            );
            assert!(reply.feedback.is_some_and(|f| f.is_error()), "{screen}");
        }
    }

    #[test]
    fn start_without_documents_goes_to_header_flow() {
        let (tmp, mut ctrl, _) = controller(MockBackend::with_dimensions(1, 1));
        let reply = ctrl.dispatch(Action::Start);

        assert_eq!(reply.next, Screen::FileChooser);
        assert_eq!(ctrl.session().flow, Flow::Header);
        assert!(!tmp.path().join("temp").exists());
        assert!(!tmp.path().join("exp").exists());
    }

    #[test]
    fn new_post_creates_project_directories() {
        let (tmp, mut ctrl, _) = controller(MockBackend::with_dimensions(1, 1));
        assert_eq!(ctrl.dispatch(Action::NewPost).next, Screen::FileChooser);
        assert!(tmp.path().join("temp/img").is_dir());
        assert!(tmp.path().join("exp/img/item").is_dir());
    }

    #[test]
    fn start_resumes_existing_post() {
        let (_tmp, ctrl, _) = with_post();
        let paths = ctrl.services().paths.clone();

        let mut fresh = Controller::with_backend(
            paths,
            &SiteConfig::default(),
            MockBackend::with_dimensions(1, 1),
        );
        assert_eq!(fresh.dispatch(Action::Start), Reply::go(Screen::Menu));
        assert_eq!(fresh.services().html.state(), SessionState::Started);
    }

    #[test]
    fn new_post_ignores_existing_documents() {
        let (_tmp, mut ctrl, _) = with_post();
        ctrl.dispatch(Action::Navigate(Screen::Export));
        ctrl.dispatch(Action::ConfirmExport);
        assert_eq!(ctrl.screen(), Screen::Start);

        assert_eq!(ctrl.dispatch(Action::NewPost).next, Screen::FileChooser);
    }

    #[test]
    fn empty_selection_stays_on_chooser() {
        let (_tmp, mut ctrl, _) = controller(MockBackend::with_dimensions(1, 1));
        ctrl.dispatch(Action::Start);
        let reply = ctrl.dispatch(Action::ChooseFile(None));
        assert_eq!(reply.next, Screen::FileChooser);
        assert!(reply.feedback.unwrap().is_error());
    }

    #[test]
    fn cancel_in_header_flow_cleans_preview() {
        let (tmp, mut ctrl, _) = controller(MockBackend::with_dimensions(1, 1));
        ctrl.dispatch(Action::NewPost);
        fs::write(tmp.path().join("temp/leftover.html"), "x").unwrap();

        assert_eq!(ctrl.dispatch(Action::Cancel).next, Screen::Start);
        assert!(!tmp.path().join("temp/leftover.html").exists());
        assert!(tmp.path().join("temp").is_dir());
    }

    #[test]
    fn cancel_in_image_flow_returns_to_menu() {
        let (_tmp, mut ctrl, _) = with_post();
        ctrl.dispatch(Action::AddImage);
        assert_eq!(ctrl.dispatch(Action::Cancel).next, Screen::Menu);
        assert!(ctrl.services().paths.preview_document().is_file());
    }

    fn exported_keeping_preview(after_end: AfterEnd) -> (tempfile::TempDir, ProjectPaths) {
        let (tmp, paths) = test_project();
        let source = tmp.path().join("h.jpg");
        fs::write(&source, b"x").unwrap();
        let mut config = SiteConfig::default();
        config.session.clean_preview_on_export = false;
        config.session.after_end = after_end;
        let mut ctrl = Controller::with_backend(
            paths.clone(),
            &config,
            MockBackend::with_dimensions(2000, 1000),
        );
        for action in [
            Action::Start,
            Action::ChooseFile(Some(source)),
            Action::SubmitHeader(header_form()),
            Action::Navigate(Screen::Export),
            Action::ConfirmExport,
        ] {
            ctrl.dispatch(action);
        }
        (tmp, paths)
    }

    #[test]
    fn start_does_not_resume_finished_export() {
        let (_tmp, paths) = exported_keeping_preview(AfterEnd::Finish);
        let mut config = SiteConfig::default();
        config.session.clean_preview_on_export = false;
        let mut later =
            Controller::with_backend(paths, &config, MockBackend::with_dimensions(1, 1));

        let reply = later.dispatch(Action::Start);
        assert_eq!(reply.next, Screen::FileChooser);
        assert!(!reply.feedback.unwrap().is_error());
        assert_eq!(later.services().html.state(), SessionState::NotStarted);
        assert_eq!(later.session().flow, Flow::Header);
    }

    #[test]
    fn keep_open_resumes_closed_export() {
        let (_tmp, paths) = exported_keeping_preview(AfterEnd::KeepOpen);
        let mut config = SiteConfig::default();
        config.session.after_end = AfterEnd::KeepOpen;
        let mut later =
            Controller::with_backend(paths, &config, MockBackend::with_dimensions(1, 1));

        assert_eq!(later.dispatch(Action::Start), Reply::go(Screen::Menu));
        assert_eq!(later.services().html.state(), SessionState::Started);
    }

    #[test]
    fn header_form_requires_all_fields() {
        let (_tmp, mut ctrl, source) = controller(MockBackend::with_dimensions(2000, 1000));
        ctrl.dispatch(Action::Start);
        ctrl.dispatch(Action::ChooseFile(Some(source)));

        let reply = ctrl.dispatch(Action::SubmitHeader(HeaderForm {
            author: "   ".into(),
            ..header_form()
        }));
        assert_eq!(reply.next, Screen::Header);
        assert_eq!(
            reply.feedback,
            Some(Feedback::Error(ValidationError::MissingHeaderFields.to_string()))
        );
        // Validation happens before the image is touched
        assert!(ctrl.services().images.backend().get_operations().is_empty());
    }

    #[test]
    fn header_form_defaults_date_to_today() {
        let meta = HeaderForm {
            date: None,
            ..header_form()
        }
        .validate()
        .unwrap();
        assert_eq!(meta.date, chrono::Local::now().format("%d/%m/%y").to_string());
        assert_eq!(meta.date.len(), 8);
    }

    #[test]
    fn header_form_trims_fields() {
        let meta = HeaderForm {
            title: "  Le port  ".into(),
            ..header_form()
        }
        .validate()
        .unwrap();
        assert_eq!(meta.title, "Le port");
    }

    #[test]
    fn header_image_error_is_reported_on_header_screen() {
        let (_tmp, mut ctrl, source) = controller(MockBackend::undecodable());
        ctrl.dispatch(Action::Start);
        ctrl.dispatch(Action::ChooseFile(Some(source)));

        let reply = ctrl.dispatch(Action::SubmitHeader(header_form()));
        assert_eq!(reply.next, Screen::Header);
        assert!(reply.feedback.unwrap().message().contains("Invalid image"));
        assert_eq!(ctrl.services().html.state(), SessionState::NotStarted);
    }

    #[test]
    fn full_header_flow_writes_documents() {
        let (_tmp, ctrl, _) = with_post();
        let html = preview_html(&ctrl);
        assert!(html.contains("<h1>Le port</h1>"));
        assert!(html.contains("url('img/head_"));
        assert_eq!(ctrl.session().selected_file, None);
    }

    #[test]
    fn text_screens_append_and_return_to_menu() {
        let (_tmp, mut ctrl, _) = with_post();

        ctrl.dispatch(Action::Navigate(Screen::SectionHeading));
        assert_eq!(
            ctrl.dispatch(Action::SubmitHeading("  Partie 1 ".into())),
            Reply::go(Screen::Menu)
        );
        ctrl.dispatch(Action::Navigate(Screen::Text));
        ctrl.dispatch(Action::SubmitText("a\nb".into()));
        ctrl.dispatch(Action::Navigate(Screen::Quote));
        ctrl.dispatch(Action::SubmitQuote("citation".into()));

        let html = preview_html(&ctrl);
        assert!(html.contains("<h2 class=\"section-heading\">Partie 1</h2>"));
        assert!(html.contains("a<br>"));
        assert!(html.contains("<blockquote>citation</blockquote>"));
    }

    #[test]
    fn empty_text_is_rejected() {
        let (_tmp, mut ctrl, _) = with_post();
        ctrl.dispatch(Action::Navigate(Screen::Text));
        let reply = ctrl.dispatch(Action::SubmitText(String::new()));
        assert_eq!(reply.next, Screen::Text);
        assert_eq!(reply.feedback, Some(Feedback::Error("Enter some text".into())));

        ctrl.dispatch(Action::Back);
        ctrl.dispatch(Action::Navigate(Screen::SectionHeading));
        let reply = ctrl.dispatch(Action::SubmitHeading("   ".into()));
        assert_eq!(reply.next, Screen::SectionHeading);
    }

    #[test]
    fn text_without_post_reports_builder_error() {
        let (_tmp, paths) = test_project();
        let mut services = Services {
            images: ImagePipeline::with_backend(paths.clone(), MockBackend::with_dimensions(1, 1)),
            html: HtmlBuilder::new(paths.clone(), "S"),
            paths,
            clean_preview_on_export: true,
        };
        let reply = text(
            &mut services,
            &mut Session::default(),
            Action::SubmitText("orphan".into()),
        );
        assert_eq!(reply.next, Screen::Text);
        assert!(reply.feedback.unwrap().message().contains("not started"));
    }

    #[test]
    fn image_flow_adds_image_block() {
        let (_tmp, mut ctrl, source) = with_post();
        assert_eq!(ctrl.dispatch(Action::AddImage).next, Screen::FileChooser);
        assert_eq!(
            ctrl.dispatch(Action::ChooseFile(Some(source))).next,
            Screen::Image
        );
        let reply = ctrl.dispatch(Action::SubmitImage(ImageForm {
            alt: "quai".into(),
            caption: "Le quai au matin".into(),
        }));
        assert_eq!(reply, Reply::go(Screen::Menu));

        let html = preview_html(&ctrl);
        assert!(html.contains("src=\"img/img_"));
        assert!(html.contains("Le quai au matin"));

        let writes: Vec<_> = ctrl
            .services()
            .images
            .backend()
            .get_operations()
            .into_iter()
            .filter(|op| matches!(op, RecordedOp::Write { width: 778, .. }))
            .collect();
        assert_eq!(writes.len(), 2);
    }

    #[test]
    fn too_small_image_keeps_user_on_image_screen() {
        let (tmp, paths) = test_project();
        let source = tmp.path().join("small.png");
        fs::write(&source, b"x").unwrap();
        let mut ctrl =
            Controller::with_backend(paths, &SiteConfig::default(), MockBackend::with_dimensions(777, 514));
        ctrl.dispatch(Action::Start);
        ctrl.dispatch(Action::ChooseFile(Some(source.clone())));
        ctrl.dispatch(Action::SubmitHeader(header_form()));
        ctrl.dispatch(Action::AddImage);
        ctrl.dispatch(Action::ChooseFile(Some(source)));

        let reply = ctrl.dispatch(Action::SubmitImage(ImageForm {
            alt: "a".into(),
            caption: "c".into(),
        }));
        assert_eq!(reply.next, Screen::Image);
        assert!(reply.feedback.unwrap().message().contains("777x514"));
        assert!(ctrl.session().selected_file.is_some());
    }

    #[test]
    fn image_form_requires_alt_and_caption() {
        assert_eq!(
            ImageForm {
                alt: "a".into(),
                caption: " ".into()
            }
            .validate(),
            Err(ValidationError::MissingImageFields)
        );
    }

    #[test]
    fn preview_reports_file_url() {
        let (tmp, mut ctrl, _) = with_post();
        ctrl.dispatch(Action::Navigate(Screen::Preview));
        let reply = ctrl.dispatch(Action::ShowPreview);

        assert_eq!(reply.next, Screen::Menu);
        let message = reply.feedback.unwrap();
        assert!(!message.is_error());
        assert!(message.message().starts_with("file://"));
        assert!(message.message().ends_with("temp/post.html"));
        assert!(message.message().contains(&*tmp.path().to_string_lossy()));
    }

    #[test]
    fn export_finishes_and_cleans_preview() {
        let (_tmp, mut ctrl, _) = with_post();
        ctrl.dispatch(Action::Navigate(Screen::Export));
        let reply = ctrl.dispatch(Action::ConfirmExport);

        assert_eq!(reply.next, Screen::Start);
        assert!(reply.feedback.unwrap().message().starts_with("Export finished"));
        let paths = &ctrl.services().paths;
        assert!(!paths.preview_document().exists());
        let export = fs::read_to_string(paths.export_document()).unwrap();
        assert!(export.trim_end().ends_with("</html>"));
        assert_eq!(ctrl.services().html.state(), SessionState::Finished);
    }

    #[test]
    fn export_keeps_preview_when_configured() {
        let (tmp, paths) = test_project();
        let source = tmp.path().join("h.jpg");
        fs::write(&source, b"x").unwrap();
        let mut config = SiteConfig::default();
        config.session.clean_preview_on_export = false;
        config.session.after_end = AfterEnd::Finish;
        let mut ctrl =
            Controller::with_backend(paths, &config, MockBackend::with_dimensions(2000, 1000));

        for action in [
            Action::Start,
            Action::ChooseFile(Some(source)),
            Action::SubmitHeader(header_form()),
            Action::Navigate(Screen::Export),
            Action::ConfirmExport,
        ] {
            assert!(!ctrl.dispatch(action).feedback.is_some_and(|f| f.is_error()));
        }
        assert!(ctrl.services().paths.preview_document().is_file());
    }

    #[test]
    fn start_after_export_begins_new_post() {
        let (_tmp, mut ctrl, _) = with_post();
        ctrl.dispatch(Action::Navigate(Screen::Export));
        ctrl.dispatch(Action::ConfirmExport);

        // The preview document was cleaned, so there is nothing to resume
        assert_eq!(ctrl.dispatch(Action::Start).next, Screen::FileChooser);
        assert_eq!(ctrl.session(), &Session::default());
    }
}
