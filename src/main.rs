use clap::{Parser, Subcommand};
use postpress::controller::{Action, Controller, HeaderForm, ImageForm, Screen};
use postpress::paths::ProjectPaths;
use postpress::status::ProjectStatus;
use postpress::{cleanup, config, output};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "postpress")]
#[command(about = "Compose a blog post and export it as static HTML")]
#[command(long_about = "\
Compose a blog post and export it as static HTML

Every command writes the same content to two documents: a preview that opens
straight from disk, and the export that goes to the live site.

Project layout:

  <root>/
  ├── postpress.toml        # Optional configuration
  ├── needs/                # Bundled CSS/JS for the preview
  ├── temp/post.html        # Preview (+ temp/img/)
  └── exp/post/post.html    # Export (+ exp/img/head_p/, exp/img/post/)

Typical session:

  postpress start --page-title Balade --title 'Le port' --subtitle 'Un matin' \\
                  --author Camille --header ~/photos/port.jpg
  postpress heading 'Le quai'
  postpress paragraph \"$(cat notes.txt)\"
  postpress image ~/photos/quai.png --alt quai --caption 'Le quai au matin'
  postpress preview
  postpress export

Run 'postpress gen-config' to generate a documented postpress.toml.")]
#[command(version)]
struct Cli {
    /// Project root (default: parent of the directory holding the executable)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Show debug events on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the temp/ and exp/ directory trees
    Init,
    /// Start a new post from a header image (replaces any post in progress)
    Start {
        #[arg(long)]
        page_title: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        subtitle: String,
        #[arg(long)]
        author: String,
        /// Header image (.jpg, .jpeg, .png, .webp)
        #[arg(long)]
        header: PathBuf,
        /// Publication date shown under the title (default: today, dd/mm/yy)
        #[arg(long)]
        date: Option<String>,
    },
    /// Append a section title
    Heading { text: String },
    /// Append a paragraph; line breaks are kept
    Paragraph { text: String },
    /// Append a quote
    Quote { text: String },
    /// Append an image (at least 778x514)
    Image {
        path: PathBuf,
        /// Alternative text
        #[arg(long)]
        alt: String,
        #[arg(long)]
        caption: String,
    },
    /// Print the file:// URL of the preview document
    Preview,
    /// Close the post and clean the preview
    Export,
    /// Show the state of the project
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove everything inside temp/
    Clean,
    /// Print a stock postpress.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("postpress=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let paths = match cli.root {
        Some(root) => ProjectPaths::from_root(root),
        None => ProjectPaths::discover()?,
    };
    let site_config = config::load_config(paths.root())?;

    match cli.command {
        Command::Init => {
            paths.ensure_dirs()?;
            output::print_init(&paths);
        }
        Command::Status { json } => {
            let status = ProjectStatus::collect(&paths);
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                output::print_status(&status);
            }
        }
        Command::Clean => {
            output::print_clean(cleanup::clean_preview(&paths));
        }
        Command::Start {
            page_title,
            title,
            subtitle,
            author,
            header,
            date,
        } => {
            let mut controller = Controller::new(paths, &site_config);
            let form = HeaderForm {
                page_title,
                title,
                subtitle,
                author,
                date,
            };
            drive(
                &mut controller,
                [
                    Action::NewPost,
                    Action::ChooseFile(Some(header)),
                    Action::SubmitHeader(form),
                ],
            )?;
            println!(
                "Started post: {}",
                controller.services().paths.preview_document().display()
            );
        }
        command => {
            let mut controller = Controller::new(paths, &site_config);
            open_menu(&mut controller)?;
            drive(&mut controller, menu_actions(command))?;
        }
    }

    Ok(())
}

/// Actions that follow the menu for the content commands.
fn menu_actions(command: Command) -> Vec<Action> {
    match command {
        Command::Heading { text } => vec![
            Action::Navigate(Screen::SectionHeading),
            Action::SubmitHeading(text),
        ],
        Command::Paragraph { text } => {
            vec![Action::Navigate(Screen::Text), Action::SubmitText(text)]
        }
        Command::Quote { text } => {
            vec![Action::Navigate(Screen::Quote), Action::SubmitQuote(text)]
        }
        Command::Image { path, alt, caption } => vec![
            Action::AddImage,
            Action::ChooseFile(Some(path)),
            Action::SubmitImage(ImageForm { alt, caption }),
        ],
        Command::Preview => vec![Action::Navigate(Screen::Preview), Action::ShowPreview],
        Command::Export => vec![Action::Navigate(Screen::Export), Action::ConfirmExport],
        Command::Init
        | Command::Start { .. }
        | Command::Status { .. }
        | Command::Clean
        | Command::GenConfig => Vec::new(),
    }
}

/// Resume the post in progress, or fail when there is none.
fn open_menu(controller: &mut Controller) -> Result<(), Box<dyn Error>> {
    drive(controller, [Action::Start])?;
    if controller.screen() != Screen::Menu {
        return Err("no post in progress; run `postpress start` first".into());
    }
    Ok(())
}

/// Dispatch `actions` in order. Info feedback is printed; the first error
/// stops the sequence.
fn drive(
    controller: &mut Controller,
    actions: impl IntoIterator<Item = Action>,
) -> Result<(), Box<dyn Error>> {
    for action in actions {
        let reply = controller.dispatch(action);
        match reply.feedback {
            Some(feedback) if feedback.is_error() => return Err(feedback.message().into()),
            Some(feedback) => output::print_feedback(&feedback),
            None => {}
        }
    }
    Ok(())
}
