use std::{path::PathBuf, sync::Arc};

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use cloudcast::{
    cli,
    config::{self, UploadSettings},
    error,
    reporter::{ConsoleReporter, Reporter},
    types::{DateParts, UploadOptions},
    utils, warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Mixcloud and cache the access token
    Auth,

    /// Delete the cached access token
    Logout,

    /// Upload a show recording
    Upload(UploadArgs),

    /// List shows from the metadata catalog
    Shows(ShowsOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct UploadArgs {
    /// Audio file to upload
    pub file: PathBuf,

    /// Show title, matched against the catalog (defaults to the file name)
    #[clap(long)]
    pub title: Option<String>,

    /// Host name, overrides the catalog entry
    #[clap(long)]
    pub host: Option<String>,

    /// Comma-separated tags, override the catalog entry
    #[clap(long)]
    pub tags: Option<String>,

    /// Broadcast day
    #[clap(long)]
    pub day: Option<String>,

    /// Broadcast month
    #[clap(long)]
    pub month: Option<String>,

    /// Broadcast year
    #[clap(long)]
    pub year: Option<String>,

    /// Cover image, skips the image directory lookup
    #[clap(long)]
    pub picture: Option<PathBuf>,

    /// Print the resolved request without uploading
    #[clap(long)]
    pub dry_run: bool,
}

impl UploadArgs {
    fn options(&self) -> UploadOptions {
        let date = match (&self.day, &self.month, &self.year) {
            (Some(day), Some(month), Some(year)) => Some(DateParts {
                day: day.clone(),
                month: month.clone(),
                year: year.clone(),
            }),
            _ => None,
        };

        UploadOptions {
            title: self.title.clone(),
            host: self.host.clone(),
            tags: self.tags.as_deref().map(utils::parse_tag_list),
            date,
            picture: self.picture.clone(),
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct ShowsOptions {
    /// Show only the best fuzzy match for this name
    #[clap(long)]
    pub search: Option<String>,

    /// Print JSON instead of a table
    #[clap(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn reporter() -> Arc<dyn Reporter> {
    let log_file = match UploadSettings::from_env() {
        Ok(settings) => settings.log_file,
        Err(e) => error!("Invalid configuration: {}", e),
    };

    match log_file {
        Some(path) => match ConsoleReporter::with_log_file(&path) {
            Ok(reporter) => Arc::new(reporter),
            Err(e) => {
                warning!("Cannot open log file {}: {}", path.display(), e);
                Arc::new(ConsoleReporter::new())
            }
        },
        None => Arc::new(ConsoleReporter::new()),
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => cli::auth(reporter()).await,
        Command::Logout => cli::logout().await,
        Command::Upload(args) => {
            let options = args.options();
            cli::upload(args.file, options, args.dry_run, reporter()).await
        }
        Command::Shows(opt) => cli::shows(opt.search, opt.json, reporter()).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
