use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use cite_finder::config::{default_config_path, find_config_file, load_config, Config};
use cite_finder::models::{SearchMode, SearchRequest, SourceKind};
use cite_finder::ui::{self, Status};
use cite_finder::utils::{Clipboard, SystemClipboard};
use cite_finder::{Resolver, SourceRegistry};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Cite Finder - Turn a DOI, PubMed ID, arXiv ID or title into a short citation string
#[derive(Parser, Debug)]
#[command(name = "cite-finder")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Resolve a search term to a one-line citation via PubMed, Crossref, arXiv or Google Scholar", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Do not copy the result to the clipboard
    #[arg(long, global = true)]
    no_copy: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available literature databases
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Source {
    #[value(name = "pubmed")]
    Pubmed,
    #[value(name = "crossref")]
    Crossref,
    #[value(name = "arxiv")]
    Arxiv,
    #[value(name = "google_scholar", alias = "scholar")]
    GoogleScholar,
}

impl From<Source> for SourceKind {
    fn from(source: Source) -> Self {
        match source {
            Source::Pubmed => SourceKind::PubMed,
            Source::Crossref => SourceKind::Crossref,
            Source::Arxiv => SourceKind::Arxiv,
            Source::GoogleScholar => SourceKind::GoogleScholar,
        }
    }
}

/// Options shared by every search command
#[derive(Args, Debug, Clone, Copy)]
struct SearchOptions {
    /// Database to search (default: `search.default_source` from the config, else pubmed)
    #[arg(long, short, value_enum)]
    source: Option<Source>,

    /// Rank the first ten results by title similarity instead of taking the first
    #[arg(long, short)]
    exact: bool,
}

impl SearchOptions {
    fn source(&self, config: &Config) -> SourceKind {
        self.source
            .map(SourceKind::from)
            .unwrap_or(config.search.default_source)
    }

    fn mode(&self, config: &Config) -> SearchMode {
        if self.exact {
            SearchMode::Exact
        } else {
            config.search.mode()
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search for a term: a PubMed ID, a DOI, an arXiv ID or keywords
    #[command(alias = "s")]
    Search {
        /// Search term; several words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,

        #[command(flatten)]
        options: SearchOptions,
    },

    /// Search for the text currently on the clipboard
    #[command(alias = "c")]
    Clipboard {
        #[command(flatten)]
        options: SearchOptions,
    },

    /// Search by a PDF's file name
    #[command(alias = "f")]
    File {
        /// Path to the PDF
        path: PathBuf,

        #[command(flatten)]
        options: SearchOptions,
    },

    /// List supported sources
    Sources,

    /// Show the effective configuration
    Config {
        /// Write the default configuration to the user config directory
        #[arg(long)]
        init: bool,

        /// Overwrite an existing file with --init
        #[arg(long, requires = "init")]
        force: bool,

        /// List the environment variables that override the config file
        #[arg(long, conflicts_with = "init")]
        env: bool,
    },
}

/// Print the supported environment variables
fn print_env_vars() {
    println!("Environment Variables:");
    println!();
    println!("  CITE_FINDER_SEARCH__DEFAULT_SOURCE          pubmed, crossref, arxiv or google_scholar");
    println!("  CITE_FINDER_SEARCH__EXACT                   Rank by title similarity (true/false)");
    println!("  CITE_FINDER_SEARCH__COPY_TO_CLIPBOARD       Copy found citations (default: true)");
    println!("  CITE_FINDER_HTTP__TIMEOUT_SECONDS           Request timeout (default: 30)");
    println!("  CITE_FINDER_HTTP__CONNECT_TIMEOUT_SECONDS   Connect timeout (default: 10)");
    println!("  CITE_FINDER_HTTP__USER_AGENT                User-Agent header");
    println!("  CITE_FINDER_ENDPOINTS__PUBMED               PubMed E-utilities base URL");
    println!("  CITE_FINDER_ENDPOINTS__CROSSREF             Crossref API base URL");
    println!("  CITE_FINDER_ENDPOINTS__ARXIV                arXiv API query URL");
    println!("  CITE_FINDER_ENDPOINTS__GOOGLE_SCHOLAR       Google Scholar search page URL");
    println!("  CITE_FINDER_LOGGING__LEVEL                  Log level (default: warn)");
    println!();
    println!("Other Settings:");
    println!("  RUST_LOG                    Rust logging level (e.g., debug, info, warn, error)");
}

fn init_tracing(cli: &Cli, config_level: &str) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config_level,
            1 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("cite_finder={}", level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Open the desktop clipboard, logging instead of failing when there is none
fn open_clipboard() -> Option<SystemClipboard> {
    match SystemClipboard::new() {
        Ok(clipboard) => Some(clipboard),
        Err(e) => {
            tracing::warn!("{}", e);
            None
        }
    }
}

/// Build a request from the subcommand, reading the clipboard if asked to
fn build_request(command: &Commands, config: &Config) -> Result<Option<SearchRequest>> {
    let (request, options) = match command {
        Commands::Search { term, options } => {
            (SearchRequest::new(term.join(" "), options.source(config)), options)
        }
        Commands::Clipboard { options } => {
            let clipboard = SystemClipboard::new().context("Cannot read the clipboard")?;
            let text = clipboard.read().context("Cannot read the clipboard")?;
            let term = text.trim();
            if term.is_empty() {
                bail!("The clipboard does not contain any text");
            }
            (SearchRequest::new(term, options.source(config)), options)
        }
        Commands::File { path, options } => {
            let is_pdf = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
            if !is_pdf {
                bail!("Only PDF files can be searched by name: {}", path.display());
            }
            (
                SearchRequest::from_dropped_file(path, options.source(config)),
                options,
            )
        }
        Commands::Sources | Commands::Config { .. } => return Ok(None),
    };

    Ok(Some(request.mode(options.mode(config))))
}

async fn run_search(cli: &Cli, config: &Config, request: SearchRequest) -> Result<ExitCode> {
    let registry =
        SourceRegistry::from_config(config).context("Failed to create the HTTP client")?;
    let mut resolver = Resolver::new(registry);

    let copy = config.search.copy_to_clipboard && !cli.no_copy;
    if copy {
        if let Some(clipboard) = open_clipboard() {
            resolver = resolver.with_clipboard(Box::new(clipboard));
        }
    }

    if !cli.quiet {
        ui::print_status(
            Status::Info,
            &format!("Searching {} for {:?}", request.source, request.raw_term),
        );
    }

    let resolution = resolver.search(&request).await;
    ui::print_resolution(&resolution, cli.quiet);

    Ok(if resolution.is_found() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_config(config: &Config, config_path: Option<&PathBuf>, init: bool, force: bool) -> Result<()> {
    if !init {
        if let Some(path) = config_path {
            eprintln!("# Loaded from {}", path.display());
        }
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let path = default_config_path().context("No user configuration directory on this system")?;
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    Config::default().save(&path)?;
    ui::print_status(
        Status::Success,
        &format!("Wrote default configuration to {}", path.display()),
    );
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = load_config(config_path.as_deref()).context("Failed to load configuration")?;
    if let Some(timeout) = cli.timeout {
        config.http.timeout_seconds = timeout;
    }

    init_tracing(&cli, &config.logging.level);
    if let Some(path) = &config_path {
        tracing::debug!("Using config file: {}", path.display());
    }

    match &cli.command {
        Commands::Sources => {
            ui::print_sources(&SourceRegistry::from_config(&config)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config { init, force, env } => {
            if *env {
                print_env_vars();
            } else {
                run_config(&config, config_path.as_ref(), *init, *force)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        command => match build_request(command, &config)? {
            Some(request) => {
                tracing::debug!("Request: {:?}", request);
                run_search(&cli, &config, request).await
            }
            None => Ok(ExitCode::SUCCESS),
        },
    }
}
