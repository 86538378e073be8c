//! Polyglot CLI - multilingual static page generator.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use polyglot_content::{LanguageCode, PageKind};
use polyglot_static::Selection;

mod commands;

#[derive(Parser)]
#[command(name = "polyglot")]
#[command(about = "Multilingual static page generator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root; relative paths resolve against it. Defaults to the
    /// nearest directory holding the config or the translations.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Path to site.toml config file
    #[arg(short, long, default_value = "site.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default site.toml
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        yes: bool,
    },

    /// Generate every page kind
    Build {
        /// Only this language
        #[arg(long)]
        lang: Option<LanguageCode>,

        /// Only this page id
        #[arg(long)]
        page: Option<String>,

        /// Only these page kinds
        #[arg(long = "type", value_enum)]
        kinds: Vec<KindArg>,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate articles
    Articles {
        /// Only this language
        #[arg(long)]
        lang: Option<LanguageCode>,

        /// Only this article id
        #[arg(long)]
        article: Option<String>,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate backbone pages
    Backbone {
        /// Only this language
        #[arg(long)]
        lang: Option<LanguageCode>,

        /// Only this page id
        #[arg(long)]
        page: Option<String>,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate update posts, the FAQ and the contact page
    Pages {
        /// Only this language
        #[arg(long)]
        lang: Option<LanguageCode>,

        /// Only this page id
        #[arg(long)]
        page: Option<String>,

        /// Only these page kinds
        #[arg(long = "type", value_enum)]
        kinds: Vec<PagesArg>,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Article,
    Backbone,
    Updates,
    Faq,
    Contact,
}

impl From<KindArg> for PageKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Article => PageKind::Article,
            KindArg::Backbone => PageKind::Backbone,
            KindArg::Updates => PageKind::Update,
            KindArg::Faq => PageKind::Faq,
            KindArg::Contact => PageKind::Contact,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PagesArg {
    Updates,
    Faq,
    Contact,
}

impl From<PagesArg> for PageKind {
    fn from(arg: PagesArg) -> Self {
        match arg {
            PagesArg::Updates => PageKind::Update,
            PagesArg::Faq => PageKind::Faq,
            PagesArg::Contact => PageKind::Contact,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Execute the command. `Ok(false)` means some variant failed.
fn run(cli: Cli) -> Result<bool> {
    let root = match cli.root {
        Some(root) => root,
        None => {
            let cwd = std::env::current_dir().context("Failed to read the current directory")?;
            commands::discover_root(&cwd, &cli.config)
        }
    };
    tracing::debug!("Project root: {}", root.display());

    let (selection, force) = match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&root, &cli.config, yes)?;
            return Ok(true);
        }
        Commands::Build {
            lang,
            page,
            kinds,
            force,
        } => {
            let kinds = kinds.into_iter().map(PageKind::from).collect();
            (Selection { lang, page, kinds }, force)
        }
        Commands::Articles {
            lang,
            article,
            force,
        } => {
            let kinds = vec![PageKind::Article];
            (
                Selection {
                    lang,
                    page: article,
                    kinds,
                },
                force,
            )
        }
        Commands::Backbone { lang, page, force } => {
            let kinds = vec![PageKind::Backbone];
            (Selection { lang, page, kinds }, force)
        }
        Commands::Pages {
            lang,
            page,
            kinds,
            force,
        } => {
            let kinds = if kinds.is_empty() {
                vec![PageKind::Update, PageKind::Faq, PageKind::Contact]
            } else {
                kinds.into_iter().map(PageKind::from).collect()
            };
            (Selection { lang, page, kinds }, force)
        }
    };

    commands::build::run(&root, &cli.config, selection, force)
}
