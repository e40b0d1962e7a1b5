//! # Recipe Index CLI (`recipe-index`)
//!
//! ## Usage
//!
//! ```bash
//! recipe-index [--config ./config/recipes.toml] <command>
//! ```
//!
//! | Command | Description |
//! |---------|-------------|
//! | `recipe-index ingest [ROOT]` | Build every record under ROOT and POST the batch |
//! | `recipe-index inspect <FILE>` | Print the record built from one file |
//!
//! ## Examples
//!
//! ```bash
//! # Publish to a local index
//! recipe-index ingest ./dishes --url http://localhost:7700
//!
//! # See what would be sent
//! recipe-index ingest ./dishes --dry-run
//!
//! # Random ids instead of title hashes
//! recipe-index ingest ./dishes --id-mode random
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=recipe_index=debug` for per-file output.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recipe_index::config::{self, Config};
use recipe_index::identity::IdMode;
use recipe_index::ingest::{self, IngestOptions};

const DEFAULT_CONFIG_PATH: &str = "./config/recipes.toml";

/// Recipe Index: Markdown recipes → search index documents.
#[derive(Parser)]
#[command(
    name = "recipe-index",
    about = "Convert a tree of Markdown recipes into JSON records and publish them to a search index",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/recipes.toml` when that file exists; otherwise
    /// built-in defaults are used.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one record per Markdown file and publish the batch.
    ///
    /// Prints the index's JSON response to stdout.
    Ingest {
        /// Directory to scan (defaults to `source.root`).
        root: Option<PathBuf>,

        /// Base URL of the search service (e.g. `http://localhost:7700`).
        #[arg(long)]
        url: Option<String>,

        /// Index uid; documents go to `indexes/<uid>/documents`.
        #[arg(long)]
        index: Option<String>,

        /// How record ids are assigned.
        #[arg(long, value_enum)]
        id_mode: Option<IdMode>,

        /// Print the records without publishing them.
        #[arg(long)]
        dry_run: bool,

        /// Print the records before publishing them.
        #[arg(long)]
        print_records: bool,
    },

    /// Print the record built from a single Markdown file.
    Inspect {
        /// Markdown file to convert.
        file: PathBuf,

        /// How the record id is assigned.
        #[arg(long, value_enum)]
        id_mode: Option<IdMode>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipe_index=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut cfg = config::resolve_config(cli.config.as_deref(), Path::new(DEFAULT_CONFIG_PATH))?;

    match cli.command {
        Commands::Ingest {
            root,
            url,
            index,
            id_mode,
            dry_run,
            print_records,
        } => {
            apply_overrides(&mut cfg, url, index, id_mode)?;
            let options = IngestOptions {
                root,
                dry_run,
                print_records,
            };
            ingest::run_ingest(&cfg, &options).await?;
        }
        Commands::Inspect { file, id_mode } => {
            apply_overrides(&mut cfg, None, None, id_mode)?;
            ingest::run_inspect(&cfg, &file)?;
        }
    }

    Ok(())
}

fn apply_overrides(
    cfg: &mut Config,
    url: Option<String>,
    index: Option<String>,
    id_mode: Option<IdMode>,
) -> anyhow::Result<()> {
    if let Some(url) = url {
        cfg.index.url = url;
    }
    if let Some(uid) = index {
        cfg.index.uid = uid;
    }
    if let Some(mode) = id_mode {
        cfg.ids.mode = mode;
    }
    config::validate(cfg)
}
