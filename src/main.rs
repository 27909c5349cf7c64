//! # Diary Harness CLI (`diary`)
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `diary segment [PATH]` | Segment one OCR text file (or stdin) and print the segments |
//! | `diary resolve <LINE>` | Show the date a single header line resolves to |
//! | `diary ingest` | Scan the configured root, segment every page, and store the results |
//! | `diary list` | List stored segments, optionally filtered by date |
//! | `diary get <ID>` | Print a stored page with its segments |
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`
//! (e.g. `RUST_LOG=diary_harness=debug`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use diary_harness::config;
use diary_harness::ingest::{self, IngestOptions};
use diary_harness::list;
use diary_harness::segment_cmd::{self, OutputFormat};

/// Diary Harness — split OCR'd diary pages into per-day segments.
#[derive(Parser)]
#[command(
    name = "diary",
    about = "Diary Harness — split OCR'd diary pages into per-day segments",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Only `ingest`, `list`, and `get` need it; `segment` reads the
    /// fallback date from it when present.
    #[arg(long, global = true, default_value = "./config/diary.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment a single OCR text and print the segments.
    Segment {
        /// Input file. Reads stdin when omitted or `-`.
        path: Option<PathBuf>,

        /// Date (YYYY-MM-DD) for text before the first header; its year is
        /// used for headers written without one.
        #[arg(long)]
        fallback_date: Option<String>,

        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Resolve one line as a date header.
    ///
    /// Prints the ISO date, or `no date` when the line is not a header.
    Resolve {
        line: String,

        /// Year for month-name headers without one (defaults to the current year).
        #[arg(long)]
        year: Option<i32>,
    },

    /// Scan, segment, and store every page under `[scan].root`.
    Ingest {
        /// Re-segment pages even if their text is unchanged.
        #[arg(long)]
        full: bool,

        /// Show page and segment counts without writing the store.
        #[arg(long)]
        dry_run: bool,

        /// Only pages modified on or after this date (YYYY-MM-DD).
        #[arg(long)]
        since: Option<String>,

        /// Only pages modified on or before this date (YYYY-MM-DD).
        #[arg(long)]
        until: Option<String>,

        /// Maximum number of pages to process.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List stored segments.
    List {
        /// Only segments dated on or after this date (YYYY-MM-DD).
        #[arg(long)]
        since: Option<String>,

        /// Only segments dated on or before this date (YYYY-MM-DD).
        #[arg(long)]
        until: Option<String>,

        /// Only segments with no date.
        #[arg(long, conflicts_with_all = ["since", "until"])]
        undated: bool,
    },

    /// Print a stored page and its segments as JSON.
    Get {
        /// Page UUID.
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Commands that don't require config
    match &cli.command {
        Commands::Resolve { line, year } => {
            segment_cmd::run_resolve(line, *year);
            return Ok(());
        }
        Commands::Segment {
            path,
            fallback_date,
            format,
        } => {
            // Use config if available, otherwise a minimal default
            let cfg =
                config::load_config(&cli.config).unwrap_or_else(|_| config::Config::minimal());
            let fallback = fallback_date
                .clone()
                .or(cfg.segmentation.fallback_date);
            segment_cmd::run_segment(path.as_deref(), fallback.as_deref(), *format)?;
            return Ok(());
        }
        _ => {}
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Ingest {
            full,
            dry_run,
            since,
            until,
            limit,
        } => {
            let options = IngestOptions {
                full,
                dry_run,
                since,
                until,
                limit,
            };
            ingest::run_ingest(&cfg, &options).await?;
        }
        Commands::List {
            since,
            until,
            undated,
        } => {
            list::run_list(&cfg, since, until, undated).await?;
        }
        Commands::Get { id } => {
            list::run_get(&cfg, &id).await?;
        }
        Commands::Resolve { .. } | Commands::Segment { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
