//! # cinematch CLI
//!
//! ## Usage
//!
//! ```bash
//! cinematch --config ./config/cinematch.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `cinematch recommend "<title>"` | Print movies similar to a title |
//! | `cinematch stats` | Print corpus and model statistics |
//! | `cinematch serve` | Start the JSON HTTP API |
//!
//! Every command builds the recommender from the configured corpus first;
//! build progress goes to stderr.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use cinematch::progress::ProgressMode;
use cinematch::recommend_cmd::Outcome;
use cinematch::{config, engine, recommend_cmd, server, stats};

/// cinematch — content-based movie recommendations.
#[derive(Parser)]
#[command(
    name = "cinematch",
    about = "cinematch — content-based movie recommendations from overview text",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/cinematch.toml")]
    config: PathBuf,

    /// Build progress on stderr. Defaults to `human` on a TTY, else `off`.
    #[arg(long, global = true, value_enum)]
    progress: Option<ProgressMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies similar to a title.
    ///
    /// The title match is case-insensitive but otherwise exact.
    Recommend {
        /// Title of a movie in the corpus.
        title: String,

        /// Number of recommendations (defaults to `[recommend].default_top_n`).
        #[arg(long)]
        top_n: Option<usize>,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print corpus and model statistics.
    Stats {
        /// Print stats as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP API on `[server].bind`.
    Serve,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    let cfg = config::load_config(&cli.config)?;
    let mode = cli.progress.unwrap_or_else(ProgressMode::default_for_tty);
    let reporter = mode.reporter();

    // Single O(n²·d) build; everything after this is read-only.
    let recommender = engine::build_recommender(&cfg, reporter.as_ref())?;

    match cli.command {
        Commands::Recommend { title, top_n, json } => {
            let top_n = top_n.unwrap_or(cfg.recommend.default_top_n);
            match recommend_cmd::run_recommend(&recommender, &title, top_n, json)? {
                Outcome::Found(_) => {}
                Outcome::NotFound => return Ok(ExitCode::from(1)),
            }
        }
        Commands::Stats { json } => {
            stats::run_stats(&recommender, json)?;
        }
        Commands::Serve => {
            server::run_server(&cfg, Arc::new(recommender)).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
