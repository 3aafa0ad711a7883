#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays FiveTwelve in the terminal.

mod session;

use std::{fs, io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use fivetwelve_board::{Board, Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::session::Session;

#[derive(Parser, Debug)]
#[command(name = "fivetwelve", about = "Slide and merge tiles on a grid.")]
struct Args {
    /// Optional TOML file with `rows`, `columns` and `seed`.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of rows; overrides the configuration file.
    #[arg(long)]
    rows: Option<usize>,
    /// Number of columns; overrides the configuration file.
    #[arg(long)]
    columns: Option<usize>,
    /// Seed for tile placement; overrides the configuration file.
    #[arg(long)]
    seed: Option<u64>,
    /// Tracing filter used when RUST_LOG is unset, e.g. "info", "debug".
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Entry point for the FiveTwelve command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = resolve_config(&args)?;
    info!(rows = config.rows, columns = config.columns, seed = ?config.seed, "starting game");

    let mut session = Session::new(Board::from_config(&config));
    let summary = session.run(io::stdin().lock(), io::stdout().lock())?;
    println!(
        "Final score: {} after {} moves ({:?})",
        summary.score, summary.sweeps, summary.state
    );
    Ok(())
}

fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            parse_config(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => Config::default(),
    };
    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(columns) = args.columns {
        config.columns = columns;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    Ok(config)
}

fn parse_config(text: &str) -> Result<Config> {
    Ok(toml::from_str(text)?)
}
