//! tokensift - Fuzzy search over design tokens for launcher workflows
//!
//! tokensift provides:
//! - Three-tier fuzzy ranking of token names
//! - Opportunistic remote sync with backup-before-overwrite
//! - Per-token color icons and an offline icon renderer
//! - Launcher output as a single `{"items": [...]}` JSON object

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cache;
mod cli;
mod core;
mod error;
mod icons;
mod search;
mod store;
mod sync;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // stdout carries the JSON result; diagnostics go to stderr
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    cli::run(cli)
}
