//! CLI module - Command-line interface definitions and dispatch

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::config::{Config, DEFAULT_ICON_SIZE};
use crate::core::paths::default_data_dir;
use crate::core::render::RenderConfig;

/// tokensift - fuzzy search over design tokens for launcher workflows.
#[derive(Parser, Debug)]
#[command(name = "tokensift")]
#[command(
    author,
    version,
    about,
    long_about = r#"tokensift answers a single free-text query against a local set of design
tokens and prints one JSON object with an "items" array for a launcher to show.

Before searching it may check a remote source for a newer token document
(at most once per staleness window). Sync failures never affect the search.

Reserved query:
- update: force a download of the remote token document

Examples:
    tokensift                       # first 20 tokens
    tokensift primary               # fuzzy search
    tokensift update                # force a sync
    tokensift --generate-icons      # render PNG swatches for color tokens
    tokensift --status
"#
)]
pub struct Cli {
    /// Free-text query (omit for the first results in document order).
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Directory holding tokens.json, sync state and images/.
    #[arg(
        long,
        env = "TOKENSIFT_DATA_DIR",
        value_name = "DIR",
        long_help = "Directory holding tokens.json, its backup, the sync state files and the\n\
images/ icon directory.\n\n\
Defaults to the platform data directory (e.g. ~/.local/share/tokensift)."
    )]
    pub data_dir: Option<PathBuf>,

    /// Endpoint returning the remote version identifier.
    #[arg(long, env = "TOKENSIFT_VERSION_URL", value_name = "URL")]
    pub version_url: Option<String>,

    /// Endpoint returning the full remote token document.
    #[arg(
        long,
        env = "TOKENSIFT_DOCUMENT_URL",
        value_name = "URL",
        long_help = "Endpoint returning the full remote token document.\n\n\
Sync runs only when both --version-url and --document-url are set."
    )]
    pub document_url: Option<String>,

    /// Seconds between remote version checks.
    #[arg(long, env = "TOKENSIFT_STALE_AFTER", default_value = "3600", value_name = "SECS")]
    pub stale_after: u64,

    /// Minimum similarity for loose matches (0.0 - 1.0).
    #[arg(long, default_value = "0.2", value_name = "RATIO")]
    pub threshold: f64,

    /// Maximum number of results.
    #[arg(long, default_value = "20", value_name = "N")]
    pub max_results: usize,

    /// Skip the opportunistic sync before searching.
    #[arg(
        long,
        long_help = "Skip the opportunistic sync before searching. The reserved `update`\n\
query still forces a sync."
    )]
    pub no_sync: bool,

    /// Render icons for every color token instead of searching.
    #[arg(long, conflicts_with_all = ["query", "status"])]
    pub generate_icons: bool,

    /// Icon edge length in pixels (with --generate-icons).
    #[arg(long, default_value_t = DEFAULT_ICON_SIZE, value_name = "PX")]
    pub icon_size: u32,

    /// Output directory for icons (with --generate-icons, defaults to DIR/images).
    #[arg(long, value_name = "PATH")]
    pub icon_dir: Option<PathBuf>,

    /// Report sync state instead of searching.
    #[arg(long, conflicts_with = "query")]
    pub status: bool,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug diagnostics on stderr).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Assemble the runtime configuration
    pub fn config(&self) -> Config {
        let data_dir = self.data_dir.clone().unwrap_or_else(default_data_dir);
        let mut config = Config::new(data_dir)
            .with_remote(self.version_url.clone(), self.document_url.clone());
        config.stale_after = Duration::from_secs(self.stale_after);
        config.search.threshold = self.threshold;
        config.search.max_results = self.max_results;
        config.icon_size = self.icon_size;
        config
    }

    /// Default log filter directive for the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let config = cli.config();
    let render_config = RenderConfig::with_pretty(cli.pretty);

    if cli.status {
        return crate::sync::manager::run_status(&config, render_config);
    }

    if cli.generate_icons {
        let out_dir = cli
            .icon_dir
            .clone()
            .unwrap_or_else(|| config.layout().images_dir());
        return crate::icons::raster::run_generate(&config, &out_dir, render_config);
    }

    let query = cli.query.as_deref().unwrap_or("");
    crate::search::engine::run_search(&config, query, !cli.no_sync, render_config)
}
