//! # heft-cli
//!
//! Bundle size analysis for npm manifests.
//!
//! This is the main entry point for the heft CLI tool. It handles command parsing,
//! sets up logging and error handling, and dispatches to the appropriate command handlers.

use std::collections::HashMap;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use heft_core::error::{HeftError, HeftResult};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Estimate the bundle size of a project's dependencies
#[derive(Parser)]
#[command(name = "heft", version, about = "Bundle size analysis for npm manifests")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve sizes for every dependency in a package.json
    Analyze {
        /// Path to package.json, defaults to the nearest one
        #[arg(value_name = "MANIFEST")]
        manifest: Option<Utf8PathBuf>,

        #[command(flatten)]
        overrides: Overrides,
    },
    /// Look up a single package
    Stats {
        name: String,
        #[arg(default_value = "latest")]
        version: String,
        /// Print the stats as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        overrides: Overrides,
    },
    /// Show the effective configuration and where it came from
    Config {
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Show version information
    Version,
}

/// Configuration flags shared by every resolving command
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
    /// Maximum concurrent upstream lookups
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Packages resolved per wave
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Per-request timeout in milliseconds
    #[arg(long)]
    pub fetch_timeout_ms: Option<u64>,

    /// Gzip estimate as a fraction of the unpacked size
    #[arg(long)]
    pub gzip_ratio: Option<f64>,

    /// npm registry base URL
    #[arg(long)]
    pub registry_url: Option<String>,

    /// Bundle analysis service base URL
    #[arg(long)]
    pub analysis_url: Option<String>,
}

impl Overrides {
    /// Flags as configuration keys, for the highest-priority config layer
    pub fn to_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        let mut set = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                map.insert(key.to_string(), value);
            }
        };

        set("concurrency", self.concurrency.map(|v| v.to_string()));
        set("batch-size", self.batch_size.map(|v| v.to_string()));
        set("fetch-timeout-ms", self.fetch_timeout_ms.map(|v| v.to_string()));
        set("gzip-ratio", self.gzip_ratio.map(|v| v.to_string()));
        set("registry-url", self.registry_url.clone());
        set("analysis-url", self.analysis_url.clone());
        map
    }
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    info!("Starting heft v{}", env!("CARGO_PKG_VERSION"));

    if let Err(err) = run_cli(cli) {
        eprintln!("{}", ErrorFormatter::new().format_error(&err));
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> HeftResult<()> {
    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| HeftError::io("Failed to create async runtime".to_string(), e))?;

    rt.block_on(async {
        let ctx = CommandContext::new()?;
        commands::dispatch_command(cli.command, &ctx).await
    })
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "heft={level},heft_config={level},heft_registry={level},heft_resolver={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("heft encountered an unexpected error: {}", panic_info);
        eprintln!("heft crashed! This is a bug.");
        eprintln!("Please report this at: https://github.com/heft-dev/heft/issues");
        eprintln!("Error: {}", panic_info);
    }));
}
