//! Command implementations and dispatch logic.
//!
//! Each command is implemented as an async function that takes a CommandContext.

use std::collections::HashMap;

use camino::Utf8PathBuf;
use heft_config::{ConfigLayering, ConfigLoader, ConfigSource, HeftConfig};
use heft_core::error::{HeftError, HeftResult};
use heft_resolver::{ResolverConfig, StatsResolver};
use tracing::{debug, info};

pub mod analyze;
pub mod config;
pub mod stats;

#[cfg(test)]
mod tests;

use crate::{output::OutputHandler, Commands, Overrides};

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    pub output: OutputHandler,
    /// `HEFT_*` variables captured at startup
    pub env: HashMap<String, String>,
    /// Global config directory; `None` skips the global layer
    pub global_dir: Option<Utf8PathBuf>,
}

impl CommandContext {
    /// Create a context for the current process
    pub fn new() -> HeftResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| HeftError::io("Failed to get current directory".to_string(), e))?;
        let cwd = Utf8PathBuf::from_path_buf(cwd).map_err(|path| {
            HeftError::invalid("cwd", format!("{} is not valid UTF-8", path.display()))
        })?;

        let global_dir = dirs::home_dir()
            .and_then(|home| Utf8PathBuf::from_path_buf(home).ok())
            .map(|home| home.join(".heft"));

        Ok(Self {
            cwd,
            output: OutputHandler::new(),
            env: ConfigLayering::collect_env_overrides(),
            global_dir,
        })
    }

    /// Configuration loader rooted at the working directory
    pub fn config_loader(&self) -> ConfigLoader {
        ConfigLoader::new(self.cwd.clone()).with_global_dir(self.global_dir.clone())
    }

    /// Load the effective configuration with command-line overrides on top
    pub async fn load_config(&self, overrides: &Overrides) -> HeftResult<(HeftConfig, Vec<ConfigSource>)> {
        let (config, sources) = self
            .config_loader()
            .load(&self.env, &overrides.to_map())
            .await?;
        debug!(?sources, "configuration loaded");
        Ok((config, sources))
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> HeftResult<()> {
    match command {
        Commands::Analyze { manifest, overrides } => {
            info!("Analyzing manifest: {:?}", manifest);
            analyze::execute(manifest, &overrides, ctx).await.map(|_| ())
        }
        Commands::Stats { name, version, json, overrides } => {
            info!("Looking up {}@{}", name, version);
            stats::execute(&name, &version, json, &overrides, ctx).await
        }
        Commands::Config { overrides } => config::execute(&overrides, ctx).await,
        Commands::Version => {
            show_version(ctx);
            Ok(())
        }
    }
}

/// Resolver settings carried by the effective configuration
pub fn resolver_config(config: &HeftConfig) -> ResolverConfig {
    ResolverConfig {
        concurrency: config.concurrency,
        fetch_timeout: config.fetch_timeout,
        cache_ttl: config.cache_ttl,
        gzip_ratio: config.gzip_ratio,
        registry_url: config.registry_url.clone(),
        analysis_url: config.analysis_url.clone(),
    }
}

/// Build a resolver against the configured sources
pub fn build_resolver(config: &HeftConfig) -> HeftResult<StatsResolver> {
    StatsResolver::new(&resolver_config(config))
}

fn show_version(ctx: &CommandContext) {
    ctx.output.line(&format!("heft v{}", env!("CARGO_PKG_VERSION")));
    ctx.output.info(&format!("Built: {}", env!("HEFT_BUILD_DATE")));
    ctx.output.info(&format!("Target: {}", env!("HEFT_BUILD_TARGET")));
    ctx.output.info(&format!("Rust: {}", env!("HEFT_RUSTC_VERSION")));
}
