//! `heft config` command implementation.

use heft_config::{toml::to_toml_string, ConfigSource};
use heft_core::error::HeftResult;

use super::CommandContext;
use crate::Overrides;

/// Execute the `heft config` command
pub async fn execute(overrides: &Overrides, ctx: &CommandContext) -> HeftResult<()> {
    let (config, sources) = ctx.load_config(overrides).await?;

    ctx.output.line(&to_toml_string(&config.to_toml())?);
    ctx.output.info("Sources, lowest priority first:");
    for source in &sources {
        ctx.output.info(&format!("  {}", describe_source(source)));
    }

    Ok(())
}

/// Human-readable description of a configuration layer
pub fn describe_source(source: &ConfigSource) -> String {
    match source {
        ConfigSource::Defaults => "built-in defaults".to_string(),
        ConfigSource::Global(path) => format!("global config {}", path),
        ConfigSource::Project(path) => format!("project config {}", path),
        ConfigSource::Environment(key) => format!("environment variable {}", key),
        ConfigSource::CommandLine => "command-line flags".to_string(),
    }
}
