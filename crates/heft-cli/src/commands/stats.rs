//! `heft stats` command implementation.

use heft_core::error::{HeftError, HeftResult};
use heft_core::Resolution;

use super::{build_resolver, CommandContext};
use crate::output::format_bytes;
use crate::Overrides;

/// Execute the `heft stats` command
pub async fn execute(
    name: &str,
    version: &str,
    json: bool,
    overrides: &Overrides,
    ctx: &CommandContext,
) -> HeftResult<()> {
    let resolution = lookup(name, version, overrides, ctx).await?;

    if json {
        let body = serde_json::to_string_pretty(&resolution.stats()).map_err(|e| {
            HeftError::JsonParse {
                message: e.to_string(),
            }
        })?;
        ctx.output.line(&body);
        return Ok(());
    }

    match resolution {
        Resolution::Resolved(stats) => {
            ctx.output.line(&format!("{}@{}", name, version));
            ctx.output.line(&format!("  size: {}", format_bytes(stats.size)));
            ctx.output.line(&format!("  gzip: {}", format_bytes(stats.gzip)));
            if let Some(count) = stats.dependency_count {
                ctx.output.line(&format!("  dependencies: {}", count));
            }
            if let Some(shakeable) = stats.is_tree_shakeable() {
                ctx.output.line(&format!("  tree-shakeable: {}", shakeable));
            }
            if let Some(side_effects) = stats.has_side_effects {
                ctx.output.line(&format!("  side effects: {}", side_effects));
            }
        }
        Resolution::Unresolved => {
            ctx.output.warn(&format!("{}@{}: size unknown", name, version));
        }
    }

    Ok(())
}

/// Resolve one package with the effective configuration
pub async fn lookup(
    name: &str,
    version: &str,
    overrides: &Overrides,
    ctx: &CommandContext,
) -> HeftResult<Resolution> {
    let (config, _sources) = ctx.load_config(overrides).await?;
    let resolver = build_resolver(&config)?;
    Ok(resolver.get_stats(name, version).await)
}
