//! `heft analyze` command implementation.
//!
//! Reads the dependency set from a package.json, resolves every entry in
//! waves and prints progress after each wave. Ctrl-C stops after the wave in
//! flight; its results are discarded.

use std::sync::Arc;
use std::time::Instant;

use camino::Utf8PathBuf;
use heft_core::error::HeftResult;
use heft_resolver::{BatchOrchestrator, BatchReport};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{build_resolver, CommandContext};
use crate::output::progress;
use crate::Overrides;

/// Execute the `heft analyze` command
pub async fn execute(
    manifest: Option<Utf8PathBuf>,
    overrides: &Overrides,
    ctx: &CommandContext,
) -> HeftResult<BatchReport> {
    let cancel = CancellationToken::new();
    let watcher = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("interrupt received, stopping after the current wave");
                cancel.cancel();
            }
        }
    });

    let result = run(manifest, overrides, &cancel, ctx).await;
    watcher.abort();
    result
}

/// Resolve the manifest's dependencies, stopping early once `cancel` fires
pub async fn run(
    manifest: Option<Utf8PathBuf>,
    overrides: &Overrides,
    cancel: &CancellationToken,
    ctx: &CommandContext,
) -> HeftResult<BatchReport> {
    let start_time = Instant::now();
    let (config, _sources) = ctx.load_config(overrides).await?;
    let (package_json, path) = ctx.config_loader().load_manifest(manifest.as_deref()).await?;

    let dependencies = package_json.dependency_entries();
    let total = dependencies.len();
    let (runtime, dev) = package_json.declared_count();
    ctx.output.line(&format!(
        "Analyzing {} ({} dependencies, {} dev dependencies)",
        path, runtime, dev
    ));

    if dependencies.is_empty() {
        ctx.output.info("No dependencies to analyze");
        return Ok(BatchReport::default());
    }

    let resolver = Arc::new(build_resolver(&config)?);
    let orchestrator = BatchOrchestrator::with_batch_size(resolver.clone(), config.batch_size);

    let colors = ctx.output.colors();
    let report = orchestrator
        .run(dependencies, cancel, |wave| {
            ctx.output.info(&progress::wave_line(wave));
            for package in wave.reports {
                ctx.output.line(&progress::package_line(colors, package));
            }
        })
        .await;
    resolver.shutdown();

    ctx.output.line("");
    if report.cancelled {
        ctx.output.warn(&format!(
            "Cancelled after {} of {} packages",
            report.packages.len(),
            total
        ));
    }
    ctx.output.success(&progress::totals_line(&report.totals));
    ctx.output.info(&format!("Finished in {:.2}s", start_time.elapsed().as_secs_f64()));

    Ok(report)
}
