//! Wave-based resolution of a whole dependency set

use std::sync::Arc;

use futures::future::join_all;
use indexmap::IndexMap;
use tokio_util::sync::CancellationToken;
use tracing::info;

use heft_core::Resolution;
use crate::stats::StatsResolver;

/// Default number of packages resolved per wave
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Result for one dependency entry
#[derive(Debug, Clone, PartialEq)]
pub struct PackageReport {
    /// Package name
    pub name: String,
    /// Version exactly as written in the manifest
    pub requested_version: String,
    /// Lookup outcome
    pub stats: Resolution,
}

/// Running size totals; unresolved packages contribute nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeTotals {
    /// Sum of resolved sizes in bytes
    pub size: u64,
    /// Sum of resolved gzip sizes in bytes
    pub gzip: u64,
    /// Packages with known stats
    pub resolved: usize,
    /// Packages whose size is unknown
    pub unresolved: usize,
}

impl SizeTotals {
    /// Account for one lookup outcome
    pub fn record(&mut self, resolution: &Resolution) {
        match resolution {
            Resolution::Resolved(stats) => {
                // Sizes come from upstream JSON; totals saturate instead of overflowing
                self.size = self.size.saturating_add(stats.size);
                self.gzip = self.gzip.saturating_add(stats.gzip);
                self.resolved += 1;
            }
            Resolution::Unresolved => self.unresolved += 1,
        }
    }
}

/// Snapshot emitted after each completed wave
#[derive(Debug)]
pub struct BatchProgress<'a> {
    /// Zero-based index of the wave just applied
    pub wave: usize,
    /// Total number of waves
    pub waves: usize,
    /// Packages applied so far
    pub completed: usize,
    /// Packages in the whole batch
    pub total: usize,
    /// Results of the wave just applied
    pub reports: &'a [PackageReport],
    /// Totals across every applied wave
    pub totals: SizeTotals,
}

/// Final outcome of a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Per-package results in manifest order
    pub packages: IndexMap<String, PackageReport>,
    /// Totals across every applied wave
    pub totals: SizeTotals,
    /// Set when the run stopped before every wave was applied
    pub cancelled: bool,
}

/// Drives a `StatsResolver` over a dependency set in fixed-size waves.
///
/// Every package of a wave is looked up concurrently and the wave is joined
/// before the next one starts. Unresolved packages count as unknown size and
/// never stop the batch.
#[derive(Clone)]
pub struct BatchOrchestrator {
    resolver: Arc<StatsResolver>,
    batch_size: usize,
}

impl BatchOrchestrator {
    /// Create an orchestrator with the default wave size
    pub fn new(resolver: Arc<StatsResolver>) -> Self {
        Self::with_batch_size(resolver, DEFAULT_BATCH_SIZE)
    }

    /// Create an orchestrator with a custom wave size (at least one)
    pub fn with_batch_size(resolver: Arc<StatsResolver>, batch_size: usize) -> Self {
        Self {
            resolver,
            batch_size: batch_size.max(1),
        }
    }

    /// Packages resolved per wave
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Resolver shared by every wave
    pub fn resolver(&self) -> &Arc<StatsResolver> {
        &self.resolver
    }

    /// Resolve `(name, version)` pairs, reporting progress after each wave.
    ///
    /// Cancelling `cancel` does not abort lookups already in flight: the
    /// current wave is allowed to finish, its results are discarded, and no
    /// further waves start.
    ///
    /// Entries are keyed by name: a repeated name keeps the position of its
    /// first occurrence and the version of its last, and is looked up once.
    pub async fn run<I, F>(&self, dependencies: I, cancel: &CancellationToken, mut on_progress: F) -> BatchReport
    where
        I: IntoIterator<Item = (String, String)>,
        F: FnMut(&BatchProgress<'_>),
    {
        let entries: Vec<(String, String)> = dependencies
            .into_iter()
            .collect::<IndexMap<String, String>>()
            .into_iter()
            .collect();
        let total = entries.len();
        let waves = total.div_ceil(self.batch_size);
        let mut report = BatchReport::default();
        let mut completed = 0;

        for (wave, chunk) in entries.chunks(self.batch_size).enumerate() {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let reports = join_all(chunk.iter().map(|(name, version)| async move {
                PackageReport {
                    name: name.clone(),
                    requested_version: version.clone(),
                    stats: self.resolver.get_stats(name, version).await,
                }
            }))
            .await;

            if cancel.is_cancelled() {
                info!(wave, "batch cancelled, discarding wave results");
                report.cancelled = true;
                break;
            }

            for package in &reports {
                report.totals.record(&package.stats);
            }
            completed += reports.len();

            info!(
                wave = wave + 1,
                waves,
                completed,
                total,
                size = report.totals.size,
                gzip = report.totals.gzip,
                "wave resolved"
            );

            on_progress(&BatchProgress {
                wave,
                waves,
                completed,
                total,
                reports: &reports,
                totals: report.totals,
            });

            report
                .packages
                .extend(reports.into_iter().map(|package| (package.name.clone(), package)));
        }

        report
    }
}
