//! Cached, rate-limited stats lookups across the primary and fallback sources

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use heft_cache::{CacheStats, TtlCache, DEFAULT_TTL};
use heft_core::{BundleStats, Resolution, StatsKey};
use heft_registry::{
    AnalysisSource, HttpClient, MetadataCache, RegistrySource, StatsSource,
    DEFAULT_ANALYSIS_URL, DEFAULT_FETCH_TIMEOUT, DEFAULT_GZIP_RATIO, DEFAULT_REGISTRY_URL,
};

use crate::limiter::{RateLimiter, DEFAULT_CONCURRENCY};
use crate::ResolverResult;

/// Tuning knobs for the resolver and its sources
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    /// Maximum concurrent uncached lookups
    pub concurrency: usize,
    /// Upper bound for each upstream request
    pub fetch_timeout: Duration,
    /// Freshness window for both caches
    pub cache_ttl: Duration,
    /// Gzip estimate ratio applied to registry sizes
    pub gzip_ratio: f64,
    /// Base URL of the npm registry
    pub registry_url: String,
    /// Base URL of the bundle analysis service
    pub analysis_url: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            cache_ttl: DEFAULT_TTL,
            gzip_ratio: DEFAULT_GZIP_RATIO,
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            analysis_url: DEFAULT_ANALYSIS_URL.to_string(),
        }
    }
}

/// Snapshot of both resolver caches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverCacheStats {
    /// Resolved stats keyed by package and version
    pub stats: CacheStats,
    /// Registry metadata keyed by package name
    pub metadata: CacheStats,
}

/// Resolves bundle stats for one package version at a time.
///
/// Lookups hit the stats cache first. On a miss a single rate-limited unit
/// tries the primary source, then the fallback, and caches the first
/// resolved value. Failures are never cached and never raised.
///
/// Two concurrent lookups of the same uncached key may both reach the
/// network; the later write wins. Results for a key are identical, so the
/// only cost is a duplicate request.
pub struct StatsResolver {
    primary: Arc<dyn StatsSource>,
    fallback: Arc<dyn StatsSource>,
    limiter: RateLimiter,
    stats: TtlCache<StatsKey, BundleStats>,
    metadata: Arc<MetadataCache>,
    shutdown: CancellationToken,
}

impl StatsResolver {
    /// Create a resolver backed by the npm registry and the bundle analysis service
    pub fn new(config: &ResolverConfig) -> ResolverResult<Self> {
        let http = HttpClient::with_timeout(config.fetch_timeout)?;
        let metadata = Arc::new(MetadataCache::with_ttl(config.cache_ttl));

        let primary = RegistrySource::new(http.clone(), Arc::clone(&metadata))
            .with_base_url(config.registry_url.as_str())
            .with_gzip_ratio(config.gzip_ratio);
        let fallback = AnalysisSource::new(http).with_base_url(config.analysis_url.as_str());

        Ok(Self::from_parts(
            Arc::new(primary),
            Arc::new(fallback),
            metadata,
            config,
        ))
    }

    /// Create a resolver over arbitrary sources with its own metadata cache
    pub fn with_sources(
        primary: Arc<dyn StatsSource>,
        fallback: Arc<dyn StatsSource>,
        config: &ResolverConfig,
    ) -> Self {
        let metadata = Arc::new(MetadataCache::with_ttl(config.cache_ttl));
        Self::from_parts(primary, fallback, metadata, config)
    }

    fn from_parts(
        primary: Arc<dyn StatsSource>,
        fallback: Arc<dyn StatsSource>,
        metadata: Arc<MetadataCache>,
        config: &ResolverConfig,
    ) -> Self {
        Self {
            primary,
            fallback,
            limiter: RateLimiter::new(config.concurrency),
            stats: TtlCache::with_ttl(config.cache_ttl),
            metadata,
            shutdown: CancellationToken::new(),
        }
    }

    /// Look up stats for `name` at `version`.
    ///
    /// The version is normalized (`^1.2.3` becomes `1.2.3`) before it is used
    /// as a cache key or sent upstream.
    pub async fn get_stats(&self, name: &str, version: &str) -> Resolution {
        let key = StatsKey::new(name, version);

        if let Some(stats) = self.stats.get(&key) {
            debug!(%key, "stats cache hit");
            return Resolution::Resolved(stats);
        }

        self.limiter.run(|| self.resolve_uncached(key)).await
    }

    async fn resolve_uncached(&self, key: StatsKey) -> Resolution {
        if self.shutdown.is_cancelled() {
            debug!(%key, "resolver shut down, skipping lookup");
            return Resolution::Unresolved;
        }

        let mut resolution = self.fetch_from(&self.primary, &key).await;
        if !resolution.is_resolved() {
            debug!(%key, source = self.fallback.label(), "primary source unresolved, trying fallback");
            resolution = self.fetch_from(&self.fallback, &key).await;
        }

        match &resolution {
            Resolution::Resolved(stats) => self.stats.insert(key, stats.clone()),
            Resolution::Unresolved => warn!(%key, "no source could resolve package stats"),
        }

        resolution
    }

    async fn fetch_from(&self, source: &Arc<dyn StatsSource>, key: &StatsKey) -> Resolution {
        let cancel = self.shutdown.child_token();
        source.fetch(&key.name, &key.version, &cancel).await
    }

    /// Abort every in-flight upstream request.
    ///
    /// Cached results keep being served; lookups that miss the cache resolve
    /// to `Unresolved` without touching the network.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Check if `shutdown` has been called
    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Drop every entry from both caches
    pub fn clear_caches(&self) {
        self.stats.clear();
        self.metadata.clear();
    }

    /// Get statistics for both caches
    pub fn cache_stats(&self) -> ResolverCacheStats {
        ResolverCacheStats {
            stats: self.stats.stats(),
            metadata: self.metadata.stats(),
        }
    }

    /// Cached stats for a key, if fresh
    pub fn cached(&self, name: &str, version: &str) -> Option<BundleStats> {
        self.stats.get(&StatsKey::new(name, version))
    }

    /// Admission gate shared by all uncached lookups
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }
}
