//! Size sources consulted by the stats resolver
//!
//! Each source turns `(name, version)` into a `Resolution`. Sources never
//! return errors: timeouts, aborts, non-2xx responses and malformed bodies
//! are logged and reported as `Resolution::Unresolved`.

mod analysis;
mod registry;

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use heft_cache::TtlCache;
use heft_core::Resolution;
use crate::api::PackageMetadataResponse;

pub use analysis::{AnalysisSource, DEFAULT_ANALYSIS_URL};
pub use registry::{RegistrySource, DEFAULT_GZIP_RATIO, DEFAULT_REGISTRY_URL};

/// Registry metadata documents keyed by package name
pub type MetadataCache = TtlCache<String, Arc<PackageMetadataResponse>>;

/// A strategy for obtaining size data for one package version
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Short label used in logs
    fn label(&self) -> &'static str;

    /// Look up stats for an exact, already normalized version.
    ///
    /// Network work must stop promptly once `cancel` fires.
    async fn fetch(&self, name: &str, version: &str, cancel: &CancellationToken) -> Resolution;
}
