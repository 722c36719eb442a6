//! Primary source: npm registry package metadata

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use heft_core::{BundleStats, Resolution};
use super::{MetadataCache, StatsSource};
use crate::api::PackageMetadataResponse;
use crate::client::{FetchError, HttpClient};

/// Public npm registry
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Fraction of the unpacked size reported as the gzip estimate
pub const DEFAULT_GZIP_RATIO: f64 = 0.3;

/// Derives stats from the registry's declared `unpackedSize`.
///
/// The gzip figure is an estimate (`size * gzip_ratio`), and no module-format
/// or side-effect flags are reported. One metadata document is fetched per
/// package name and reused for every version of that package.
#[derive(Debug, Clone)]
pub struct RegistrySource {
    http: HttpClient,
    base_url: String,
    metadata: Arc<MetadataCache>,
    gzip_ratio: f64,
}

impl RegistrySource {
    /// Create a source against the public registry
    pub fn new(http: HttpClient, metadata: Arc<MetadataCache>) -> Self {
        Self {
            http,
            base_url: DEFAULT_REGISTRY_URL.to_string(),
            metadata,
            gzip_ratio: DEFAULT_GZIP_RATIO,
        }
    }

    /// Point the source at another registry
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the gzip estimation ratio
    pub fn with_gzip_ratio(mut self, gzip_ratio: f64) -> Self {
        self.gzip_ratio = gzip_ratio;
        self
    }

    /// Metadata cache shared with the resolver
    pub fn metadata_cache(&self) -> &Arc<MetadataCache> {
        &self.metadata
    }

    /// Build stats from a declared unpacked size
    pub fn estimate(&self, size: u64) -> BundleStats {
        let gzip = (size as f64 * self.gzip_ratio).round() as u64;
        BundleStats::sized(size, gzip)
    }

    /// Encode package name for URL (handle scoped packages)
    pub(crate) fn encode_package_name(name: &str) -> String {
        if name.starts_with('@') {
            // Scoped package: @org/pkg -> @org%2fpkg
            name.replace('/', "%2f")
        } else {
            name.to_string()
        }
    }

    async fn fetch_metadata(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<Arc<PackageMetadataResponse>, FetchError> {
        let url = Url::parse(&format!("{}/{}", self.base_url, Self::encode_package_name(name)))?;
        let metadata: PackageMetadataResponse = self.http.get_json(url, cancel).await?;

        let metadata = Arc::new(metadata);
        self.metadata.insert(name.to_string(), Arc::clone(&metadata));
        Ok(metadata)
    }
}

#[async_trait]
impl StatsSource for RegistrySource {
    fn label(&self) -> &'static str {
        "registry"
    }

    async fn fetch(&self, name: &str, version: &str, cancel: &CancellationToken) -> Resolution {
        if let Some(metadata) = self.metadata.get(name) {
            if let Some(size) = metadata.unpacked_size(version) {
                debug!(package = name, version, "registry metadata cache hit");
                return Resolution::Resolved(self.estimate(size));
            }
            debug!(package = name, version, "version missing from cached metadata, refetching");
        }

        let metadata = match self.fetch_metadata(name, cancel).await {
            Ok(metadata) => metadata,
            Err(error) => {
                debug!(package = name, version, %error, "registry lookup failed");
                return Resolution::Unresolved;
            }
        };

        match metadata.unpacked_size(version) {
            Some(size) => Resolution::Resolved(self.estimate(size)),
            None => {
                debug!(package = name, version, "registry has no unpacked size for version");
                Resolution::Unresolved
            }
        }
    }
}
