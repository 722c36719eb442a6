//! Fallback source: bundle analysis service

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use heft_core::{BundleStats, Resolution};
use super::StatsSource;
use crate::client::{FetchError, HttpClient};

/// Public bundlephobia instance
pub const DEFAULT_ANALYSIS_URL: &str = "https://bundlephobia.com";

/// Queries a bundle analysis service (`/api/size?package=name@version`).
///
/// Slower than the registry but reports real gzip sizes plus the
/// module-format, side-effect and dependency-count fields verbatim.
#[derive(Debug, Clone)]
pub struct AnalysisSource {
    http: HttpClient,
    base_url: String,
}

impl AnalysisSource {
    /// Create a source against the public service
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            base_url: DEFAULT_ANALYSIS_URL.to_string(),
        }
    }

    /// Point the source at another analysis service
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn size_url(&self, name: &str, version: &str) -> Result<Url, FetchError> {
        let spec = format!("{}@{}", name, version);
        let url = Url::parse_with_params(
            &format!("{}/api/size", self.base_url),
            &[("package", spec.as_str())],
        )?;
        Ok(url)
    }
}

#[async_trait]
impl StatsSource for AnalysisSource {
    fn label(&self) -> &'static str {
        "analysis"
    }

    async fn fetch(&self, name: &str, version: &str, cancel: &CancellationToken) -> Resolution {
        let result = match self.size_url(name, version) {
            Ok(url) => self.http.get_json::<BundleStats>(url, cancel).await,
            Err(error) => Err(error),
        };

        match result {
            Ok(stats) => Resolution::Resolved(stats),
            Err(error) => {
                debug!(package = name, version, %error, "bundle analysis lookup failed");
                Resolution::Unresolved
            }
        }
    }
}
