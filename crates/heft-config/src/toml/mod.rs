//! heft.toml configuration parsing and the resolved configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use heft_core::error::HeftError;
use crate::ConfigResult;

/// Default concurrency ceiling for uncached lookups
pub const DEFAULT_CONCURRENCY: usize = 10;
/// Default per-request timeout in milliseconds
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 2000;
/// Default cache TTL in seconds (24 hours)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60 * 60 * 24;
/// Default number of packages resolved per wave
pub const DEFAULT_BATCH_SIZE: usize = 5;
/// Default gzip estimation ratio for registry sizes
pub const DEFAULT_GZIP_RATIO: f64 = 0.3;
/// Default npm registry
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";
/// Default bundle analysis service
pub const DEFAULT_ANALYSIS_URL: &str = "https://bundlephobia.com";

/// One configuration file layer.
///
/// Every field is optional so a layer only overrides what it sets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeftToml {
    /// Resolver tuning
    #[serde(default)]
    pub resolver: ResolverSection,

    /// Batch orchestration
    #[serde(default)]
    pub batch: BatchSection,

    /// Upstream endpoints
    #[serde(default)]
    pub sources: SourcesSection,
}

/// `[resolver]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ResolverSection {
    /// Maximum concurrent uncached lookups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Per-request timeout in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_timeout_ms: Option<u64>,

    /// Cache freshness window in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_ttl_secs: Option<u64>,

    /// Gzip estimate as a fraction of the unpacked size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gzip_ratio: Option<f64>,
}

/// `[batch]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchSection {
    /// Packages resolved per wave
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
}

/// `[sources]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct SourcesSection {
    /// npm registry base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_url: Option<String>,

    /// Bundle analysis service base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_url: Option<String>,
}

/// Effective configuration after all layers are applied
#[derive(Debug, Clone, PartialEq)]
pub struct HeftConfig {
    pub concurrency: usize,
    pub fetch_timeout: Duration,
    pub cache_ttl: Duration,
    pub batch_size: usize,
    pub gzip_ratio: f64,
    pub registry_url: String,
    pub analysis_url: String,
}

impl Default for HeftConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            batch_size: DEFAULT_BATCH_SIZE,
            gzip_ratio: DEFAULT_GZIP_RATIO,
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            analysis_url: DEFAULT_ANALYSIS_URL.to_string(),
        }
    }
}

impl HeftConfig {
    /// Overlay every field a file layer sets
    pub fn apply(&mut self, layer: &HeftToml) {
        if let Some(concurrency) = layer.resolver.concurrency {
            self.concurrency = concurrency;
        }
        if let Some(ms) = layer.resolver.fetch_timeout_ms {
            self.fetch_timeout = Duration::from_millis(ms);
        }
        if let Some(secs) = layer.resolver.cache_ttl_secs {
            self.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(ratio) = layer.resolver.gzip_ratio {
            self.gzip_ratio = ratio;
        }
        if let Some(size) = layer.batch.size {
            self.batch_size = size;
        }
        if let Some(url) = &layer.sources.registry_url {
            self.registry_url = url.clone();
        }
        if let Some(url) = &layer.sources.analysis_url {
            self.analysis_url = url.clone();
        }
    }

    /// Reject values that would stall or corrupt resolution
    pub fn validate(&self) -> ConfigResult<()> {
        if self.concurrency == 0 {
            return Err(HeftError::invalid("resolver.concurrency", "must be at least 1"));
        }
        if self.fetch_timeout.is_zero() {
            return Err(HeftError::invalid("resolver.fetch-timeout-ms", "must be at least 1"));
        }
        if !(self.gzip_ratio > 0.0 && self.gzip_ratio <= 1.0) {
            return Err(HeftError::invalid(
                "resolver.gzip-ratio",
                format!("must be in (0, 1], got {}", self.gzip_ratio),
            ));
        }
        if self.batch_size == 0 {
            return Err(HeftError::invalid("batch.size", "must be at least 1"));
        }
        validate_url("sources.registry-url", &self.registry_url)?;
        validate_url("sources.analysis-url", &self.analysis_url)?;
        Ok(())
    }

    /// Render as a complete file layer
    pub fn to_toml(&self) -> HeftToml {
        HeftToml {
            resolver: ResolverSection {
                concurrency: Some(self.concurrency),
                fetch_timeout_ms: Some(self.fetch_timeout.as_millis() as u64),
                cache_ttl_secs: Some(self.cache_ttl.as_secs()),
                gzip_ratio: Some(self.gzip_ratio),
            },
            batch: BatchSection {
                size: Some(self.batch_size),
            },
            sources: SourcesSection {
                registry_url: Some(self.registry_url.clone()),
                analysis_url: Some(self.analysis_url.clone()),
            },
        }
    }
}

fn validate_url(field: &str, value: &str) -> ConfigResult<()> {
    let url = Url::parse(value)
        .map_err(|e| HeftError::invalid(field, format!("'{}' is not a valid URL: {}", value, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(HeftError::invalid(
            field,
            format!("unsupported scheme '{}', expected http or https", scheme),
        )),
    }
}

/// Parse a heft.toml document
pub fn parse_heft_toml(content: &str, path: &str) -> ConfigResult<HeftToml> {
    ::toml::from_str(content).map_err(|e| HeftError::TomlParse {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Serialize a layer back to TOML text
pub fn to_toml_string(layer: &HeftToml) -> ConfigResult<String> {
    ::toml::to_string_pretty(layer)
        .map_err(|e| HeftError::invalid("config", format!("Failed to serialize: {}", e)))
}

/// Load and parse heft.toml from file
pub async fn load_from_file(path: &camino::Utf8Path) -> ConfigResult<HeftToml> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| HeftError::io(format!("Failed to read {}", path), e))?;

    parse_heft_toml(&content, path.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HeftConfig::default();
        assert_eq!(config.concurrency, 10);
        assert_eq!(config.fetch_timeout, Duration::from_millis(2000));
        assert_eq!(config.cache_ttl, Duration::from_secs(86_400));
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.gzip_ratio, 0.3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_file() {
        let content = r#"
[resolver]
concurrency = 4
fetch-timeout-ms = 500
cache-ttl-secs = 600
gzip-ratio = 0.25

[batch]
size = 8

[sources]
registry-url = "https://npm.example.com"
analysis-url = "http://localhost:5000"
"#;
        let layer = parse_heft_toml(content, "heft.toml").unwrap();
        let mut config = HeftConfig::default();
        config.apply(&layer);

        assert_eq!(config.concurrency, 4);
        assert_eq!(config.fetch_timeout, Duration::from_millis(500));
        assert_eq!(config.cache_ttl, Duration::from_secs(600));
        assert_eq!(config.gzip_ratio, 0.25);
        assert_eq!(config.batch_size, 8);
        assert_eq!(config.registry_url, "https://npm.example.com");
        assert_eq!(config.analysis_url, "http://localhost:5000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_layer_keeps_other_values() {
        let layer = parse_heft_toml("[batch]\nsize = 2\n", "heft.toml").unwrap();
        let mut config = HeftConfig::default();
        config.apply(&layer);

        assert_eq!(config.batch_size, 2);
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(config.registry_url, DEFAULT_REGISTRY_URL);
    }

    #[test]
    fn test_parse_errors() {
        let err = parse_heft_toml("[resolver\n", "broken.toml").unwrap_err();
        assert!(matches!(err, HeftError::TomlParse { ref path, .. } if path == "broken.toml"));

        let err = parse_heft_toml("[resolver]\nthreads = 4\n", "heft.toml").unwrap_err();
        assert!(matches!(err, HeftError::TomlParse { .. }));
    }

    #[test]
    fn test_validation_rejects_stalling_values() {
        let cases = [
            HeftConfig { concurrency: 0, ..HeftConfig::default() },
            HeftConfig { batch_size: 0, ..HeftConfig::default() },
            HeftConfig { fetch_timeout: Duration::ZERO, ..HeftConfig::default() },
            HeftConfig { gzip_ratio: 0.0, ..HeftConfig::default() },
            HeftConfig { gzip_ratio: 1.5, ..HeftConfig::default() },
            HeftConfig { gzip_ratio: f64::NAN, ..HeftConfig::default() },
            HeftConfig { registry_url: "not a url".to_string(), ..HeftConfig::default() },
            HeftConfig { analysis_url: "ftp://example.com".to_string(), ..HeftConfig::default() },
        ];

        for config in cases {
            assert!(
                matches!(config.validate(), Err(HeftError::ConfigValidation { .. })),
                "expected {:?} to be rejected",
                config
            );
        }
    }

    #[test]
    fn test_toml_output_parses_back() {
        let config = HeftConfig {
            concurrency: 3,
            batch_size: 7,
            ..HeftConfig::default()
        };
        let text = to_toml_string(&config.to_toml()).unwrap();
        let layer = parse_heft_toml(&text, "heft.toml").unwrap();

        let mut reloaded = HeftConfig::default();
        reloaded.apply(&layer);
        assert_eq!(reloaded, config);
    }
}
