//! Configuration layering, file discovery, and environment overrides

use std::collections::HashMap;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};

use heft_core::error::HeftError;
use crate::{json::PackageJson, toml::{HeftConfig, HeftToml}, ConfigResult};

/// Project configuration file name
pub const PROJECT_CONFIG_FILE: &str = "heft.toml";
/// Manifest file name
pub const MANIFEST_FILE: &str = "package.json";
/// Prefix of environment variables read as overrides
pub const ENV_PREFIX: &str = "HEFT_";

/// Main configuration loading interface
pub struct ConfigLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
    /// Directory holding the global config, `~/.heft` by default
    global_dir: Option<Utf8PathBuf>,
}

/// Configuration layering and merging
pub struct ConfigLayering;

/// Configuration source tracking
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Built-in defaults
    Defaults,
    /// Global config file
    Global(Utf8PathBuf),
    /// Project heft.toml file
    Project(Utf8PathBuf),
    /// Environment variable
    Environment(String),
    /// CLI flag
    CommandLine,
}

impl ConfigLoader {
    /// Create a new configuration loader using `~/.heft` for global config
    pub fn new(cwd: Utf8PathBuf) -> Self {
        let global_dir = dirs::home_dir()
            .and_then(|home| Utf8PathBuf::from_path_buf(home).ok())
            .map(|home| home.join(".heft"));
        Self { cwd, global_dir }
    }

    /// Use another directory for the global config
    pub fn with_global_dir(mut self, global_dir: Option<Utf8PathBuf>) -> Self {
        self.global_dir = global_dir;
        self
    }

    /// Find a file in the working directory or any parent
    pub fn find_upwards(&self, filename: &str) -> Option<Utf8PathBuf> {
        self.cwd
            .ancestors()
            .map(|dir| dir.join(filename))
            .find(|candidate| candidate.is_file())
    }

    /// Load the nearest heft.toml, if any
    pub async fn load_project_config(&self) -> ConfigResult<Option<(HeftToml, ConfigSource)>> {
        match self.find_upwards(PROJECT_CONFIG_FILE) {
            Some(path) => {
                let layer = crate::toml::load_from_file(&path).await?;
                Ok(Some((layer, ConfigSource::Project(path))))
            }
            None => Ok(None),
        }
    }

    /// Load global configuration
    pub async fn load_global_config(&self) -> ConfigResult<Option<(HeftToml, ConfigSource)>> {
        let Some(global_dir) = &self.global_dir else {
            return Ok(None);
        };

        let path = global_dir.join("config.toml");
        if path.is_file() {
            let layer = crate::toml::load_from_file(&path).await?;
            Ok(Some((layer, ConfigSource::Global(path))))
        } else {
            Ok(None)
        }
    }

    /// Resolve the effective configuration and report which sources contributed
    pub async fn load(
        &self,
        env_overrides: &HashMap<String, String>,
        cli_overrides: &HashMap<String, String>,
    ) -> ConfigResult<(HeftConfig, Vec<ConfigSource>)> {
        let mut sources = vec![ConfigSource::Defaults];

        let global = self.load_global_config().await?.map(|(layer, source)| {
            sources.push(source);
            layer
        });
        let project = self.load_project_config().await?.map(|(layer, source)| {
            sources.push(source);
            layer
        });

        let mut env_keys: Vec<&String> = env_overrides.keys().collect();
        env_keys.sort();
        sources.extend(env_keys.into_iter().map(|key| ConfigSource::Environment(key.clone())));
        if !cli_overrides.is_empty() {
            sources.push(ConfigSource::CommandLine);
        }

        let config = ConfigLayering::merge_configs(
            global.as_ref(),
            project.as_ref(),
            env_overrides,
            cli_overrides,
        )?;
        Ok((config, sources))
    }

    /// Locate the manifest: an explicit path relative to the working directory,
    /// or the nearest package.json
    pub fn resolve_manifest_path(&self, explicit: Option<&Utf8Path>) -> ConfigResult<Utf8PathBuf> {
        if let Some(path) = explicit {
            let path = self.cwd.join(path);
            return if path.is_file() {
                Ok(path)
            } else {
                Err(HeftError::invalid("manifest", format!("{} does not exist", path)))
            };
        }

        self.find_upwards(MANIFEST_FILE).ok_or_else(|| {
            HeftError::invalid(
                "manifest",
                "No package.json found in current directory or parent directories",
            )
        })
    }

    /// Load the manifest located by `resolve_manifest_path`
    pub async fn load_manifest(
        &self,
        explicit: Option<&Utf8Path>,
    ) -> ConfigResult<(PackageJson, Utf8PathBuf)> {
        let path = self.resolve_manifest_path(explicit)?;
        let manifest = crate::json::load_from_file(&path).await?;
        Ok((manifest, path))
    }
}

impl ConfigLayering {
    /// Merge layers in priority order: defaults, global, project, env, CLI
    pub fn merge_configs(
        global_config: Option<&HeftToml>,
        project_config: Option<&HeftToml>,
        env_overrides: &HashMap<String, String>,
        cli_overrides: &HashMap<String, String>,
    ) -> ConfigResult<HeftConfig> {
        let mut merged = HeftConfig::default();

        for layer in [global_config, project_config].into_iter().flatten() {
            merged.apply(layer);
        }

        Self::apply_env_overrides(&mut merged, env_overrides)?;

        // CLI flags have the highest priority
        Self::apply_cli_overrides(&mut merged, cli_overrides)?;

        merged.validate()?;
        Ok(merged)
    }

    /// Apply `HEFT_*` environment variable overrides
    fn apply_env_overrides(config: &mut HeftConfig, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (key, value) in overrides {
            let Some(field) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let field = field.to_lowercase().replace('_', "-");
            // Unknown HEFT_ variables are ignored
            Self::set_field(config, &field, key, value)?;
        }

        Ok(())
    }

    /// Apply CLI flag overrides
    fn apply_cli_overrides(config: &mut HeftConfig, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (key, value) in overrides {
            let known = Self::set_field(config, key, key, value)?;
            if !known {
                return Err(HeftError::invalid(key, "unknown configuration key"));
            }
        }

        Ok(())
    }

    /// Set one field by its kebab-case name; returns false for unknown names
    fn set_field(config: &mut HeftConfig, field: &str, origin: &str, value: &str) -> ConfigResult<bool> {
        match field {
            "concurrency" => config.concurrency = parse_number(origin, value)?,
            "fetch-timeout-ms" => config.fetch_timeout = Duration::from_millis(parse_number(origin, value)?),
            "cache-ttl-secs" => config.cache_ttl = Duration::from_secs(parse_number(origin, value)?),
            "batch-size" => config.batch_size = parse_number(origin, value)?,
            "gzip-ratio" => config.gzip_ratio = parse_number(origin, value)?,
            "registry-url" => config.registry_url = value.to_string(),
            "analysis-url" => config.analysis_url = value.to_string(),
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Collect environment variable overrides
    pub fn collect_env_overrides() -> HashMap<String, String> {
        std::env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect()
    }
}

fn parse_number<T>(origin: &str, value: &str) -> ConfigResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| HeftError::invalid(origin, format!("'{}' is not a valid number: {}", value, e)))
}
