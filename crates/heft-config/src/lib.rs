//! Configuration and manifest loading for heft
//!
//! This crate resolves the effective `HeftConfig` from built-in defaults, a
//! global `~/.heft/config.toml`, a project `heft.toml`, `HEFT_*` environment
//! variables and command-line overrides, and extracts the dependency set
//! from a `package.json`.

pub mod json;
pub mod merge;
pub mod toml;

// Re-export main types
pub use self::json::PackageJson;
pub use self::merge::{ConfigLayering, ConfigLoader, ConfigSource};
pub use self::toml::{BatchSection, HeftConfig, HeftToml, ResolverSection, SourcesSection};

use heft_core::error::HeftError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, HeftError>;
