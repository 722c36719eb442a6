//! Core data types for package size lookups.
//!
//! - Bundle statistics and the tagged lookup result
//! - Normalized cache keys

pub mod key;
pub mod stats;

// Re-export all public types
pub use key::{normalize_version, StatsKey};
pub use stats::{BundleStats, Resolution};
