//! # heft-core
//!
//! Core types and errors shared across all heft crates.
//!
//! This crate provides:
//! - `BundleStats` and the `Resolution` tagged result returned by every lookup
//! - `StatsKey` with version normalization for cache keys
//! - `HeftError` enum for unified error handling
//!
//! ## Architecture
//!
//! - `types`: Core data types (BundleStats, Resolution, StatsKey)
//! - `error`: Error types and result aliases

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{HeftError, HeftResult};
pub use types::{normalize_version, BundleStats, Resolution, StatsKey};
