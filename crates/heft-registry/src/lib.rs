//! Package size sources for heft
//!
//! This crate provides the two upstream sources the stats resolver consults:
//! npm registry metadata (fast, estimated gzip size) and a bundle analysis
//! service (slower, reports module-format and side-effect flags). Every
//! request is bounded by a timeout and an explicit cancellation token, and
//! every expected failure collapses to `Resolution::Unresolved`.

pub mod api;
pub mod client;
pub mod source;

// Re-export main types
pub use api::{DistInfo, PackageMetadataResponse, VersionMetadata};
pub use client::{FetchError, HttpClient, DEFAULT_FETCH_TIMEOUT};
pub use source::{
    AnalysisSource, MetadataCache, RegistrySource, StatsSource, DEFAULT_ANALYSIS_URL,
    DEFAULT_GZIP_RATIO, DEFAULT_REGISTRY_URL,
};

use heft_core::error::HeftError;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, HeftError>;
