//! Package stats resolution for heft
//!
//! This crate ties the size sources together: a FIFO rate limiter bounds how
//! many lookups hit the network at once, the stats resolver consults its
//! cache and then the primary and fallback sources, and the batch
//! orchestrator drives the resolver across a whole dependency set in waves.

pub mod batch;
pub mod limiter;
pub mod stats;

#[cfg(test)]
mod testing;

// Re-export main types
pub use batch::{BatchOrchestrator, BatchProgress, BatchReport, PackageReport, SizeTotals, DEFAULT_BATCH_SIZE};
pub use limiter::{RateLimiter, DEFAULT_CONCURRENCY};
pub use stats::{ResolverCacheStats, ResolverConfig, StatsResolver};

use heft_core::error::HeftError;

/// Result type for resolver operations
pub type ResolverResult<T> = Result<T, HeftError>;
