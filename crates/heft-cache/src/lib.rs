//! Time-bounded in-memory caches for heft
//!
//! Lookups are served from a cache only while the entry is younger than the
//! cache's TTL. Entries are never evicted by size; they are replaced on the
//! next successful fetch, removed by `cleanup`, or dropped with the cache.

pub mod ttl;

// Re-export main types
pub use ttl::{CacheEntry, CacheStats, TtlCache, DEFAULT_TTL};
