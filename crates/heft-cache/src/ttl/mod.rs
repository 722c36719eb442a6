//! Generic cache with TTL support

use std::borrow::Borrow;
use std::hash::Hash;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

/// Default time-to-live: 24 hours
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60 * 24);

/// Cache entry stamped with its insertion time
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// Cached value
    pub data: T,
    /// When the entry was stored
    pub stored_at: Instant,
}

impl<T> CacheEntry<T> {
    /// Create a new entry stamped with the current time
    pub fn new(data: T) -> Self {
        Self {
            data,
            stored_at: Instant::now(),
        }
    }

    /// Check if the entry is younger than `ttl`
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }

    /// Get age of cache entry
    pub fn age(&self) -> Duration {
        self.stored_at.elapsed()
    }
}

/// Concurrent in-memory cache whose entries expire after a fixed TTL
#[derive(Debug)]
pub struct TtlCache<K, V>
where
    K: Eq + Hash,
{
    /// Cache storage
    entries: DashMap<K, CacheEntry<V>>,
    /// Time-to-live applied to every entry
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create a new cache with the default 24 hour TTL
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Create a cache with a custom TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// TTL applied to every entry
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a cached value if present and fresh.
    ///
    /// Stale entries stay in place until overwritten or `cleanup` runs.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.entries.get(key)?;
        if entry.is_fresh(self.ttl) {
            Some(entry.data.clone())
        } else {
            None
        }
    }

    /// Store a value, overwriting any previous entry for the key
    pub fn insert(&self, key: K, value: V) {
        self.entries.insert(key, CacheEntry::new(value));
    }

    /// Check if key is cached and fresh
    pub fn contains_fresh<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries
            .get(key)
            .map(|entry| entry.is_fresh(self.ttl))
            .unwrap_or(false)
    }

    /// Number of stored entries, fresh or stale
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let mut fresh_entries = 0;
        let mut stale_entries = 0;

        for entry in self.entries.iter() {
            if entry.is_fresh(self.ttl) {
                fresh_entries += 1;
            } else {
                stale_entries += 1;
            }
        }

        CacheStats {
            total_entries: fresh_entries + stale_entries,
            fresh_entries,
            stale_entries,
        }
    }

    /// Clear all cached entries
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Remove stale entries, returning how many were dropped
    pub fn cleanup(&self) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(ttl));
        before.saturating_sub(self.entries.len())
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Total number of entries
    pub total_entries: usize,
    /// Number of fresh entries
    pub fresh_entries: usize,
    /// Number of stale entries
    pub stale_entries: usize,
}

#[cfg(test)]
mod tests;
