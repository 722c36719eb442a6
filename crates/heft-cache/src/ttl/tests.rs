//! Unit tests for the TTL cache

use super::*;
use std::time::Duration;

#[test]
fn test_cache_entry_creation() {
    let entry = CacheEntry::new("left-pad".to_string());

    assert_eq!(entry.data, "left-pad");
    assert!(entry.is_fresh(DEFAULT_TTL));
    assert!(entry.age() < Duration::from_secs(1));
}

#[test]
fn test_default_ttl_is_one_day() {
    let cache: TtlCache<String, u64> = TtlCache::default();
    assert_eq!(cache.ttl(), Duration::from_secs(86_400));
}

#[test]
fn test_insert_and_get() {
    let cache = TtlCache::new();
    cache.insert("lodash".to_string(), 42u64);

    assert_eq!(cache.get("lodash"), Some(42));
    assert!(cache.contains_fresh("lodash"));
}

#[test]
fn test_get_nonexistent() {
    let cache: TtlCache<String, u64> = TtlCache::new();

    assert_eq!(cache.get("missing"), None);
    assert!(!cache.contains_fresh("missing"));
}

#[test]
fn test_insert_overwrites() {
    let cache = TtlCache::new();
    cache.insert("react".to_string(), 1u64);
    cache.insert("react".to_string(), 2u64);

    assert_eq!(cache.get("react"), Some(2));
    assert_eq!(cache.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_entry_expires_after_ttl() {
    let cache = TtlCache::with_ttl(Duration::from_secs(60));
    cache.insert("express".to_string(), 7u64);

    tokio::time::advance(Duration::from_secs(59)).await;
    assert_eq!(cache.get("express"), Some(7));

    // Exactly at the TTL boundary the entry is already stale
    tokio::time::advance(Duration::from_secs(1)).await;
    assert_eq!(cache.get("express"), None);
    assert!(!cache.contains_fresh("express"));

    // Stale entries remain until overwritten or cleaned up
    assert_eq!(cache.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_overwrite_refreshes_timestamp() {
    let cache = TtlCache::with_ttl(Duration::from_secs(60));
    cache.insert("vue".to_string(), 1u64);

    tokio::time::advance(Duration::from_secs(90)).await;
    assert_eq!(cache.get("vue"), None);

    cache.insert("vue".to_string(), 2u64);
    assert_eq!(cache.get("vue"), Some(2));
}

#[tokio::test(start_paused = true)]
async fn test_stats_and_cleanup() {
    let cache = TtlCache::with_ttl(Duration::from_secs(60));

    let stats = cache.stats();
    assert_eq!(stats, CacheStats::default());

    cache.insert("old".to_string(), 1u64);
    tokio::time::advance(Duration::from_secs(61)).await;
    cache.insert("new".to_string(), 2u64);

    let stats = cache.stats();
    assert_eq!(stats.total_entries, 2);
    assert_eq!(stats.fresh_entries, 1);
    assert_eq!(stats.stale_entries, 1);

    let removed = cache.cleanup();
    assert_eq!(removed, 1);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("new"), Some(2));
}

#[test]
fn test_clear() {
    let cache = TtlCache::new();
    cache.insert("a".to_string(), 1u64);
    cache.insert("b".to_string(), 2u64);
    assert!(!cache.is_empty());

    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.stats().total_entries, 0);
}
