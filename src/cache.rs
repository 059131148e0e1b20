//! Externally-supplied result cache
//!
//! The calculators themselves are pure and never touch this — host code
//! that wants memoization constructs a `ResultCache`, keys it by
//! (function name, canonicalized argument tuple), and owns its lifetime.
//! Entries expire after a TTL and the least-recently-used entry is
//! evicted once the cache is full.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::Value;

struct CacheEntry {
    value: Value,
    inserted_at: Instant,
    last_used: Instant,
}

/// TTL + LRU cache over serialized calculation results
pub struct ResultCache {
    entries: HashMap<String, CacheEntry>,
    max_entries: usize,
    ttl: Duration,

    /// Statistics
    pub hits: u64,
    pub misses: u64,
}

impl ResultCache {
    /// Create a cache bounded by entry count and entry age
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::with_capacity(max_entries),
            max_entries: max_entries.max(1),
            ttl,
            hits: 0,
            misses: 0,
        }
    }

    /// Canonical cache key for a function name and its argument tuple
    ///
    /// Arguments serialize through serde_json; struct/tuple field order is
    /// declaration order, so identical inputs produce identical keys.
    pub fn key<A: Serialize>(function: &str, args: &A) -> String {
        let canonical = serde_json::to_string(args).unwrap_or_else(|_| "null".to_string());
        format!("{function}:{canonical}")
    }

    /// Look up a cached result, expiring it if past the TTL
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.inserted_at.elapsed() > self.ttl,
            None => {
                self.misses += 1;
                return None;
            }
        };

        if expired {
            self.entries.remove(key);
            self.misses += 1;
            return None;
        }

        if let Some(entry) = self.entries.get_mut(key) {
            entry.last_used = Instant::now();
            self.hits += 1;
            return Some(entry.value.clone());
        }
        None
    }

    /// Store a result, evicting the least-recently-used entry at capacity
    pub fn insert(&mut self, key: String, value: Value) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.evict_lru();
        }

        let now = Instant::now();
        self.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
                last_used: now,
            },
        );
    }

    fn evict_lru(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries and reset statistics
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Fraction of lookups served from the cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_canonicalization() {
        let a = ResultCache::key("price_bond", &(1000.0, 5.0, 10.0, 5.0, 2u32));
        let b = ResultCache::key("price_bond", &(1000.0, 5.0, 10.0, 5.0, 2u32));
        let c = ResultCache::key("price_bond", &(1000.0, 5.0, 10.0, 6.0, 2u32));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("price_bond:"));
    }

    #[test]
    fn test_hit_miss_accounting() {
        let mut cache = ResultCache::new(10, Duration::from_secs(60));
        let key = ResultCache::key("npv", &(1000.0, 10.0));

        assert!(cache.get(&key).is_none());
        cache.insert(key.clone(), json!({"npv": -21.04}));
        assert!(cache.get(&key).is_some());

        assert_eq!(cache.hits, 1);
        assert_eq!(cache.misses, 1);
        assert!((cache.hit_rate() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_ttl_expiry() {
        let mut cache = ResultCache::new(10, Duration::from_millis(0));
        let key = ResultCache::key("irr", &[100.0, 200.0]);

        cache.insert(key.clone(), json!(0.097));
        std::thread::sleep(Duration::from_millis(5));

        // Past the TTL the entry is gone and counted as a miss
        assert!(cache.get(&key).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_lru_eviction_at_capacity() {
        let mut cache = ResultCache::new(2, Duration::from_secs(60));

        cache.insert("a".to_string(), json!(1));
        std::thread::sleep(Duration::from_millis(2));
        cache.insert("b".to_string(), json!(2));
        std::thread::sleep(Duration::from_millis(2));

        // Touch "a" so "b" becomes least recently used
        assert!(cache.get("a").is_some());
        std::thread::sleep(Duration::from_millis(2));

        cache.insert("c".to_string(), json!(3));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_clear_resets_stats() {
        let mut cache = ResultCache::new(4, Duration::from_secs(60));
        cache.insert("x".to_string(), json!(1));
        cache.get("x");
        cache.get("y");

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.hits, 0);
        assert_eq!(cache.misses, 0);
        assert_eq!(cache.hit_rate(), 0.0);
    }
}
