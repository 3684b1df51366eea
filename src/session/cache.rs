//! Bounded in-memory cache with TTL expiry and LRU eviction
//!
//! Generic over key/value types, internally synchronized and tracking
//! hit/miss/eviction metrics.
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Time-to-live for cached entries
    pub ttl: Duration,

    /// Maximum number of entries (LRU eviction when exceeded)
    pub capacity: usize,
}

impl CacheConfig {
    pub fn custom(ttl_secs: u64, capacity: usize) -> Self {
        Self {
            ttl: Duration::from_secs(ttl_secs),
            capacity,
        }
    }
}

struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() > ttl
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub inserts: u64,
}

impl CacheMetrics {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct CacheState<K, V> {
    data: HashMap<K, CacheEntry<V>>,
    // Front is least recently used
    access_order: VecDeque<K>,
    metrics: CacheMetrics,
}

impl<K: Clone + Eq + Hash, V> CacheState<K, V> {
    fn touch(&mut self, key: &K) {
        self.access_order.retain(|k| k != key);
        self.access_order.push_back(key.clone());
    }

    fn forget(&mut self, key: &K) {
        self.data.remove(key);
        self.access_order.retain(|k| k != key);
    }

    /// Drop `key` if it has outlived the TTL; returns true when it did
    fn expire_if_stale(&mut self, key: &K, ttl: Duration) -> bool {
        let stale = self
            .data
            .get(key)
            .map(|entry| entry.is_expired(ttl))
            .unwrap_or(false);
        if stale {
            self.forget(key);
            self.metrics.expirations += 1;
        }
        stale
    }

    fn evict_lru(&mut self) {
        if let Some(lru_key) = self.access_order.pop_front() {
            self.data.remove(&lru_key);
            self.metrics.evictions += 1;
        }
    }

    fn store(&mut self, key: K, value: V, capacity: usize) {
        if self.data.len() >= capacity && !self.data.contains_key(&key) {
            self.evict_lru();
        }
        self.data.insert(key.clone(), CacheEntry::new(value));
        self.touch(&key);
        self.metrics.inserts += 1;
    }
}

pub struct CacheManager<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    config: CacheConfig,
    state: RwLock<CacheState<K, V>>,
}

impl<K, V> CacheManager<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config: CacheConfig {
                capacity: config.capacity.max(1),
                ..config
            },
            state: RwLock::new(CacheState {
                data: HashMap::new(),
                access_order: VecDeque::new(),
                metrics: CacheMetrics::default(),
            }),
        }
    }

    /// Get a value; expired entries are removed and count as misses
    pub fn get(&self, key: &K) -> Option<V> {
        let mut state = self.state.write();

        if state.expire_if_stale(key, self.config.ttl) {
            state.metrics.misses += 1;
            return None;
        }

        match state.data.get(key).map(|entry| entry.value.clone()) {
            Some(value) => {
                state.touch(key);
                state.metrics.hits += 1;
                Some(value)
            }
            None => {
                state.metrics.misses += 1;
                None
            }
        }
    }

    /// Insert or replace a value, evicting the least recently used entry at capacity
    pub fn insert(&self, key: K, value: V) {
        let mut state = self.state.write();
        state.store(key, value, self.config.capacity);
    }

    /// Insert only when no live entry exists; returns true if inserted
    ///
    /// The check and the insert happen under one lock, so concurrent callers
    /// racing on the same key see exactly one `true`.
    pub fn insert_if_absent(&self, key: K, value: V) -> bool {
        let mut state = self.state.write();
        state.expire_if_stale(&key, self.config.ttl);
        if state.data.contains_key(&key) {
            state.metrics.hits += 1;
            return false;
        }
        state.metrics.misses += 1;
        state.store(key, value, self.config.capacity);
        true
    }

    /// Remove every expired entry, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let mut state = self.state.write();
        let ttl = self.config.ttl;
        let stale: Vec<K> = state
            .data
            .iter()
            .filter(|(_, entry)| entry.is_expired(ttl))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &stale {
            state.forget(key);
        }
        state.metrics.expirations += stale.len() as u64;
        stale.len()
    }

    pub fn metrics(&self) -> CacheMetrics {
        self.state.read().metrics.clone()
    }

    pub fn len(&self) -> usize {
        self.state.read().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn short_ttl(capacity: usize) -> CacheConfig {
        CacheConfig {
            ttl: Duration::from_millis(50),
            capacity,
        }
    }

    #[test]
    fn test_basic_operations() {
        let cache = CacheManager::new(CacheConfig::custom(60, 100));

        cache.insert("key1".to_string(), "value1".to_string());
        assert_eq!(cache.get(&"key1".to_string()), Some("value1".to_string()));
        assert_eq!(cache.get(&"nonexistent".to_string()), None);

        let metrics = cache.metrics();
        assert_eq!(metrics.hits, 1);
        assert_eq!(metrics.misses, 1);
        assert_eq!(metrics.inserts, 1);
        assert_eq!(metrics.hit_rate(), 0.5);
    }

    #[test]
    fn test_ttl_expiration() {
        let cache = CacheManager::new(short_ttl(100));

        cache.insert("key".to_string(), 1u32);
        assert_eq!(cache.get(&"key".to_string()), Some(1));

        thread::sleep(Duration::from_millis(150));
        assert_eq!(cache.get(&"key".to_string()), None);
        assert_eq!(cache.metrics().expirations, 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_lru_eviction_respects_access() {
        let cache = CacheManager::new(CacheConfig::custom(60, 2));

        cache.insert("key1", 1);
        cache.insert("key2", 2);
        // Touch key1 so key2 becomes least recently used
        assert_eq!(cache.get(&"key1"), Some(1));
        cache.insert("key3", 3);

        assert_eq!(cache.get(&"key2"), None);
        assert_eq!(cache.get(&"key1"), Some(1));
        assert_eq!(cache.get(&"key3"), Some(3));
        assert_eq!(cache.metrics().evictions, 1);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_insert_if_absent() {
        let cache = CacheManager::new(short_ttl(10));

        assert!(cache.insert_if_absent("tx", ()));
        assert!(!cache.insert_if_absent("tx", ()));

        thread::sleep(Duration::from_millis(150));
        assert!(cache.insert_if_absent("tx", ()));
    }

    #[test]
    fn test_purge_expired() {
        let cache = CacheManager::new(short_ttl(10));
        cache.insert("a", 1);
        cache.insert("b", 2);
        thread::sleep(Duration::from_millis(150));
        cache.insert("c", 3);

        assert_eq!(cache.purge_expired(), 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"c"), Some(3));
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let cache = CacheManager::new(CacheConfig::custom(60, 0));
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"b"), Some(2));
    }
}
