//! Local (in-process) cache tier
//!
//! The local tier is a best-effort accelerator in front of the remote tier.
//! Its contract is deliberately infallible: an adapter that cannot serve a
//! lookup can only report a miss, and writes are fire-and-forget. Eviction
//! policy belongs entirely to the implementation.

use moka::sync::Cache;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;

/// In-process key -> bytes store.
///
/// Operations must not perform network I/O, and implementations must be safe
/// for concurrent use. `get` returning `None` means "not cached here" — the
/// client falls through to the remote tier.
pub trait LocalCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    fn set(&self, key: &str, value: Vec<u8>);
    fn remove(&self, key: &str);
}

/// Unbounded in-memory cache over a read-write locked map.
///
/// No eviction: suitable for small, stable key spaces and for tests. For
/// anything size-sensitive, use [`BoundedCache`].
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries. Primarily for tests and diagnostics.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl LocalCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: Vec<u8>) {
        self.entries.write().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}

/// Bounded in-memory cache backed by moka, with optional per-entry TTL.
///
/// Moka handles concurrent eviction internally; entries past the capacity
/// bound are evicted by its TinyLFU policy.
pub struct BoundedCache {
    cache: Cache<String, Vec<u8>>,
}

impl BoundedCache {
    /// Create a cache holding at most `max_entries` entries.
    pub fn new(max_entries: u64) -> Self {
        Self {
            cache: Cache::builder().max_capacity(max_entries).build(),
        }
    }

    /// Create a cache holding at most `max_entries` entries, each expiring
    /// `ttl` after insertion.
    pub fn with_ttl(max_entries: u64, ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(max_entries)
                .time_to_live(ttl)
                .build(),
        }
    }
}

impl LocalCache for BoundedCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.cache.get(key)
    }

    fn set(&self, key: &str, value: Vec<u8>) {
        self.cache.insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.cache.invalidate(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise_basic_ops(cache: &dyn LocalCache) {
        assert_eq!(cache.get("a"), None);

        cache.set("a", b"alpha".to_vec());
        cache.set("b", b"beta".to_vec());
        assert_eq!(cache.get("a"), Some(b"alpha".to_vec()));
        assert_eq!(cache.get("b"), Some(b"beta".to_vec()));

        cache.set("a", b"alpha2".to_vec());
        assert_eq!(cache.get("a"), Some(b"alpha2".to_vec()));

        cache.remove("a");
        assert_eq!(cache.get("a"), None);

        // Removing an absent key is a no-op.
        cache.remove("a");
        cache.remove("never-set");
    }

    #[test]
    fn test_memory_cache_basic_ops() {
        let cache = MemoryCache::new();
        exercise_basic_ops(&cache);
        assert_eq!(cache.len(), 1); // only "b" survives
    }

    #[test]
    fn test_bounded_cache_basic_ops() {
        let cache = BoundedCache::new(1000);
        exercise_basic_ops(&cache);
    }

    #[test]
    fn test_bounded_cache_ttl_expiry() {
        let cache = BoundedCache::with_ttl(1000, Duration::from_millis(20));
        cache.set("k", b"v".to_vec());
        assert_eq!(cache.get("k"), Some(b"v".to_vec()));

        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_memory_cache_concurrent_access() {
        use std::sync::Arc;

        let cache = Arc::new(MemoryCache::new());
        let mut handles = Vec::new();

        for worker in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(std::thread::spawn(move || {
                for i in 0..1000 {
                    let key = format!("key-{}", i % 16);
                    match i % 3 {
                        0 => cache.set(&key, vec![worker as u8; 8]),
                        1 => {
                            let _ = cache.get(&key);
                        }
                        _ => cache.remove(&key),
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
