//! A bounded LRU cache used to memoize `String -> NormalizedPath` parses on
//! the router's hot lookup path.
use std::borrow::Borrow;
use std::hash::Hash;
use std::num::NonZeroUsize;

use lru::LruCache as Inner;

/// Capacity configuration for a [`LruCache`]. Rejects non-positive capacity
/// at construction, matching the "Out-of-capacity cache config" programmer
/// error in the core error taxonomy.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub capacity: NonZeroUsize,
}

impl CacheConfig {
    pub fn new(capacity: usize) -> Result<Self, CacheConfigError> {
        NonZeroUsize::new(capacity)
            .map(|capacity| Self { capacity })
            .ok_or(CacheConfigError::NonPositiveCapacity)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CacheConfigError {
    #[error("lru cache capacity must be positive")]
    NonPositiveCapacity,
}

/// Bounded cache with `get`/`set`; `set` on a full cache evicts the
/// least-recently-used entry, and `get` promotes its key to
/// most-recently-used. Not thread-safe on its own; callers (the router)
/// are responsible for giving each worker its own instance or wrapping it
/// in the synchronization appropriate to the host.
pub struct LruCache<K, V> {
    inner: Inner<K, V>,
}

impl<K: Hash + Eq, V> LruCache<K, V> {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Inner::new(config.capacity),
        }
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, CacheConfigError> {
        Ok(Self::new(CacheConfig::new(capacity)?))
    }

    /// Looks up `key`, promoting it to most-recently-used on a hit. Takes
    /// any borrowed form of `K` (e.g. `&str` against an `LruCache<String, _>`)
    /// so a cache hit never forces the caller to allocate an owned key first.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.get(key)
    }

    /// Inserts or updates `key`. Promotes `key` to most-recently-used.
    /// Evicts the least-recently-used entry if this insert would exceed
    /// capacity and `key` was not already present.
    pub fn set(&mut self, key: K, value: V) {
        self.inner.put(key, value);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_nonpositive_capacity() {
        assert!(matches!(
            CacheConfig::new(0),
            Err(CacheConfigError::NonPositiveCapacity)
        ));
    }

    #[test]
    fn evicts_least_recently_used_on_overflow() {
        let mut cache: LruCache<&str, u32> = LruCache::with_capacity(2).unwrap();
        cache.set("a", 1);
        cache.set("b", 2);
        // touch "a" so "b" becomes least-recently-used
        assert_eq!(cache.get(&"a"), Some(&1));
        cache.set("c", 3);
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.get(&"c"), Some(&3));
    }

    #[test]
    fn reinserting_existing_key_updates_without_growing() {
        let mut cache: LruCache<&str, u32> = LruCache::with_capacity(2).unwrap();
        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("a", 10);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a"), Some(&10));
    }
}
