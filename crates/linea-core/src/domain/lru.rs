//! Bounded Recency Cache
//!
//! A thin wrapper over [`::lru::LruCache`] with insertion semantics tuned for
//! state memoization: `insert` answers "was this key new?" and refreshes the
//! recency of keys that were already present.
//!
//! # Eviction
//!
//! Eviction happens right after an insertion brings the size up to the
//! capacity, so the cache holds at most `capacity - 1` keys between calls.
//!
//! ```text
//! capacity = 3
//!
//! insert(1)  -> true   [1]
//! insert(2)  -> true   [2, 1]
//! insert(3)  -> true   [3, 2]      (1 evicted)
//! insert(1)  -> true   [1, 3]      (2 evicted)
//! ```

use std::hash::Hash;

/// Default capacity used when memoizing with [`CachePolicy::Lru`](crate::CachePolicy::Lru)
pub const DEFAULT_LRU_CAPACITY: usize = 4096;

/// Set of keys with least-recently-used eviction
#[derive(Debug)]
pub struct LruCache<K: Hash + Eq> {
    inner: ::lru::LruCache<K, ()>,
    capacity: usize,
}

impl<K: Hash + Eq> LruCache<K> {
    /// Create an empty cache
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "LruCache capacity must be positive");
        Self {
            inner: ::lru::LruCache::unbounded(),
            capacity,
        }
    }

    /// Insert `key`, marking it most recently used
    ///
    /// Returns `true` if the key was not already present.
    pub fn insert(&mut self, key: K) -> bool {
        let fresh = self.inner.put(key, ()).is_none();
        if self.inner.len() == self.capacity {
            self.inner.pop_lru();
        }
        fresh
    }

    /// Is `key` present? Does not change its recency.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.contains(key)
    }

    /// Number of cached keys
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True if no key is cached
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every key
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl<K: Hash + Eq> Default for LruCache<K> {
    fn default() -> Self {
        Self::new(DEFAULT_LRU_CAPACITY)
    }
}
