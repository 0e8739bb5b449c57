//! State Memoization
//!
//! The search revisits the same configuration (set of linearized calls,
//! sequential state) along many different paths. Remembering which
//! configurations have been seen lets it prune every path after the first.
//!
//! # Key
//!
//! ```text
//! CacheKey = (linearized entries, state)
//! hash     = rotl(bitset_hash, 7) ^ state_hash
//! ```
//!
//! Both components compare by exact equality, so a hash collision never
//! causes a configuration to be skipped.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use crate::config::{CachePolicy, CheckerConfig};
use crate::domain::bitset::Bitset;
use crate::domain::lru::LruCache;
use crate::domain::spec::Specification;

/// A visited search configuration
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct CacheKey<S: Specification> {
    linearized: Bitset,
    state: S,
}

impl<S: Specification> Hash for CacheKey<S> {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        hasher.write_u64(self.linearized.hash_code().rotate_left(7) ^ self.state.hash_code());
    }
}

/// Per-check memoization table
pub(crate) enum StateCache<S: Specification> {
    Disabled,
    Lru(LruCache<CacheKey<S>>),
    Always(HashSet<CacheKey<S>>),
}

impl<S: Specification> StateCache<S> {
    pub(crate) fn new(config: &CheckerConfig) -> Self {
        match config.cache {
            CachePolicy::Disabled => Self::Disabled,
            CachePolicy::Lru => Self::Lru(LruCache::new(config.lru_capacity)),
            CachePolicy::Always => Self::Always(HashSet::new()),
        }
    }

    /// Record `state` reached by linearizing `entry_id` on top of `linearized`
    ///
    /// Returns `true` if the configuration has not been seen before.
    pub(crate) fn try_insert(&mut self, state: &S, linearized: &Bitset, entry_id: usize) -> bool {
        let key = || CacheKey {
            linearized: linearized.with_set(entry_id),
            state: state.clone(),
        };

        match self {
            Self::Disabled => true,
            Self::Lru(cache) => cache.insert(key()),
            Self::Always(cache) => cache.insert(key()),
        }
    }

    /// Number of remembered configurations
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Disabled => 0,
            Self::Lru(cache) => cache.len(),
            Self::Always(cache) => cache.len(),
        }
    }
}
