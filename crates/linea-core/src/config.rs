//! Checker Configuration
//!
//! [`CheckerConfig`] bundles everything that tunes a single check: which
//! memoization strategy the search uses, how large the LRU cache may grow,
//! and an optional wall-clock budget.
//!
//! The config is plain data and derives serde traits, so front-ends can load
//! it from JSON and override individual fields.
//!
//! ```json
//! { "cache": "lru", "lru_capacity": 8192, "timeout": { "secs": 5, "nanos": 0 } }
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::lru::DEFAULT_LRU_CAPACITY;
use crate::error::{LineaError, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Cache Policy
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// State memoization strategy
///
/// ```text
/// Disabled  every candidate state is novel       (no memory, most work)
/// Lru       bounded cache of recent states        (bounded memory)
/// Always    every visited (entries, state) pair   (unbounded memory, least work)
/// ```
///
/// The verdict never depends on the policy, only the amount of work does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CachePolicy {
    /// No memoization
    Disabled,
    /// Least-recently-used cache of bounded capacity
    Lru,
    /// Remember every visited configuration
    #[default]
    Always,
}

impl CachePolicy {
    /// All policies, in order of increasing memory use
    pub const ALL: [Self; 3] = [Self::Disabled, Self::Lru, Self::Always];

    /// Lowercase policy name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Lru => "lru",
            Self::Always => "always",
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CachePolicy {
    type Err = LineaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "disabled" | "never" | "none" => Ok(Self::Disabled),
            "lru" => Ok(Self::Lru),
            "always" => Ok(Self::Always),
            other => Err(LineaError::InvalidConfig(format!(
                "unknown cache policy '{other}' (expected disabled, lru or always)"
            ))),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Checker Config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Tuning knobs of a linearizability check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Memoization strategy
    pub cache: CachePolicy,
    /// Capacity of the cache when `cache` is [`CachePolicy::Lru`]
    pub lru_capacity: usize,
    /// Wall-clock budget for one check, unbounded if `None`
    pub timeout: Option<Duration>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            cache: CachePolicy::Always,
            lru_capacity: DEFAULT_LRU_CAPACITY,
            timeout: None,
        }
    }
}

impl CheckerConfig {
    /// Use the given memoization strategy
    #[must_use]
    pub fn with_cache(mut self, cache: CachePolicy) -> Self {
        self.cache = cache;
        self
    }

    /// Bound the LRU cache to `capacity` entries
    #[must_use]
    pub fn with_lru_capacity(mut self, capacity: usize) -> Self {
        self.lru_capacity = capacity;
        self
    }

    /// Give up after `timeout`
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Check that every value is in range
    pub fn validate(&self) -> Result<()> {
        if self.lru_capacity == 0 {
            return Err(LineaError::InvalidConfig(
                "lru_capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
