//! Error Types
//!
//! Only conditions a caller can reasonably react to are errors. Misuse of
//! the history API (exceeding a log's capacity, matching a return twice,
//! asking a timed-out result for its verdict) is a programming error and
//! panics instead.
//!
//! A history that is not linearizable is a verdict, not an error.

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Checker Error Types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Errors reported by the checker
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineaError {
    /// The search ran out of time before reaching a verdict
    #[error("Linearizability check timed out after {limit_ms}ms ({iterations} iterations)")]
    Timeout {
        /// Configured time limit
        limit_ms: u64,
        /// Iterations completed before the deadline
        iterations: u64,
    },

    /// The history cannot be sliced because an entry has no partition key
    #[error("Entry {entry_id} has no partition key and cannot be sliced")]
    NotPartitionable {
        /// Id of the offending call/return pair
        entry_id: usize,
    },

    /// A configuration value is out of range
    #[error("Invalid checker configuration: {0}")]
    InvalidConfig(String),
}

impl LineaError {
    /// Is this a timeout?
    ///
    /// A timeout says nothing about the history; retrying with a larger
    /// budget may still produce a verdict.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, LineaError>;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
