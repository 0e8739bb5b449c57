//! Linea Linearizability Checker
//!
//! # Overview
//!
//! `linea-core` decides whether a recorded history of concurrent calls and
//! returns on a shared object could have been produced by some sequential
//! execution of that object's specification.
//!
//! ```text
//!   workers ──► ConcurrentLog ──► LogInfo ──► [Slicer] ──► LinearizabilityTester
//!                                                               │
//!                                               Specification ──┘──► CheckResult
//! ```
//!
//! # Layers
//!
//! - **Domain**: histories, the search engine, memoization and slicing
//! - **Infrastructure**: host-facing helpers (memory sampling)
//!
//! # Usage
//!
//! Implement [`Specification`] for the sequential model and [`Operation`]
//! for its calls and returns, record a history in a [`Log`] or
//! [`ConcurrentLog`], then run a [`LinearizabilityTester`] over its
//! [`LogInfo`]. Ready-made models live in the `linea-models` crate.
//!
//! # Logging
//!
//! The crate emits `tracing` events (check start and finish at `debug`,
//! backtracks at `trace`, timeouts at `warn`) and never installs a
//! subscriber.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{CachePolicy, CheckerConfig};
pub use domain::{
    compositional_check, Bitset, CheckResult, ConcurrentLog, Entry, EntryRef, FlexibleBitset,
    LinearizabilityTester, Log, LogInfo, LruCache, Operation, Slicer, Specification, TesterStats,
    ThreadId, Timeout,
};
pub use error::LineaError;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
