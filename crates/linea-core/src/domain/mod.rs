//! Domain Layer
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Domain Layer                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  Primitives             History                             │
//! │  ├─ Bitset              ├─ Entry / EntryRef                 │
//! │  ├─ FlexibleBitset      ├─ Log / LogInfo                    │
//! │  └─ LruCache            └─ ConcurrentLog                    │
//! │                                                             │
//! │  Contract               Search                              │
//! │  ├─ Specification       ├─ LinearizabilityTester            │
//! │  └─ Operation           ├─ StateCache (memoization)         │
//! │                         ├─ CheckResult / Timeout            │
//! │                         └─ Slicer / compositional_check     │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod bitset;
pub mod history;
pub mod lru;
pub mod slicer;
pub mod spec;
pub mod tester;
pub mod types;

pub(crate) mod cache;

#[cfg(kani)]
mod proof;

pub use bitset::{Bitset, FlexibleBitset};
pub use history::{ConcurrentLog, Entry, Log, LogInfo};
pub use self::lru::LruCache;
pub use slicer::{compositional_check, Slicer};
pub use spec::{Operation, Specification};
pub use tester::{CheckResult, LinearizabilityTester, TesterStats, Timeout};
pub use types::{EntryRef, ThreadId};
