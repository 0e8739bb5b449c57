//! Linearizability Search Engine
//!
//! # Overview
//!
//! A [`LinearizabilityTester`] takes a complete history and searches for a
//! sequential ordering of its calls that respects real-time order and is
//! accepted by the sequential specification.
//!
//! ```text
//! ┌──────────────────────────┐
//! │ LinearizabilityTester    │
//! ├──────────────────────────┤
//! │ - working links          │  private copy of the history order
//! │ - provisional stack      │  (call, state before call)
//! │ - linearized bitset      │  entry ids already placed
//! │ - state cache            │  Disabled | Lru | Always
//! │ - timeout                │  polled once per iteration
//! └──────────────────────────┘
//!              │
//!              ▼
//!        CheckResult (verdict, witness, trace)
//! ```

pub mod engine;
pub mod result;
pub mod timeout;

pub use engine::{LinearizabilityTester, TesterStats};
pub use result::{CheckResult, DebugTrace};
pub use timeout::Timeout;
