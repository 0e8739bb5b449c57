//! Linea Sequential Models
//!
//! # Overview
//!
//! Reference [`Specification`](linea_core::Specification) implementations
//! for the data types most often put under test:
//!
//! ```text
//!   ┌──────────┬──────────────────────────────┬─────────────┐
//!   │ model    │ operations                   │ sliceable   │
//!   ├──────────┼──────────────────────────────┼─────────────┤
//!   │ Set      │ empty contains insert erase  │ by value    │
//!   │ Register │ read write cas               │ no          │
//!   │ Stack<N> │ try_push try_pop             │ no          │
//!   │ Queue<N> │ try_enqueue try_dequeue      │ no          │
//!   └──────────┴──────────────────────────────┴─────────────┘
//! ```
//!
//! Every model pairs a state type with one operation enum holding both the
//! calls and the returns, so a history of a model is a plain
//! `Log<Model>`.
//!
//! States are persistent: applying an operation returns a new state and
//! leaves the old one untouched. Stack and queue states share structure
//! between versions, which keeps memoizing them cheap.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod queue;
pub mod register;
pub mod set;
pub mod stack;

pub use queue::{Queue, QueueOp};
pub use register::{Register, RegisterOp};
pub use set::{Set, SetOp};
pub use stack::{Stack, StackOp};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Render a boolean return the way every model prints it
pub(crate) fn bit(flag: bool) -> u8 {
    u8::from(flag)
}
