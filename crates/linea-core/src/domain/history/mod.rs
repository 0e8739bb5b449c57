//! History Log Model
//!
//! A history is a sequence of call and return entries, linked in recording
//! order and addressed through [`EntryRef`](crate::EntryRef)s into an arena.
//!
//! ```text
//!   Log / ConcurrentLog            LogInfo (copyable view)
//!   ┌──────────────────┐           ┌──────────────┐
//!   │ [0] call  id=0   │◄── head ──│ entries: &[] │
//!   │ [1] call  id=1   │           │ head         │
//!   │ [2] ret   id=1   │           │ entries: 4   │
//!   │ [3] ret   id=0   │           └──────────────┘
//!   └──────────────────┘
//! ```
//!
//! Checkers only ever read a history through [`LogInfo`]; the search works
//! on a private copy of the links, so one recorded history can be checked
//! any number of times.

pub mod concurrent;
pub mod entry;
pub mod log;

pub use concurrent::ConcurrentLog;
pub use entry::Entry;
pub use log::{Iter, Log, LogInfo};
