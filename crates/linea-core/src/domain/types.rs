//! Identifier Types - Foundation for the History Model
//!
//! Entries never move once they are written into a log, so every reference
//! between entries (call to return, `prev`/`next` links, witness orders) is
//! expressed as an [`EntryRef`] index into the owning arena rather than a
//! pointer.

use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_THREAD_ID: AtomicUsize = AtomicUsize::new(1);

thread_local! {
    static CURRENT_THREAD_ID: Cell<usize> = const { Cell::new(0) };
}

/// Thread identifier recorded with every entry
///
/// Logs built on a single thread leave every entry at `ThreadId(0)`.
/// [`ThreadId::current`] hands out small, stable, process-wide numbers
/// (starting at 1) so that traces stay readable.
///
/// # Example
///
/// ```rust
/// use linea_core::ThreadId;
///
/// let main = ThreadId::current();
/// let worker = std::thread::spawn(ThreadId::current).join().unwrap();
///
/// assert_ne!(main, worker);
/// assert_eq!(main, ThreadId::current());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ThreadId(pub usize);

impl ThreadId {
    /// Create a new ThreadId
    #[inline(always)]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the raw numeric ID
    #[inline(always)]
    pub const fn as_usize(self) -> usize {
        self.0
    }

    /// Identifier of the calling OS thread
    ///
    /// Assigned lazily on first use and never reused within the process.
    pub fn current() -> Self {
        CURRENT_THREAD_ID.with(|id| {
            if id.get() == 0 {
                id.set(NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed));
            }
            Self(id.get())
        })
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of an entry inside the arena of its log
///
/// An `EntryRef` is only meaningful together with the log (or
/// [`LogInfo`](crate::LogInfo)) that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryRef(pub(crate) usize);

impl EntryRef {
    /// Get the raw arena index
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EntryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
