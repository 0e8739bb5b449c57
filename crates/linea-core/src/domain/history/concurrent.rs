//! Thread-safe history recording
//!
//! # Overview
//!
//! Worker threads record calls and returns while they exercise the object
//! under test. The only point of contention is a single atomic write
//! index; every slot is written exactly once by the thread that claimed it.
//!
//! ```text
//!   thread A ──push_back──┐
//!                         ├──► fetch_add(index) ──► slots[i].set(..)
//!   thread B ──push_ret───┘
//!
//!   after join:  &mut log ──► finalize ──► Log (ids + links in slot order)
//! ```
//!
//! Finalization requires `&mut self`, so it can only happen once every
//! producer has released its shared borrow (typically after the workers
//! have been joined and the `Arc` unwrapped).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use tracing::debug;

use super::log::{Log, LogInfo};
use crate::domain::spec::Specification;
use crate::domain::types::{EntryRef, ThreadId};

struct Slot<S: Specification> {
    op: Arc<S::Op>,
    thread_id: ThreadId,
    call: Option<EntryRef>,
}

/// Bounded history log that many threads can append to
pub struct ConcurrentLog<S: Specification> {
    slots: Box<[OnceLock<Slot<S>>]>,
    index: AtomicUsize,
    log: Option<Log<S>>,
}

impl<S: Specification> ConcurrentLog<S> {
    /// A history with room for at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| OnceLock::new()).collect(),
            index: AtomicUsize::new(0),
            log: None,
        }
    }

    /// Record a call made by the current thread
    ///
    /// # Panics
    ///
    /// Panics if the log is full or already finalized.
    pub fn push_back(&self, op: S::Op) -> EntryRef {
        self.claim(Arc::new(op), None)
    }

    /// Record the return of `call` on the current thread
    ///
    /// # Panics
    ///
    /// Panics if the log is full or already finalized.
    pub fn push_ret(&self, call: EntryRef, op: S::Op) -> EntryRef {
        self.claim(Arc::new(op), Some(call))
    }

    fn claim(&self, op: Arc<S::Op>, call: Option<EntryRef>) -> EntryRef {
        assert!(self.log.is_none(), "ConcurrentLog is already finalized");

        // no other memory location is published through the index
        let index = self.index.fetch_add(1, Ordering::Relaxed);
        assert!(
            index < self.slots.len(),
            "ConcurrentLog capacity {} exceeded",
            self.slots.len()
        );

        let slot = Slot {
            op,
            thread_id: ThreadId::current(),
            call,
        };
        let written = self.slots[index].set(slot).is_ok();
        debug_assert!(written, "slot {index} written twice");

        EntryRef(index)
    }

    /// Number of claimed slots
    ///
    /// Only exact once every producer has finished.
    pub fn number_of_entries(&self) -> usize {
        self.index.load(Ordering::Acquire).min(self.slots.len())
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// First entry of the recorded history
    pub fn log_head(&mut self) -> Option<EntryRef> {
        self.finalize().log_head()
    }

    /// Descriptor of the recorded history
    ///
    /// The first call links the entries in slot order and numbers the
    /// calls; later calls return the same history.
    ///
    /// # Panics
    ///
    /// Panics if a return was recorded for an unknown call, if a call has
    /// two returns, or if some call has no return.
    pub fn info(&mut self) -> LogInfo<'_, S> {
        self.finalize().info()
    }

    fn finalize(&mut self) -> &Log<S> {
        let len = (*self.index.get_mut()).min(self.slots.len());
        let slots = &self.slots;
        self.log.get_or_insert_with(|| assemble(slots, len))
    }
}

/// Link the first `len` slots into a log, numbering calls in slot order
fn assemble<S: Specification>(slots: &[OnceLock<Slot<S>>], len: usize) -> Log<S> {
    let mut log = Log::new(len);

    for (i, slot) in slots.iter().take(len).enumerate() {
        let Some(slot) = slot.get() else {
            panic!("slot {i} was claimed but never written");
        };

        // slot order equals log order, so `EntryRef`s stay valid
        match slot.call {
            None => log.push_call(Arc::clone(&slot.op), slot.thread_id),
            Some(call) => {
                assert!(call.index() < i, "return at {i} precedes its call {call}");
                log.push_ret(call, Arc::clone(&slot.op), slot.thread_id)
            }
        };
    }

    debug!(entries = len, "concurrent log finalized");
    log
}
