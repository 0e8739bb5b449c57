//! Bounded history log and the history descriptor handed to checkers

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::entry::{set_match, Entry};
use crate::domain::spec::Specification;
use crate::domain::types::{EntryRef, ThreadId};

/// Lightweight, copyable descriptor of a history
///
/// Borrows the arena that holds the entries, so a `LogInfo` can never
/// outlive the [`Log`], [`ConcurrentLog`](super::ConcurrentLog) or
/// [`Slicer`](crate::Slicer) it came from.
pub struct LogInfo<'a, S: Specification> {
    entries: &'a [Entry<S>],
    head: Option<EntryRef>,
    number_of_entries: usize,
}

impl<S: Specification> Clone for LogInfo<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Specification> Copy for LogInfo<'_, S> {}

impl<'a, S: Specification> LogInfo<'a, S> {
    /// Descriptor of the empty history
    pub fn empty() -> Self {
        Self {
            entries: &[],
            head: None,
            number_of_entries: 0,
        }
    }

    pub(crate) fn new(entries: &'a [Entry<S>], head: EntryRef, number_of_entries: usize) -> Self {
        assert!(number_of_entries > 0, "non-empty history expected");
        assert!(
            number_of_entries % 2 == 0,
            "every call needs a return, got {number_of_entries} entries"
        );
        assert!(head.index() < entries.len(), "log head {head} out of bounds");

        Self {
            entries,
            head: Some(head),
            number_of_entries,
        }
    }

    /// First entry of the history
    pub fn log_head(&self) -> Option<EntryRef> {
        self.head
    }

    /// Total number of calls plus returns (always even)
    pub fn number_of_entries(&self) -> usize {
        self.number_of_entries
    }

    /// Number of call entries
    pub fn number_of_calls(&self) -> usize {
        self.number_of_entries / 2
    }

    /// True for the empty history
    pub fn is_empty(&self) -> bool {
        self.head.is_none() && self.number_of_entries == 0
    }

    /// Resolve an entry reference
    ///
    /// # Panics
    ///
    /// Panics if `entry` does not belong to this history's arena.
    pub fn entry(&self, entry: EntryRef) -> &'a Entry<S> {
        &self.entries[entry.index()]
    }

    pub(crate) fn arena_len(&self) -> usize {
        self.entries.len()
    }

    /// Walk the history in recording order
    pub fn iter(&self) -> Iter<'a, S> {
        Iter {
            entries: self.entries,
            cursor: self.head,
        }
    }
}

impl<S: Specification> fmt::Display for LogInfo<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "log info, number of entries: {}", self.number_of_entries)?;
        for (_, entry) in self.iter() {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

impl<S: Specification> fmt::Debug for LogInfo<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogInfo")
            .field("head", &self.head)
            .field("number_of_entries", &self.number_of_entries)
            .finish()
    }
}

/// Iterator over the entries of a [`LogInfo`], following `next` links
pub struct Iter<'a, S: Specification> {
    entries: &'a [Entry<S>],
    cursor: Option<EntryRef>,
}

impl<'a, S: Specification> Iterator for Iter<'a, S> {
    type Item = (EntryRef, &'a Entry<S>);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        let entry = &self.entries[current.index()];
        self.cursor = entry.next;
        Some((current, entry))
    }
}

/// Bounded, single-threaded history log
///
/// Use [`ConcurrentLog`](super::ConcurrentLog) to record from several
/// threads at once.
///
/// # Example
///
/// ```rust,ignore
/// let mut log = Log::<Set>::new(4);
/// let call = log.add_call(SetOp::InsertCall(1));
/// log.add_ret(call, SetOp::Ret(true));
///
/// let mut tester = LinearizabilityTester::new(log.info());
/// assert!(tester.check()?);
/// ```
pub struct Log<S: Specification> {
    entries: Vec<Entry<S>>,
    capacity: usize,
    next_entry_id: usize,
}

impl<S: Specification> Log<S> {
    /// A history with room for at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            next_entry_id: 0,
        }
    }

    /// Deep-copy a history into fresh storage
    ///
    /// Entry ids and call/return pairing are preserved; operations are
    /// shared with the source.
    pub fn from_info(info: &LogInfo<'_, S>) -> Self {
        let mut log = Self::new(info.number_of_entries());
        let mut calls: HashMap<usize, EntryRef> = HashMap::with_capacity(info.number_of_calls());

        for (_, entry) in info.iter() {
            if entry.is_call() {
                let call = log.push_call(Arc::clone(entry.op_arc()), entry.thread_id());
                log.entries[call.index()].set_entry_id(entry.entry_id());
                log.next_entry_id = log.next_entry_id.max(entry.entry_id() + 1);
                calls.insert(entry.entry_id(), call);
            } else {
                let Some(&call) = calls.get(&entry.entry_id()) else {
                    panic!("return with entry id {} precedes its call", entry.entry_id());
                };
                log.push_ret(call, Arc::clone(entry.op_arc()), entry.thread_id());
            }
        }

        log
    }

    /// Append a call entry and give it the next entry id
    ///
    /// # Panics
    ///
    /// Panics if the log is full.
    pub fn add_call(&mut self, op: S::Op) -> EntryRef {
        self.push_call(Arc::new(op), ThreadId::default())
    }

    /// Append the return entry of `call`
    ///
    /// # Panics
    ///
    /// Panics if the log is full, if `call` is not a call, or if `call`
    /// already has a return.
    pub fn add_ret(&mut self, call: EntryRef, op: S::Op) -> EntryRef {
        self.push_ret(call, Arc::new(op), ThreadId::default())
    }

    pub(crate) fn push_call(&mut self, op: Arc<S::Op>, thread_id: ThreadId) -> EntryRef {
        let entry_id = self.next_entry_id;
        self.next_entry_id += 1;
        self.push(Entry::new(op, entry_id, thread_id, true))
    }

    pub(crate) fn push_ret(&mut self, call: EntryRef, op: Arc<S::Op>, thread_id: ThreadId) -> EntryRef {
        assert!(call.index() < self.entries.len(), "unknown call entry {call}");
        let ret = self.push(Entry::new(op, 0, thread_id, false));
        set_match(&mut self.entries, call, ret);
        ret
    }

    fn push(&mut self, mut entry: Entry<S>) -> EntryRef {
        assert!(
            self.entries.len() < self.capacity,
            "Log capacity {} exceeded",
            self.capacity
        );

        let index = EntryRef(self.entries.len());
        if let Some(last) = self.entries.last_mut() {
            last.next = Some(index);
            entry.prev = Some(EntryRef(index.index() - 1));
        }
        self.entries.push(entry);
        index
    }

    /// First entry, if any
    pub fn log_head(&self) -> Option<EntryRef> {
        (!self.entries.is_empty()).then_some(EntryRef(0))
    }

    /// Resolve an entry reference
    pub fn entry(&self, entry: EntryRef) -> &Entry<S> {
        &self.entries[entry.index()]
    }

    /// Total number of calls plus returns
    pub fn number_of_entries(&self) -> usize {
        self.entries.len()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Descriptor of the recorded history
    ///
    /// # Panics
    ///
    /// Panics if some call has no return yet.
    pub fn info(&self) -> LogInfo<'_, S> {
        match self.log_head() {
            Some(head) => LogInfo::new(&self.entries, head, self.entries.len()),
            None => LogInfo::empty(),
        }
    }
}

impl<S: Specification> From<LogInfo<'_, S>> for Log<S> {
    fn from(info: LogInfo<'_, S>) -> Self {
        Self::from_info(&info)
    }
}

impl<S: Specification> fmt::Debug for Log<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Log")
            .field("capacity", &self.capacity)
            .field("entries", &self.entries)
            .finish()
    }
}
