//! Call and return entries

use std::fmt;
use std::sync::Arc;

use crate::domain::spec::{Operation, Specification};
use crate::domain::types::{EntryRef, ThreadId};

/// One event of a history: a call or its matching return
///
/// A call and its return share the same `entry_id`. Entries are linked in
/// the order in which they were recorded through `prev`/`next`, expressed as
/// [`EntryRef`]s into the owning log.
pub struct Entry<S: Specification> {
    op: Arc<S::Op>,
    entry_id: usize,
    thread_id: ThreadId,
    matched: Option<EntryRef>,
    is_call: bool,
    partition: Option<u32>,
    pub(crate) prev: Option<EntryRef>,
    pub(crate) next: Option<EntryRef>,
}

impl<S: Specification> Entry<S> {
    pub(crate) fn new(op: Arc<S::Op>, entry_id: usize, thread_id: ThreadId, is_call: bool) -> Self {
        let partition = op.partition();
        Self {
            op,
            entry_id,
            thread_id,
            matched: None,
            is_call,
            partition,
            prev: None,
            next: None,
        }
    }

    /// The recorded operation
    #[inline]
    pub fn op(&self) -> &S::Op {
        &self.op
    }

    pub(crate) fn op_arc(&self) -> &Arc<S::Op> {
        &self.op
    }

    /// Identifier shared by a call and its return
    #[inline]
    pub fn entry_id(&self) -> usize {
        self.entry_id
    }

    pub(crate) fn set_entry_id(&mut self, entry_id: usize) {
        self.entry_id = entry_id;
    }

    /// Thread that recorded this entry
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// The paired entry: the return of a call, or the call of a return
    #[inline]
    pub fn matched(&self) -> Option<EntryRef> {
        self.matched
    }

    /// Is this a call entry?
    #[inline]
    pub fn is_call(&self) -> bool {
        self.is_call
    }

    /// Partition key, resolved from whichever side of the pair defines one
    #[inline]
    pub fn partition(&self) -> Option<u32> {
        self.partition
    }

    /// Previous entry in recording order
    #[inline]
    pub fn prev(&self) -> Option<EntryRef> {
        self.prev
    }

    /// Next entry in recording order
    #[inline]
    pub fn next(&self) -> Option<EntryRef> {
        self.next
    }
}

/// Pair the call at `call` with the return at `ret`
///
/// The return inherits the call's id. If either side defines a partition
/// key, both end up with it; the return's key wins when both do.
///
/// # Panics
///
/// Panics if `ret` is already matched, if `ret` is a call, or if `call` is
/// not a call.
pub(crate) fn set_match<S: Specification>(entries: &mut [Entry<S>], call: EntryRef, ret: EntryRef) {
    let (entry_id, call_partition) = {
        let call_entry = &entries[call.index()];
        assert!(call_entry.is_call, "entry {call} is not a call");
        assert!(
            call_entry.matched.is_none(),
            "call {call} is already matched"
        );
        (call_entry.entry_id, call_entry.partition)
    };

    let ret_entry = &mut entries[ret.index()];
    assert!(ret_entry.matched.is_none(), "return {ret} is already matched");
    assert!(!ret_entry.is_call, "entry {ret} is a call, not a return");

    let partition = ret_entry.partition.or(call_partition);
    ret_entry.matched = Some(call);
    ret_entry.entry_id = entry_id;
    ret_entry.partition = partition;

    let call_entry = &mut entries[call.index()];
    call_entry.matched = Some(ret);
    call_entry.partition = partition;
}

impl<S: Specification> fmt::Display for Entry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "entry id: {}, thread id: {}, {}: {}",
            self.entry_id,
            self.thread_id,
            if self.is_call { "call" } else { "return" },
            self.op
        )
    }
}

impl<S: Specification> fmt::Debug for Entry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("entry_id", &self.entry_id)
            .field("thread_id", &self.thread_id)
            .field("is_call", &self.is_call)
            .field("op", &format_args!("{}", self.op))
            .field("matched", &self.matched)
            .field("partition", &self.partition)
            .finish()
    }
}
