//! Bounded FIFO queue
//!
//! A queue state is an immutable snapshot of its live values, oldest first,
//! shared between states through an `Rc`. Cloning a state is a reference
//! count bump; enqueue and dequeue build a new snapshot of at most `N`
//! values, so a state never holds more than its own window.
//!
//! ```text
//!   enqueue 1, 2, 3 then dequeue
//!
//!   [1, 2, 3] ──dequeue──► [2, 3]
//!    front                  front
//! ```
//!
//! The hash is a polynomial over the values, updated in constant time on
//! enqueue and with one power of the base on dequeue. `front` is a slice
//! lookup.

use std::fmt;
use std::rc::Rc;

use linea_core::{Operation, Specification};

use crate::bit;

const HASH_BASE: u64 = 31;

/// Sequential queue holding at most `N` values
#[derive(Clone)]
pub struct Queue<const N: usize> {
    values: Rc<[u8]>,
    hash: u64,
}

fn weight(value: u8) -> u64 {
    u64::from(value) + 1
}

impl<const N: usize> Default for Queue<N> {
    fn default() -> Self {
        Self {
            values: Rc::from(&[] as &[u8]),
            hash: 0,
        }
    }
}

impl<const N: usize> Queue<N> {
    /// Empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the queue has no elements
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True if the queue holds `N` elements
    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    /// Oldest value
    pub fn front(&self) -> Option<u8> {
        self.values.first().copied()
    }

    /// Queue with `value` at the back
    ///
    /// # Panics
    ///
    /// Panics if the queue is full.
    #[must_use]
    pub fn enqueue(&self, value: u8) -> Self {
        assert!(!self.is_full(), "enqueue onto a full queue (capacity {N})");

        let mut values = Vec::with_capacity(self.len() + 1);
        values.extend_from_slice(&self.values);
        values.push(value);

        Self {
            values: Rc::from(values),
            hash: self.hash.wrapping_mul(HASH_BASE).wrapping_add(weight(value)),
        }
    }

    /// Queue without its oldest value
    ///
    /// # Panics
    ///
    /// Panics if the queue is empty.
    #[must_use]
    pub fn dequeue(&self) -> Self {
        let Some((&front, rest)) = self.values.split_first() else {
            panic!("dequeue from an empty queue");
        };

        let exponent = u32::try_from(rest.len()).unwrap_or(u32::MAX);
        let hash = self
            .hash
            .wrapping_sub(weight(front).wrapping_mul(HASH_BASE.wrapping_pow(exponent)));

        Self {
            values: Rc::from(rest),
            hash,
        }
    }

    /// Values from oldest to newest
    pub fn to_vec(&self) -> Vec<u8> {
        self.values.to_vec()
    }
}

impl<const N: usize> PartialEq for Queue<N> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.values, &other.values)
            || (self.hash == other.hash && self.values == other.values)
    }
}

impl<const N: usize> Eq for Queue<N> {}

impl<const N: usize> fmt::Debug for Queue<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.values.iter()).finish()
    }
}

impl<const N: usize> Specification for Queue<N> {
    type Op = QueueOp;

    fn hash_code(&self) -> u64 {
        self.hash
    }
}

/// Calls and returns on a [`Queue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueOp {
    /// `try_enqueue(value)`
    TryEnqueue(u8),
    /// `try_enqueue` returned; true if the value was enqueued
    TryEnqueueRet(bool),
    /// `try_dequeue()`
    TryDequeue,
    /// `try_dequeue` returned; `None` if nothing was dequeued
    TryDequeueRet(Option<u8>),
}

impl<const N: usize> Operation<Queue<N>> for QueueOp {
    fn apply(&self, state: &Queue<N>, ret: &Self) -> (bool, Queue<N>) {
        match (*self, *ret) {
            (Self::TryEnqueue(value), Self::TryEnqueueRet(ok)) => {
                if state.is_full() {
                    (!ok, state.clone())
                } else {
                    (ok, state.enqueue(value))
                }
            }
            (Self::TryDequeue, Self::TryDequeueRet(dequeued)) => match state.front() {
                None => (dequeued.is_none(), state.clone()),
                Some(front) => (dequeued == Some(front), state.dequeue()),
            },
            _ => (false, state.clone()),
        }
    }
}

impl fmt::Display for QueueOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TryEnqueue(v) => write!(f, "try_enqueue({v})"),
            Self::TryEnqueueRet(ok) => write!(f, "ret: {}", bit(*ok)),
            Self::TryDequeue => f.write_str("try_dequeue()"),
            Self::TryDequeueRet(Some(v)) => write!(f, "ret: [ok: 1, value: {v}]"),
            Self::TryDequeueRet(None) => f.write_str("ret: [ok: 0, value: undefined]"),
        }
    }
}
