//! Bounded LIFO stack
//!
//! # Representation
//!
//! A stack is a persistent chain of reference-counted nodes, top first.
//! Pushing allocates one node pointing at the old top; popping just moves
//! to the parent. Every version produced during a search shares its tail
//! with the versions it was derived from.
//!
//! ```text
//!   s1 = push(push(empty, 1), 2)        s2 = push(pop(s1), 3)
//!
//!   s1 ──► [2] ──► [1] ◄── [3] ◄── s2
//! ```
//!
//! Each node caches the length and hash of the stack it tops, so both are
//! constant time. Equality compares contents, short-circuiting on shared
//! nodes.

use std::fmt;
use std::rc::Rc;

use linea_core::{Operation, Specification};

use crate::bit;

struct Node {
    value: u8,
    len: usize,
    hash: u64,
    parent: Option<Rc<Node>>,
}

/// Sequential stack holding at most `N` values
#[derive(Clone, Default)]
pub struct Stack<const N: usize> {
    top: Option<Rc<Node>>,
}

impl<const N: usize> Stack<N> {
    /// Empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.top.as_ref().map_or(0, |node| node.len)
    }

    /// True if the stack has no elements
    pub fn is_empty(&self) -> bool {
        self.top.is_none()
    }

    /// True if the stack holds `N` elements
    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    /// Most recently pushed value
    pub fn top(&self) -> Option<u8> {
        self.top.as_ref().map(|node| node.value)
    }

    /// Stack with `value` on top
    ///
    /// # Panics
    ///
    /// Panics if the stack is full.
    #[must_use]
    pub fn push(&self, value: u8) -> Self {
        assert!(!self.is_full(), "push onto a full stack (capacity {N})");

        let parent_hash = self.top.as_ref().map_or(0, |node| node.hash);
        Self {
            top: Some(Rc::new(Node {
                value,
                len: self.len() + 1,
                hash: parent_hash.wrapping_mul(31).wrapping_add(u64::from(value) + 1),
                parent: self.top.clone(),
            })),
        }
    }

    /// Stack without its top value
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    #[must_use]
    pub fn pop(&self) -> Self {
        let Some(top) = &self.top else {
            panic!("pop from an empty stack");
        };
        Self {
            top: top.parent.clone(),
        }
    }

    /// Values from top to bottom
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        std::iter::successors(self.top.as_deref(), |node| node.parent.as_deref())
            .map(|node| node.value)
    }
}

impl<const N: usize> PartialEq for Stack<N> {
    fn eq(&self, other: &Self) -> bool {
        let mut a = self.top.as_ref();
        let mut b = other.top.as_ref();
        loop {
            match (a, b) {
                (None, None) => return true,
                (Some(x), Some(y)) => {
                    if Rc::ptr_eq(x, y) {
                        return true;
                    }
                    if x.len != y.len || x.hash != y.hash || x.value != y.value {
                        return false;
                    }
                    a = x.parent.as_ref();
                    b = y.parent.as_ref();
                }
                _ => return false,
            }
        }
    }
}

impl<const N: usize> Eq for Stack<N> {}

impl<const N: usize> fmt::Debug for Stack<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<const N: usize> Specification for Stack<N> {
    type Op = StackOp;

    fn hash_code(&self) -> u64 {
        self.top.as_ref().map_or(0, |node| node.hash)
    }
}

/// Calls and returns on a [`Stack`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackOp {
    /// `try_push(value)`
    TryPush(u8),
    /// `try_push` returned; true if the value was pushed
    TryPushRet(bool),
    /// `try_pop()`
    TryPop,
    /// `try_pop` returned; `None` if nothing was popped
    TryPopRet(Option<u8>),
}

impl<const N: usize> Operation<Stack<N>> for StackOp {
    fn apply(&self, state: &Stack<N>, ret: &Self) -> (bool, Stack<N>) {
        match (*self, *ret) {
            (Self::TryPush(value), Self::TryPushRet(ok)) => {
                if state.is_full() {
                    (!ok, state.clone())
                } else {
                    (ok, state.push(value))
                }
            }
            (Self::TryPop, Self::TryPopRet(popped)) => match state.top() {
                None => (popped.is_none(), state.clone()),
                Some(top) => (popped == Some(top), state.pop()),
            },
            _ => (false, state.clone()),
        }
    }
}

impl fmt::Display for StackOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TryPush(v) => write!(f, "try_push({v})"),
            Self::TryPushRet(ok) => write!(f, "ret: {}", bit(*ok)),
            Self::TryPop => f.write_str("try_pop()"),
            Self::TryPopRet(Some(v)) => write!(f, "ret: [ok: 1, value: {v}]"),
            Self::TryPopRet(None) => f.write_str("ret: [ok: 0, value: undefined]"),
        }
    }
}
