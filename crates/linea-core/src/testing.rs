//! Minimal set model for unit tests

use std::fmt;

use crate::{Operation, Specification};

/// Set of values below 64, stored as a bit mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct TinySet(u64);

impl TinySet {
    pub(crate) fn with(value: u8) -> Self {
        Self(1 << value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TinyOp {
    Insert(u8),
    Contains(u8),
    Ret(bool),
}

impl Specification for TinySet {
    type Op = TinyOp;

    fn hash_code(&self) -> u64 {
        self.0
    }
}

impl Operation<TinySet> for TinyOp {
    fn apply(&self, state: &TinySet, ret: &Self) -> (bool, TinySet) {
        let TinyOp::Ret(ret) = *ret else {
            return (false, *state);
        };

        match *self {
            Self::Insert(v) => {
                let mask = 1u64 << v;
                let fresh = state.0 & mask == 0;
                (fresh == ret, TinySet(state.0 | mask))
            }
            Self::Contains(v) => (((state.0 >> v) & 1 == 1) == ret, *state),
            Self::Ret(_) => (false, *state),
        }
    }

    fn partition(&self) -> Option<u32> {
        match *self {
            Self::Insert(v) | Self::Contains(v) => Some(u32::from(v)),
            Self::Ret(_) => None,
        }
    }
}

impl fmt::Display for TinyOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert(v) => write!(f, "insert({v})"),
            Self::Contains(v) => write!(f, "contains({v})"),
            Self::Ret(r) => write!(f, "ret: {}", u8::from(*r)),
        }
    }
}
