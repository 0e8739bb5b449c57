//! Set of small values
//!
//! Values are bytes; the state is a [`FlexibleBitset`] that grows as larger
//! values are touched. Operations on different values commute, so every
//! value operation carries the value itself as its partition key and set
//! histories can be checked per value with the
//! [`Slicer`](linea_core::Slicer).

use std::fmt;

use linea_core::{FlexibleBitset, Operation, Specification};

use crate::bit;

/// Sequential set state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Set {
    bitset: FlexibleBitset,
}

impl Set {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the set has no elements
    pub fn is_empty(&self) -> bool {
        self.bitset.is_empty()
    }

    /// Is `value` an element?
    pub fn contains(&self, value: u8) -> bool {
        self.bitset.is_set(usize::from(value))
    }

    /// Add `value`; the flag tells whether it was absent
    pub fn insert(&self, value: u8) -> (bool, Self) {
        let mut next = self.clone();
        let changed = next.bitset.set(usize::from(value));
        (changed, next)
    }

    /// Remove `value`; the flag tells whether it was present
    pub fn erase(&self, value: u8) -> (bool, Self) {
        let mut next = self.clone();
        let changed = next.bitset.reset(usize::from(value));
        (changed, next)
    }
}

impl Specification for Set {
    type Op = SetOp;

    fn hash_code(&self) -> u64 {
        self.bitset.hash_code()
    }
}

/// Calls and returns on a [`Set`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOp {
    /// `empty()`
    EmptyCall,
    /// `contains(value)`
    ContainsCall(u8),
    /// `insert(value)`, true if the value was absent
    InsertCall(u8),
    /// `erase(value)`, true if the value was present
    EraseCall(u8),
    /// Boolean return of any set call
    Ret(bool),
}

impl Operation<Set> for SetOp {
    fn apply(&self, state: &Set, ret: &Self) -> (bool, Set) {
        let Self::Ret(ret) = *ret else {
            return (false, state.clone());
        };

        match *self {
            Self::EmptyCall => (state.is_empty() == ret, state.clone()),
            Self::ContainsCall(value) => (state.contains(value) == ret, state.clone()),
            Self::InsertCall(value) => {
                let (changed, next) = state.insert(value);
                (changed == ret, next)
            }
            Self::EraseCall(value) => {
                let (changed, next) = state.erase(value);
                (changed == ret, next)
            }
            Self::Ret(_) => (false, state.clone()),
        }
    }

    fn partition(&self) -> Option<u32> {
        match *self {
            Self::ContainsCall(value) | Self::InsertCall(value) | Self::EraseCall(value) => {
                Some(u32::from(value))
            }
            Self::EmptyCall | Self::Ret(_) => None,
        }
    }
}

impl fmt::Display for SetOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCall => f.write_str("empty()"),
            Self::ContainsCall(v) => write!(f, "contains({v})"),
            Self::InsertCall(v) => write!(f, "insert({v})"),
            Self::EraseCall(v) => write!(f, "erase({v})"),
            Self::Ret(r) => write!(f, "ret: {}", bit(*r)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_then_contains() {
        let set = Set::new();
        let (ok, set) = SetOp::InsertCall(3).apply(&set, &SetOp::Ret(true));
        assert!(ok);

        let (ok, set) = SetOp::ContainsCall(3).apply(&set, &SetOp::Ret(true));
        assert!(ok);
        assert!(set.contains(3));

        let (ok, _) = SetOp::ContainsCall(4).apply(&set, &SetOp::Ret(true));
        assert!(!ok);
    }

    #[test]
    fn test_insert_reports_change() {
        let (_, set) = Set::new().insert(7);

        let (ok, _) = SetOp::InsertCall(7).apply(&set, &SetOp::Ret(true));
        assert!(!ok);
        let (ok, same) = SetOp::InsertCall(7).apply(&set, &SetOp::Ret(false));
        assert!(ok);
        assert_eq!(same, set);
    }

    #[test]
    fn test_erase() {
        let (_, set) = Set::new().insert(1);

        let (ok, erased) = SetOp::EraseCall(1).apply(&set, &SetOp::Ret(true));
        assert!(ok);
        assert!(erased.is_empty());

        let (ok, _) = SetOp::EraseCall(1).apply(&erased, &SetOp::Ret(true));
        assert!(!ok);
    }

    #[test]
    fn test_empty() {
        let set = Set::new();
        assert!(SetOp::EmptyCall.apply(&set, &SetOp::Ret(true)).0);
        assert!(!SetOp::EmptyCall.apply(&set, &SetOp::Ret(false)).0);

        let (_, set) = set.insert(0);
        assert!(SetOp::EmptyCall.apply(&set, &SetOp::Ret(false)).0);
    }

    #[test]
    fn test_states_are_persistent() {
        let empty = Set::new();
        let (_, one) = empty.insert(5);
        assert!(!empty.contains(5));
        assert!(one.contains(5));
    }

    #[test]
    fn test_large_values_grow_state() {
        let (changed, set) = Set::new().insert(200);
        assert!(changed);
        assert!(set.contains(200));
        assert!(!set.contains(199));
    }

    #[test]
    fn test_equal_states_hash_equal() {
        let (_, a) = Set::new().insert(2);
        let (_, a) = a.insert(9);
        let (_, b) = Set::new().insert(9);
        let (_, b) = b.insert(2);
        assert_eq!(a, b);
        assert_eq!(a.hash_code(), b.hash_code());
    }

    #[test]
    fn test_partition() {
        assert_eq!(SetOp::InsertCall(4).partition(), Some(4));
        assert_eq!(SetOp::ContainsCall(9).partition(), Some(9));
        assert_eq!(SetOp::EraseCall(0).partition(), Some(0));
        assert_eq!(SetOp::EmptyCall.partition(), None);
        assert_eq!(SetOp::Ret(true).partition(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(SetOp::EmptyCall.to_string(), "empty()");
        assert_eq!(SetOp::ContainsCall(1).to_string(), "contains(1)");
        assert_eq!(SetOp::InsertCall(2).to_string(), "insert(2)");
        assert_eq!(SetOp::EraseCall(3).to_string(), "erase(3)");
        assert_eq!(SetOp::Ret(true).to_string(), "ret: 1");
        assert_eq!(SetOp::Ret(false).to_string(), "ret: 0");
    }
}
