//! Sequential Specification Contract
//!
//! A sequential specification is a deterministic state machine. The checker
//! never inspects states or operations directly; it only needs to:
//!
//! - start from the initial state ([`Default`])
//! - ask an operation whether it can take effect in a given state, together
//!   with the return that was observed ([`Operation::apply`])
//! - compare and hash states for memoization ([`Eq`], [`Specification::hash_code`])
//!
//! ```text
//!   call op  ──┐
//!              ├──► apply(state, ret) ──► (accepted?, next state)
//!   ret op   ──┘
//! ```
//!
//! Call and return operations of a model share one type, usually an enum
//! with one variant per call kind plus return variants. This keeps a log
//! homogeneous while still letting `apply` match on both halves.

use std::fmt;

/// Deterministic state of a sequential data type
///
/// `Clone` produces an independent state: applying an operation to a clone
/// never affects the original. Models that share structure between states
/// (persistent stacks, queues) satisfy this trivially.
pub trait Specification: Clone + Eq + Default + 'static {
    /// Calls and returns accepted by this specification
    type Op: Operation<Self>;

    /// Hash consistent with `Eq`: equal states must produce equal codes
    fn hash_code(&self) -> u64;
}

/// One half of an operation: either a call or a return
pub trait Operation<S: Specification>: fmt::Display + Send + Sync + 'static {
    /// Try to take effect in `state`, given the observed return `ret`
    ///
    /// Returns whether the pair is consistent with the specification in
    /// `state`, and the state after the operation. When the pair is not
    /// consistent the returned state is never used.
    ///
    /// Only ever called on call operations.
    fn apply(&self, state: &S, ret: &Self) -> (bool, S);

    /// Partition key used by the history [`Slicer`](crate::Slicer)
    ///
    /// Operations that can never affect each other must report different
    /// keys. `None` means the operation cannot be sliced.
    fn partition(&self) -> Option<u32> {
        None
    }
}
