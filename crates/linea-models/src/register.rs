//! Atomic register with compare-and-swap
//!
//! A single signed byte, initially `-1`. Besides completed returns the model
//! understands *pending* returns: a call that was still in flight when the
//! history was cut off may or may not have taken effect.
//!
//! ```text
//!   call            return             accepted when
//!   ─────────────   ────────────────   ─────────────────────────────────
//!   read()          read() : v         value == v
//!   read()          read() : pending   always, no effect
//!   write(v)        write() : ...      always, value := v
//!   cas(c, n)       cas() : ok/failed  (value == c) == ok, swap on match
//!   cas(c, n)       cas() : pending    always, swap on match
//! ```

use std::fmt;

use linea_core::{Operation, Specification};

/// Initial register value
pub const INITIAL_VALUE: i8 = -1;

/// Sequential register state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Register {
    value: i8,
}

impl Register {
    /// Register holding `value`
    pub const fn new(value: i8) -> Self {
        Self { value }
    }

    /// Current value
    pub const fn get(&self) -> i8 {
        self.value
    }

    /// Register holding `value` instead
    #[must_use]
    pub const fn set(&self, value: i8) -> Self {
        Self { value }
    }
}

impl Default for Register {
    fn default() -> Self {
        Self::new(INITIAL_VALUE)
    }
}

impl Specification for Register {
    type Op = RegisterOp;

    #[allow(clippy::cast_sign_loss)]
    fn hash_code(&self) -> u64 {
        (i64::from(self.value) * 193) as u64
    }
}

/// Calls and returns on a [`Register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterOp {
    /// `read()`
    Read,
    /// `read()` returned a value
    ReadRet(i8),
    /// `read()` never returned
    ReadPending,
    /// `write(value)`
    Write(i8),
    /// `write()` returned
    WriteRet,
    /// `write()` never returned
    WritePending,
    /// `cas(current, new)`
    Cas {
        /// Expected value
        current: i8,
        /// Value stored on a match
        new: i8,
    },
    /// `cas()` returned; true if it swapped
    CasRet(bool),
    /// `cas()` never returned
    CasPending,
}

impl Operation<Register> for RegisterOp {
    fn apply(&self, state: &Register, ret: &Self) -> (bool, Register) {
        match (*self, *ret) {
            (Self::Read, Self::ReadPending) => (true, *state),
            (Self::Read, Self::ReadRet(value)) => (state.get() == value, *state),

            (Self::Write(value), Self::WriteRet | Self::WritePending) => (true, state.set(value)),

            (Self::Cas { current, new }, Self::CasPending) => {
                if state.get() == current {
                    (true, state.set(new))
                } else {
                    (true, *state)
                }
            }
            (Self::Cas { current, new }, Self::CasRet(ok)) => {
                if state.get() == current {
                    (ok, state.set(new))
                } else {
                    (!ok, *state)
                }
            }

            _ => (false, *state),
        }
    }
}

impl fmt::Display for RegisterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read()"),
            Self::ReadRet(v) => write!(f, "read() : {v}"),
            Self::ReadPending => f.write_str("read() : pending"),
            Self::Write(v) => write!(f, "write({v})"),
            Self::WriteRet => f.write_str("write() : succeeded"),
            Self::WritePending => f.write_str("write() : pending"),
            Self::Cas { current, new } => write!(f, "cas({current}, {new})"),
            Self::CasRet(true) => f.write_str("cas() : succeeded"),
            Self::CasRet(false) => f.write_str("cas() : failed"),
            Self::CasPending => f.write_str("cas() : pending"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_value() {
        let reg = Register::default();
        assert_eq!(reg.get(), -1);
        assert!(RegisterOp::Read.apply(&reg, &RegisterOp::ReadRet(-1)).0);
        assert!(!RegisterOp::Read.apply(&reg, &RegisterOp::ReadRet(0)).0);
    }

    #[test]
    fn test_pending_read_is_always_accepted() {
        let reg = Register::new(5);
        let (ok, next) = RegisterOp::Read.apply(&reg, &RegisterOp::ReadPending);
        assert!(ok);
        assert_eq!(next, reg);
    }

    #[test]
    fn test_write() {
        let reg = Register::default();
        let (ok, next) = RegisterOp::Write(4).apply(&reg, &RegisterOp::WriteRet);
        assert!(ok);
        assert_eq!(next.get(), 4);

        let (ok, next) = RegisterOp::Write(9).apply(&next, &RegisterOp::WritePending);
        assert!(ok);
        assert_eq!(next.get(), 9);
    }

    #[test]
    fn test_cas_completed() {
        let reg = Register::new(1);
        let cas = RegisterOp::Cas { current: 1, new: 2 };

        let (ok, next) = cas.apply(&reg, &RegisterOp::CasRet(true));
        assert!(ok);
        assert_eq!(next.get(), 2);

        assert!(!cas.apply(&reg, &RegisterOp::CasRet(false)).0);

        let other = Register::new(3);
        let (ok, next) = cas.apply(&other, &RegisterOp::CasRet(false));
        assert!(ok);
        assert_eq!(next, other);
        assert!(!cas.apply(&other, &RegisterOp::CasRet(true)).0);
    }

    #[test]
    fn test_cas_pending() {
        let cas = RegisterOp::Cas { current: 0, new: 7 };

        let (ok, next) = cas.apply(&Register::new(0), &RegisterOp::CasPending);
        assert!(ok);
        assert_eq!(next.get(), 7);

        let (ok, next) = cas.apply(&Register::new(1), &RegisterOp::CasPending);
        assert!(ok);
        assert_eq!(next.get(), 1);
    }

    #[test]
    fn test_mismatched_return_rejected() {
        let reg = Register::default();
        assert!(!RegisterOp::Read.apply(&reg, &RegisterOp::WriteRet).0);
        assert!(!RegisterOp::Write(1).apply(&reg, &RegisterOp::CasRet(true)).0);
    }

    #[test]
    fn test_hash() {
        assert_eq!(Register::new(2).hash_code(), 386);
        assert_eq!(Register::new(0).hash_code(), 0);
        assert_ne!(Register::new(-1).hash_code(), Register::new(1).hash_code());
    }

    #[test]
    fn test_display() {
        let cases = [
            (RegisterOp::Read, "read()"),
            (RegisterOp::ReadRet(-1), "read() : -1"),
            (RegisterOp::ReadPending, "read() : pending"),
            (RegisterOp::Write(3), "write(3)"),
            (RegisterOp::WriteRet, "write() : succeeded"),
            (RegisterOp::WritePending, "write() : pending"),
            (RegisterOp::Cas { current: 1, new: 2 }, "cas(1, 2)"),
            (RegisterOp::CasRet(true), "cas() : succeeded"),
            (RegisterOp::CasRet(false), "cas() : failed"),
            (RegisterOp::CasPending, "cas() : pending"),
        ];
        for (op, expected) in cases {
            assert_eq!(op.to_string(), expected);
        }
    }
}
