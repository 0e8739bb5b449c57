//! Outcome of a linearizability check

use std::fmt;

use crate::domain::history::LogInfo;
use crate::domain::spec::Specification;
use crate::domain::types::EntryRef;
use crate::infrastructure::memory::MemoryUsage;

/// Verdict, witness and diagnostics of one check
///
/// Every [`EntryRef`] stored here refers to the history the check ran on;
/// pass the same [`LogInfo`] to [`CheckResult::debug`].
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub(crate) is_linearizable: bool,
    pub(crate) is_timeout: bool,
    pub(crate) witness: Vec<EntryRef>,
    pub(crate) cutoff_entry_id: usize,
    pub(crate) remaining: Vec<EntryRef>,
    pub(crate) memory: MemoryUsage,
}

impl Default for CheckResult {
    /// Initially linearizable
    fn default() -> Self {
        Self {
            is_linearizable: true,
            is_timeout: false,
            witness: Vec::new(),
            cutoff_entry_id: 0,
            remaining: Vec::new(),
            memory: MemoryUsage::default(),
        }
    }
}

impl CheckResult {
    /// Fresh, linearizable result
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reset(&mut self) {
        self.is_linearizable = true;
        self.is_timeout = false;
        self.witness.clear();
        self.cutoff_entry_id = 0;
        self.remaining.clear();
        self.memory = MemoryUsage::default();
    }

    /// Is the history linearizable?
    ///
    /// # Panics
    ///
    /// Panics if the check timed out; there is no verdict in that case.
    pub fn is_linearizable(&self) -> bool {
        assert!(!self.is_timeout, "check timed out, no verdict available");
        self.is_linearizable
    }

    /// Did the check run out of time?
    pub fn is_timeout(&self) -> bool {
        self.is_timeout
    }

    /// Calls in linearization order
    ///
    /// Complete for a linearizable history; otherwise the calls that were
    /// provisionally linearized when the search stopped.
    pub fn witness(&self) -> &[EntryRef] {
        &self.witness
    }

    /// Largest entry id reached while skipping calls
    pub fn cutoff_entry_id(&self) -> usize {
        self.cutoff_entry_id
    }

    /// Entries still waiting to be linearized when the search stopped
    pub fn remaining(&self) -> &[EntryRef] {
        &self.remaining
    }

    /// Peak virtual memory observed during the check, 0.0 if unknown (MiB)
    pub fn virtual_memory_usage(&self) -> f64 {
        self.memory.virtual_mib
    }

    /// Peak resident set size observed during the check, 0.0 if unknown (MiB)
    pub fn resident_set_size(&self) -> f64 {
        self.memory.resident_mib
    }

    /// Human-readable trace of the verdict
    ///
    /// For a linearizable history, one line per witness call with its
    /// return. Otherwise the remaining history, with a marker after every
    /// entry at the cutoff id; unless `verbose`, printing stops at the first
    /// marked return.
    pub fn debug<'r, S: Specification>(
        &'r self,
        info: &'r LogInfo<'r, S>,
        verbose: bool,
    ) -> DebugTrace<'r, S> {
        DebugTrace {
            result: self,
            info,
            verbose,
        }
    }
}

/// Display adapter returned by [`CheckResult::debug`]
pub struct DebugTrace<'r, S: Specification> {
    result: &'r CheckResult,
    info: &'r LogInfo<'r, S>,
    verbose: bool,
}

impl<S: Specification> fmt::Display for DebugTrace<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Linearizable: ")?;

        if self.result.is_linearizable {
            writeln!(f, "Yes")?;
            for &call in &self.result.witness {
                let call = self.info.entry(call);
                match call.matched() {
                    Some(ret) => writeln!(f, "{call} : {}", self.info.entry(ret))?,
                    None => writeln!(f, "{call} : none")?,
                }
            }
            return Ok(());
        }

        writeln!(f, "No")?;
        for &entry in &self.result.remaining {
            let entry = self.info.entry(entry);
            writeln!(f, "{entry}")?;

            if entry.entry_id() == self.result.cutoff_entry_id {
                writeln!(f, "^ previous entries cannot be linearized")?;

                if !(self.verbose || entry.is_call()) {
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}
