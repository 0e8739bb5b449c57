//! History Slicing
//!
//! # Overview
//!
//! Operations on different keys of a set (or any other structure whose
//! operations commute across keys) never constrain each other. A history of
//! such a structure is linearizable iff every per-key sub-history is, and the
//! sub-histories are exponentially cheaper to check.
//!
//! ```text
//!   history:   i(1) c(2) r r i(2) r c(1) r
//!                 │    │             │
//!   key % 2:      1    0   ...       1
//!
//!   sublog 0:  c(2) r i(2) r              ids renumbered from 0
//!   sublog 1:  i(1) r c(1) r              ids renumbered from 0
//! ```
//!
//! Sub-histories are owned copies sharing the original operations, so the
//! input history is left untouched and the sub-histories can be handed to
//! different threads.

use tracing::debug;

use crate::config::CheckerConfig;
use crate::domain::history::{Log, LogInfo};
use crate::domain::spec::Specification;
use crate::domain::tester::{CheckResult, LinearizabilityTester};
use crate::domain::types::EntryRef;
use crate::error::{LineaError, Result};

/// Splits a history into independent sub-histories by partition key
pub struct Slicer<S: Specification> {
    sublogs: Vec<Log<S>>,
    current_partition: usize,
}

impl<S: Specification> Slicer<S> {
    /// Slice `info` into `number_of_partitions` sub-histories
    ///
    /// Entries go to sub-history `partition % number_of_partitions`. It is
    /// up to the caller to make sure that entries in different
    /// sub-histories are independent.
    ///
    /// # Errors
    ///
    /// - [`LineaError::InvalidConfig`] if `number_of_partitions` is zero
    /// - [`LineaError::NotPartitionable`] if some entry has no partition key
    pub fn new(info: LogInfo<'_, S>, number_of_partitions: usize) -> Result<Self> {
        if number_of_partitions == 0 {
            return Err(LineaError::InvalidConfig(
                "number of partitions must be positive".to_string(),
            ));
        }

        // first pass: validate keys and size the sub-histories
        let mut sizes = vec![0usize; number_of_partitions];
        for (_, entry) in info.iter() {
            let partition = entry.partition().ok_or(LineaError::NotPartitionable {
                entry_id: entry.entry_id(),
            })?;
            sizes[partition as usize % number_of_partitions] += 1;
        }

        let mut sublogs: Vec<Log<S>> = sizes.iter().map(|&size| Log::new(size)).collect();
        let mut calls: Vec<Option<EntryRef>> = vec![None; info.arena_len()];

        // second pass: copy entries, renumbering ids per sub-history
        for (entry_ref, entry) in info.iter() {
            let partition = entry.partition().map_or(0, |p| p as usize % number_of_partitions);
            let sublog = &mut sublogs[partition];

            if entry.is_call() {
                let call = sublog.push_call(entry.op_arc().clone(), entry.thread_id());
                calls[entry_ref.index()] = Some(call);
            } else {
                let Some(call) = entry.matched().and_then(|m| calls[m.index()]) else {
                    panic!("return with entry id {} precedes its call", entry.entry_id());
                };
                sublog.push_ret(call, entry.op_arc().clone(), entry.thread_id());
            }
        }

        debug!(partitions = number_of_partitions, sizes = ?sizes, "history sliced");

        Ok(Self {
            sublogs,
            current_partition: 0,
        })
    }

    /// Number of sub-histories
    pub fn number_of_partitions(&self) -> usize {
        self.sublogs.len()
    }

    /// Sub-history of `partition`
    ///
    /// # Panics
    ///
    /// Panics if `partition` is out of range.
    pub fn sublog_info(&self, partition: usize) -> LogInfo<'_, S> {
        self.sublogs[partition].info()
    }

    /// Sub-histories in order, then the empty history forever
    pub fn next_sublog_info(&mut self) -> LogInfo<'_, S> {
        let partition = self.current_partition;
        self.current_partition = self.current_partition.saturating_add(1);

        self.sublogs
            .get(partition)
            .map_or_else(LogInfo::empty, Log::info)
    }

    /// Borrow every sub-history
    pub fn sublogs(&self) -> &[Log<S>] {
        &self.sublogs
    }

    /// Hand the sub-histories over, e.g. to parallel checkers
    pub fn into_sublogs(self) -> Vec<Log<S>> {
        self.sublogs
    }

    /// Check the sub-histories in order, stopping at the first one that is
    /// not linearizable
    ///
    /// Timeouts do not stop the loop. Returns the index of the last checked
    /// sub-history; the entry references in `result` point into it.
    pub fn check_partitions(&self, config: &CheckerConfig, result: &mut CheckResult) -> usize {
        let mut last = 0;
        for (partition, sublog) in self.sublogs.iter().enumerate() {
            last = partition;

            let mut tester = LinearizabilityTester::with_config(sublog.info(), config.clone());
            tester.check_into(result);

            if !(result.is_timeout() || result.is_linearizable()) {
                debug!(partition, "sub-history is not linearizable");
                break;
            }
        }
        last
    }
}

/// Check a history one partition at a time
///
/// `result` describes the last checked partition: either the first one
/// found not linearizable, or the last one.
///
/// # Errors
///
/// Fails if the history cannot be sliced or `config` does not validate.
pub fn compositional_check<S: Specification>(
    info: LogInfo<'_, S>,
    number_of_partitions: usize,
    config: &CheckerConfig,
    result: &mut CheckResult,
) -> Result<()> {
    config.validate()?;
    let slicer = Slicer::new(info, number_of_partitions)?;
    slicer.check_partitions(config, result);
    Ok(())
}
