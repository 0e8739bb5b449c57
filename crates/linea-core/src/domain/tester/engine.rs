//! Backtracking search for a linearization
//!
//! # Algorithm
//!
//! The search keeps the not-yet-linearized part of the history as a doubly
//! linked list and repeatedly tries to linearize the first call it finds.
//! Linearizing a call lifts it and its return out of the list; hitting a
//! return means some pending call could not be linearized before it, so the
//! most recent decision is undone.
//!
//! ```text
//!   remaining:  HEAD ⇄ c0 ⇄ c1 ⇄ r1 ⇄ r0 ⇄ HEAD     (circular, HEAD = sentinel)
//!
//!   call   c  →  apply(state, ret(c))
//!                 ok + novel   : push (c, state), lift c/ret(c), restart at HEAD.next
//!                 otherwise    : move to c.next
//!   return r  →  stack empty   : not linearizable
//!                 otherwise    : pop (c, state), unlift c/ret(c), resume at c.next
//! ```
//!
//! Lifting and unlifting are O(1) splices. The links live in a working copy
//! owned by the check, so the recorded history is never touched and the same
//! history can be checked again.

use serde::Serialize;
use tracing::{debug, trace, warn};

use super::result::CheckResult;
use super::timeout::Timeout;
use crate::config::CheckerConfig;
use crate::domain::bitset::Bitset;
use crate::domain::cache::StateCache;
use crate::domain::history::LogInfo;
use crate::domain::spec::{Operation, Specification};
use crate::domain::types::EntryRef;
use crate::error::{LineaError, Result};
use crate::infrastructure::memory::sample_memory_usage;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Working History
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy)]
struct Node {
    entry: EntryRef,
    entry_id: usize,
    is_call: bool,
    matched: usize,
    prev: usize,
    next: usize,
}

/// Circular list over the entries of a history, with a sentinel at `head`
struct WorkingHistory {
    nodes: Vec<Node>,
    head: usize,
}

impl WorkingHistory {
    fn new<S: Specification>(info: &LogInfo<'_, S>) -> Self {
        let n = info.number_of_entries();
        let head = n;
        let mut local = vec![usize::MAX; info.arena_len()];
        let mut nodes = Vec::with_capacity(n + 1);

        for (k, (entry_ref, entry)) in info.iter().enumerate() {
            local[entry_ref.index()] = k;
            nodes.push(Node {
                entry: entry_ref,
                entry_id: entry.entry_id(),
                is_call: entry.is_call(),
                matched: head,
                prev: if k == 0 { head } else { k - 1 },
                next: k + 1,
            });
        }
        assert_eq!(
            nodes.len(),
            n,
            "history links disagree with its entry count"
        );

        for node in &mut nodes {
            let Some(matched) = info.entry(node.entry).matched() else {
                panic!("entry {} has no matching entry", node.entry_id);
            };
            node.matched = local[matched.index()];
            assert!(
                node.matched < n,
                "entry {} is matched outside of the history",
                node.entry_id
            );
        }

        nodes.push(Node {
            entry: EntryRef(usize::MAX),
            entry_id: 0,
            is_call: false,
            matched: head,
            prev: if n == 0 { head } else { n - 1 },
            next: if n == 0 { head } else { 0 },
        });

        Self { nodes, head }
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.nodes[self.head].next == self.head
    }

    #[inline]
    fn first(&self) -> usize {
        self.nodes[self.head].next
    }

    /// Temporarily remove `call` and its return from the list
    fn lift(&mut self, call: usize) {
        let Node { prev, next, matched, .. } = self.nodes[call];
        debug_assert!(self.nodes[call].is_call);

        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;

        let Node { prev, next, .. } = self.nodes[matched];
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    /// Reinsert `call` and its return, in reverse order of `lift`
    fn unlift(&mut self, call: usize) {
        let Node { prev, next, matched, .. } = self.nodes[call];
        debug_assert!(self.nodes[call].is_call);

        let ret = self.nodes[matched];
        debug_assert_eq!(self.nodes[ret.prev].next, ret.next);
        self.nodes[ret.prev].next = matched;
        self.nodes[ret.next].prev = matched;

        debug_assert_eq!(self.nodes[prev].next, next);
        self.nodes[prev].next = call;
        self.nodes[next].prev = call;
    }

    fn remaining(&self) -> Vec<EntryRef> {
        let mut entries = Vec::new();
        let mut cursor = self.first();
        while cursor != self.head {
            entries.push(self.nodes[cursor].entry);
            cursor = self.nodes[cursor].next;
        }
        entries
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tester
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Statistics accumulated over every check run by one tester
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TesterStats {
    /// Loop iterations, a rough approximation of the workload
    pub iterations: u64,

    /// Calls provisionally linearized
    pub lifts: u64,

    /// Provisional linearizations undone
    pub backtracks: u64,

    /// Accepted calls skipped because their configuration was already seen
    pub cache_rejections: u64,

    /// Deepest provisional linearization
    pub max_depth: usize,
}

/// Decides whether a history is linearizable
///
/// # Example
///
/// ```rust,ignore
/// let mut tester = LinearizabilityTester::with_timeout(log.info(), Duration::from_secs(1));
/// match tester.check() {
///     Ok(true) => println!("linearizable"),
///     Ok(false) => println!("not linearizable"),
///     Err(err) => println!("{err}"),
/// }
/// ```
pub struct LinearizabilityTester<'a, S: Specification> {
    info: LogInfo<'a, S>,
    config: CheckerConfig,
    stats: TesterStats,
}

impl<'a, S: Specification> LinearizabilityTester<'a, S> {
    /// Tester with the default configuration
    pub fn new(info: LogInfo<'a, S>) -> Self {
        Self::with_config(info, CheckerConfig::default())
    }

    /// Tester with an explicit configuration
    ///
    /// # Panics
    ///
    /// Panics if `config` does not validate.
    pub fn with_config(info: LogInfo<'a, S>, config: CheckerConfig) -> Self {
        if let Err(err) = config.validate() {
            panic!("{err}");
        }

        Self {
            info,
            config,
            stats: TesterStats::default(),
        }
    }

    /// Tester that gives up after `max_duration`
    pub fn with_timeout(info: LogInfo<'a, S>, max_duration: std::time::Duration) -> Self {
        Self::with_config(info, CheckerConfig::default().with_timeout(max_duration))
    }

    /// The configuration in use
    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// A rough approximation of the work done so far
    pub fn number_of_iterations(&self) -> u64 {
        self.stats.iterations
    }

    /// Counters accumulated over every check
    pub fn stats(&self) -> TesterStats {
        self.stats
    }

    /// Is the history linearizable?
    ///
    /// # Errors
    ///
    /// Returns [`LineaError::Timeout`] if the configured budget ran out.
    pub fn check(&mut self) -> Result<bool> {
        let iterations_before = self.stats.iterations;
        let mut result = CheckResult::new();
        self.check_into(&mut result);

        if result.is_timeout() {
            let limit_ms = self
                .config
                .timeout
                .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
            return Err(LineaError::Timeout {
                limit_ms,
                iterations: self.stats.iterations - iterations_before,
            });
        }

        Ok(result.is_linearizable())
    }

    /// Check the history and record verdict, witness and trace in `result`
    ///
    /// `result` is reset first. On timeout, `result.is_timeout()` is set.
    pub fn check_into(&mut self, result: &mut CheckResult) {
        result.reset();

        debug!(
            entries = self.info.number_of_entries(),
            cache = %self.config.cache,
            "linearizability check started"
        );

        let mut history = WorkingHistory::new(&self.info);
        self.search(&mut history, result);

        debug!(
            linearizable = result.is_linearizable,
            timeout = result.is_timeout,
            iterations = self.stats.iterations,
            backtracks = self.stats.backtracks,
            max_depth = self.stats.max_depth,
            "linearizability check finished"
        );
    }

    fn search(&mut self, history: &mut WorkingHistory, result: &mut CheckResult) {
        let calls = self.info.number_of_calls();
        let timeout = Timeout::from_option(self.config.timeout);

        // same capacity for every configuration, so bitsets compare exactly
        let mut linearized = Bitset::new(calls);
        let mut cache = StateCache::<S>::new(&self.config);
        let mut stack: Vec<(usize, S)> = Vec::with_capacity(calls);
        let mut state = S::default();
        let mut cutoff = 0;
        let mut entry = history.first();

        while !history.is_empty() {
            result.memory = result.memory.max(sample_memory_usage());

            if timeout.is_expired() {
                warn!(
                    elapsed_ms = timeout.elapsed().as_millis() as u64,
                    depth = stack.len(),
                    "linearizability check timed out"
                );
                result.is_timeout = true;
                break;
            }

            self.stats.iterations += 1;

            let node = history.nodes[entry];
            if node.is_call {
                debug_assert!(!linearized.is_set(node.entry_id));

                let call = self.info.entry(node.entry);
                let ret = self.info.entry(history.nodes[node.matched].entry);
                let (accepted, new_state) = call.op().apply(&state, ret.op());

                let novel = accepted && cache.try_insert(&new_state, &linearized, node.entry_id);
                if novel {
                    stack.push((entry, std::mem::replace(&mut state, new_state)));
                    linearized.set(node.entry_id);
                    history.lift(entry);

                    self.stats.lifts += 1;
                    self.stats.max_depth = self.stats.max_depth.max(stack.len());

                    entry = history.first();
                } else {
                    if accepted {
                        self.stats.cache_rejections += 1;
                    }

                    // a call is always followed by at least its return
                    entry = node.next;
                    cutoff = cutoff.max(history.nodes[entry].entry_id);
                }
            } else {
                let Some((call, restored)) = stack.pop() else {
                    break;
                };

                state = restored;
                linearized.reset(history.nodes[call].entry_id);
                history.unlift(call);
                self.stats.backtracks += 1;

                trace!(
                    entry_id = history.nodes[call].entry_id,
                    depth = stack.len(),
                    "backtrack"
                );

                entry = history.nodes[call].next;
            }
        }

        result.is_linearizable = stack.len() == calls;
        debug_assert!(result.is_timeout || result.is_linearizable == history.is_empty());

        result.witness = stack.iter().map(|&(call, _)| history.nodes[call].entry).collect();
        result.cutoff_entry_id = cutoff;
        result.remaining = history.remaining();

        trace!(cached = cache.len(), "state cache released");
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
