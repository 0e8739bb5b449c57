//! Linearizability Tester Benchmark Suite - Cache Policies
//!
//! Compares the three memoization strategies on generated set histories.
//!
//! # Scenarios
//!
//! 1. **Overlapping Rounds**: every round issues one call per thread, then
//!    executes them in reverse issue order and records the returns in
//!    issue order. Always linearizable, but the first ordering the search
//!    tries is usually wrong, so it exercises backtracking.
//!
//! 2. **Impossible Tail**: the same rounds followed by a `contains` that
//!    observes a value nobody inserted. Forces the search to exhaust every
//!    ordering, which is where memoization pays off.

use std::fmt;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use linea_core::{CachePolicy, CheckerConfig, LinearizabilityTester, Log, Operation, Specification};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// Benchmark Model
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct MaskSet(u64);

#[derive(Debug, Clone, Copy)]
enum MaskOp {
    Insert(u8),
    Contains(u8),
    Ret(bool),
}

impl Specification for MaskSet {
    type Op = MaskOp;

    fn hash_code(&self) -> u64 {
        self.0
    }
}

impl Operation<MaskSet> for MaskOp {
    fn apply(&self, state: &MaskSet, ret: &Self) -> (bool, MaskSet) {
        let MaskOp::Ret(ret) = *ret else {
            return (false, *state);
        };
        match *self {
            Self::Insert(v) => {
                let mask = 1u64 << v;
                ((state.0 & mask == 0) == ret, MaskSet(state.0 | mask))
            }
            Self::Contains(v) => (((state.0 >> v) & 1 == 1) == ret, *state),
            Self::Ret(_) => (false, *state),
        }
    }
}

impl fmt::Display for MaskOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert(v) => write!(f, "insert({v})"),
            Self::Contains(v) => write!(f, "contains({v})"),
            Self::Ret(r) => write!(f, "ret: {}", u8::from(*r)),
        }
    }
}

// ============================================================================
// History Generation
// ============================================================================

/// Fixed seed so that every run sees the same histories
const SEED: u64 = 0x9E37_79B9_7F4A_7C15;

fn overlapping_rounds(threads: usize, rounds: usize, impossible_tail: bool) -> Log<MaskSet> {
    let mut log = Log::new(2 * threads * rounds + 2);
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut state = MaskSet::default();

    for _ in 0..rounds {
        let ops: Vec<MaskOp> = (0..threads)
            .map(|t| {
                let v = rng.gen_range(0..16u8);
                if t % 2 == 0 {
                    MaskOp::Insert(v)
                } else {
                    MaskOp::Contains(v)
                }
            })
            .collect();

        let calls: Vec<_> = ops.iter().map(|&op| log.add_call(op)).collect();

        let mut rets = vec![false; threads];
        for (i, op) in ops.iter().enumerate().rev() {
            rets[i] = match *op {
                MaskOp::Insert(v) => {
                    let fresh = (state.0 >> v) & 1 == 0;
                    state.0 |= 1u64 << v;
                    fresh
                }
                MaskOp::Contains(v) => (state.0 >> v) & 1 == 1,
                MaskOp::Ret(_) => false,
            };
        }

        for (call, ret) in calls.into_iter().zip(rets) {
            log.add_ret(call, MaskOp::Ret(ret));
        }
    }

    if impossible_tail {
        let call = log.add_call(MaskOp::Contains(63));
        log.add_ret(call, MaskOp::Ret(true));
    }

    log
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_overlapping_rounds(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlapping_rounds");

    for threads in [2, 4, 6] {
        let log = overlapping_rounds(threads, 50, false);

        for policy in CachePolicy::ALL {
            group.bench_with_input(
                BenchmarkId::new(policy.name(), threads),
                &threads,
                |b, _| {
                    b.iter(|| {
                        let config = CheckerConfig::default().with_cache(policy);
                        let mut tester = LinearizabilityTester::with_config(log.info(), config);
                        black_box(tester.check().ok())
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_impossible_tail(c: &mut Criterion) {
    let mut group = c.benchmark_group("impossible_tail");
    group.sample_size(10);

    for threads in [2, 3, 4] {
        let log = overlapping_rounds(threads, 4, true);

        for policy in CachePolicy::ALL {
            group.bench_with_input(
                BenchmarkId::new(policy.name(), threads),
                &threads,
                |b, _| {
                    b.iter(|| {
                        let config = CheckerConfig::default().with_cache(policy);
                        let mut tester = LinearizabilityTester::with_config(log.info(), config);
                        black_box(tester.check().ok())
                    });
                },
            );
        }
    }

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(benches, bench_overlapping_rounds, bench_impossible_tail);
criterion_main!(benches);
