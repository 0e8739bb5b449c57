//! Slicer Tests
//!
//! Set histories split per value, checked against the whole-history
//! verdict.

use linea_core::{
    compositional_check, CachePolicy, CheckResult, CheckerConfig, LineaError,
    LinearizabilityTester, Log, Operation, Slicer,
};
use linea_models::{Set, SetOp};
use proptest::prelude::*;

const X: u8 = 0;
const Y: u8 = 1;

//   erase(x) : false     insert(y) : true
// |------------------| |------------------|
//
//                                               contains(x) : true
//                                 |------------------------------------------------|
//
//                                      contains(y) : false     insert(x) : true
//                                    |---------------------| |------------------|
#[test]
fn test_slice_linearizable() {
    let mut log = Log::<Set>::new(10);
    let ex = log.add_call(SetOp::EraseCall(X));
    log.add_ret(ex, SetOp::Ret(false));
    let iy = log.add_call(SetOp::InsertCall(Y));
    let cx = log.add_call(SetOp::ContainsCall(X));
    let cy = log.add_call(SetOp::ContainsCall(Y));
    log.add_ret(iy, SetOp::Ret(true));
    log.add_ret(cy, SetOp::Ret(false));
    let ix = log.add_call(SetOp::InsertCall(X));
    log.add_ret(ix, SetOp::Ret(true));
    log.add_ret(cx, SetOp::Ret(true));

    let slicer = Slicer::new(log.info(), 2).unwrap();
    let xs = slicer.sublog_info(usize::from(X));
    let ys = slicer.sublog_info(usize::from(Y));

    assert_eq!(xs.number_of_entries(), 6);
    assert_eq!(ys.number_of_entries(), 4);

    let x_head = xs.entry(xs.log_head().unwrap());
    let y_head = ys.entry(ys.log_head().unwrap());
    assert_eq!(*x_head.op(), SetOp::EraseCall(X));
    assert_eq!(*y_head.op(), SetOp::InsertCall(Y));

    assert!(LinearizabilityTester::new(xs).check().unwrap());
    assert!(LinearizabilityTester::new(ys).check().unwrap());
}

//   contains(x) : false
// |---------------------|
//
//      contains(y) : false
//    |---------------------|
//
//          insert(x) : false
//        |---------------------|
#[test]
fn test_slice_not_linearizable() {
    let mut log = Log::<Set>::new(6);
    let cx = log.add_call(SetOp::ContainsCall(X));
    let cy = log.add_call(SetOp::ContainsCall(Y));
    let ix = log.add_call(SetOp::InsertCall(X));
    log.add_ret(cx, SetOp::Ret(false));
    log.add_ret(cy, SetOp::Ret(false));
    log.add_ret(ix, SetOp::Ret(false));

    let slicer = Slicer::new(log.info(), 2).unwrap();
    let xs = slicer.sublog_info(usize::from(X));
    let ys = slicer.sublog_info(usize::from(Y));

    assert_eq!(xs.number_of_entries(), 4);
    assert_eq!(ys.number_of_entries(), 2);
    assert_eq!(*xs.entry(xs.log_head().unwrap()).op(), SetOp::ContainsCall(X));
    assert_eq!(*ys.entry(ys.log_head().unwrap()).op(), SetOp::ContainsCall(Y));

    assert!(!LinearizabilityTester::new(xs).check().unwrap());
    assert!(LinearizabilityTester::new(ys).check().unwrap());

    let mut result = CheckResult::new();
    let last = slicer.check_partitions(&CheckerConfig::default(), &mut result);
    assert_eq!(last, 0);
    assert!(!result.is_linearizable());
}

#[test]
fn test_empty_call_cannot_be_sliced() {
    let mut log = Log::<Set>::new(4);
    let a = log.add_call(SetOp::InsertCall(X));
    log.add_ret(a, SetOp::Ret(true));
    let b = log.add_call(SetOp::EmptyCall);
    log.add_ret(b, SetOp::Ret(false));

    assert_eq!(
        Slicer::new(log.info(), 2).err(),
        Some(LineaError::NotPartitionable { entry_id: 1 })
    );

    let mut result = CheckResult::new();
    let err = compositional_check(log.info(), 2, &CheckerConfig::default(), &mut result)
        .unwrap_err();
    assert!(matches!(err, LineaError::NotPartitionable { .. }));
}

#[test]
fn test_compositional_check_rejects_bad_config() {
    let mut log = Log::<Set>::new(2);
    let a = log.add_call(SetOp::InsertCall(X));
    log.add_ret(a, SetOp::Ret(true));

    let config = CheckerConfig::default()
        .with_cache(CachePolicy::Lru)
        .with_lru_capacity(0);
    let mut result = CheckResult::new();
    assert!(matches!(
        compositional_check(log.info(), 2, &config, &mut result),
        Err(LineaError::InvalidConfig(_))
    ));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Property tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy)]
enum Step {
    Call(SetOp),
    Ret(usize, bool),
}

fn value_op() -> impl Strategy<Value = SetOp> {
    (0u8..4, 0u8..3).prop_map(|(value, kind)| match kind {
        0 => SetOp::ContainsCall(value),
        1 => SetOp::InsertCall(value),
        _ => SetOp::EraseCall(value),
    })
}

/// Up to seven calls; after each one, maybe return a random open call
fn history() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(
        (value_op(), any::<bool>(), any::<prop::sample::Index>(), any::<bool>()),
        1..8,
    )
    .prop_map(|calls| {
        let mut steps = Vec::new();
        let mut open: Vec<(usize, bool)> = Vec::new();

        for (index, (op, ret, pick, close_now)) in calls.into_iter().enumerate() {
            steps.push(Step::Call(op));
            open.push((index, ret));
            if close_now {
                let (call, ret) = open.remove(pick.index(open.len()));
                steps.push(Step::Ret(call, ret));
            }
        }
        for (call, ret) in open {
            steps.push(Step::Ret(call, ret));
        }
        steps
    })
}

fn build(steps: &[Step]) -> Log<Set> {
    let mut log = Log::new(steps.len());
    let mut calls = Vec::new();
    for step in steps {
        match *step {
            Step::Call(op) => calls.push(log.add_call(op)),
            Step::Ret(call, ret) => {
                log.add_ret(calls[call], SetOp::Ret(ret));
            }
        }
    }
    log
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_cache_policy_never_changes_verdict(steps in history()) {
        let log = build(&steps);
        let verdicts: Vec<bool> = CachePolicy::ALL
            .iter()
            .map(|&cache| {
                let config = CheckerConfig::default().with_cache(cache).with_lru_capacity(3);
                LinearizabilityTester::with_config(log.info(), config).check().unwrap()
            })
            .collect();

        prop_assert!(verdicts.iter().all(|&v| v == verdicts[0]));
    }

    #[test]
    fn prop_sliced_verdict_matches_whole(steps in history(), partitions in 1usize..5) {
        let log = build(&steps);
        let whole = LinearizabilityTester::new(log.info()).check().unwrap();

        let slicer = Slicer::new(log.info(), partitions).unwrap();
        let sliced = (0..slicer.number_of_partitions()).all(|p| {
            LinearizabilityTester::new(slicer.sublog_info(p)).check().unwrap()
        });

        prop_assert_eq!(whole, sliced);
    }

    #[test]
    fn prop_witness_replays(steps in history()) {
        let log = build(&steps);
        let info = log.info();
        let mut result = CheckResult::new();
        LinearizabilityTester::new(info).check_into(&mut result);

        if result.is_linearizable() {
            prop_assert_eq!(result.witness().len(), info.number_of_calls());

            let mut state = Set::new();
            for &call in result.witness() {
                let call = info.entry(call);
                let ret = info.entry(call.matched().unwrap());
                let (ok, next) = call.op().apply(&state, ret.op());
                prop_assert!(ok);
                state = next;
            }
        }
    }
}
