//! Concurrent Log Tests
//!
//! Histories recorded from several threads at once.

use std::sync::Arc;
use std::thread;

use linea_core::{CheckResult, ConcurrentLog, LinearizabilityTester, Log};
use linea_models::{Set, SetOp, Stack, StackOp};
use parking_lot::Mutex;
use rand::Rng;

#[test]
fn test_single_thread_links_in_slot_order() {
    let mut log = ConcurrentLog::<Set>::new(6);

    let contains = log.push_back(SetOp::ContainsCall(0));
    let insert = log.push_back(SetOp::InsertCall(0));
    let contains_ret = log.push_ret(contains, SetOp::Ret(false));
    let insert_ret = log.push_ret(insert, SetOp::Ret(false));

    assert_eq!(log.number_of_entries(), 4);

    let info = log.info();
    let head = info.log_head().unwrap();
    assert_eq!(head, contains);

    let entry = info.entry(head);
    assert_eq!(entry.prev(), None);
    assert_eq!(entry.next(), Some(insert));
    assert_eq!(entry.matched(), Some(contains_ret));

    let entry = info.entry(insert);
    assert_eq!(entry.prev(), Some(contains));
    assert_eq!(entry.next(), Some(contains_ret));
    assert_eq!(entry.matched(), Some(insert_ret));

    let entry = info.entry(contains_ret);
    assert_eq!(entry.next(), Some(insert_ret));
    assert_eq!(entry.matched(), Some(contains));

    let entry = info.entry(insert_ret);
    assert_eq!(entry.prev(), Some(contains_ret));
    assert_eq!(entry.next(), None);

    assert!(!LinearizabilityTester::new(info).check().unwrap());
}

#[test]
fn test_threads_keep_their_own_order() {
    const THREADS: usize = 4;
    const OPS: usize = 25;

    let log = Arc::new(ConcurrentLog::<Set>::new(2 * THREADS * OPS));

    thread::scope(|scope| {
        for t in 0..THREADS {
            let log = Arc::clone(&log);
            scope.spawn(move || {
                let value = u8::try_from(t).unwrap();
                for _ in 0..OPS {
                    let call = log.push_back(SetOp::ContainsCall(value));
                    log.push_ret(call, SetOp::Ret(false));
                }
            });
        }
    });

    let mut log = Arc::try_unwrap(log).ok().expect("workers joined");
    let info = log.info();
    assert_eq!(info.number_of_entries(), 2 * THREADS * OPS);

    // returns carry the id and thread of their call
    for (_, entry) in info.iter().filter(|(_, e)| e.is_call()) {
        let ret = info.entry(entry.matched().unwrap());
        assert_eq!(ret.thread_id(), entry.thread_id());
        assert_eq!(ret.entry_id(), entry.entry_id());
    }

    assert!(LinearizabilityTester::new(info).check().unwrap());
}

/// Every thread starts with an insert that claims to have failed on a set
/// nobody ever inserted into, so no linearization exists.
#[test]
fn test_fuzzy_always_false_history() {
    const THREADS: usize = 4;
    const OPS: usize = 12;
    const MAX_VALUE: u8 = 7;

    let log = ConcurrentLog::<Set>::new(2 * THREADS * OPS);

    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                let mut rng = rand::thread_rng();
                for n in 0..OPS {
                    let value = rng.gen_range(0..=MAX_VALUE);
                    let op = match (n, rng.gen_range(0..100)) {
                        (0, _) | (_, 0..=29) => SetOp::InsertCall(value),
                        (_, 30..=49) => SetOp::EraseCall(value),
                        _ => SetOp::ContainsCall(value),
                    };
                    let call = log.push_back(op);
                    log.push_ret(call, SetOp::Ret(false));
                }
            });
        }
    });

    let mut log = log;
    let info = log.info();
    assert_eq!(info.number_of_entries(), 2 * THREADS * OPS);

    let mut result = CheckResult::new();
    LinearizabilityTester::new(info).check_into(&mut result);
    assert!(!result.is_linearizable());

    let trace = result.debug(&info, false).to_string();
    assert!(trace.contains("insert("));
}

/// A mutex-protected stack is trivially linearizable
#[test]
fn test_locked_stack_history_is_linearizable() {
    const THREADS: usize = 3;
    const OPS: usize = 40;
    const CAPACITY: usize = 8;

    let stack = Mutex::new(Vec::<u8>::with_capacity(CAPACITY));
    let log = ConcurrentLog::<Stack<CAPACITY>>::new(2 * THREADS * OPS);

    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                let mut rng = rand::thread_rng();
                for _ in 0..OPS {
                    if rng.gen_bool(0.5) {
                        let value = rng.gen_range(0..20);
                        let call = log.push_back(StackOp::TryPush(value));
                        let ok = {
                            let mut stack = stack.lock();
                            let ok = stack.len() < CAPACITY;
                            if ok {
                                stack.push(value);
                            }
                            ok
                        };
                        log.push_ret(call, StackOp::TryPushRet(ok));
                    } else {
                        let call = log.push_back(StackOp::TryPop);
                        let popped = stack.lock().pop();
                        log.push_ret(call, StackOp::TryPopRet(popped));
                    }
                }
            });
        }
    });

    let mut log = log;
    let copy = Log::from_info(&log.info());
    assert_eq!(copy.number_of_entries(), 2 * THREADS * OPS);
    assert!(LinearizabilityTester::new(copy.info()).check().unwrap());
}

#[test]
fn test_log_head_is_stable() {
    let mut log = ConcurrentLog::<Set>::new(2);
    let call = log.push_back(SetOp::EmptyCall);
    log.push_ret(call, SetOp::Ret(true));

    let first = log.log_head();
    assert_eq!(first, log.log_head());
    assert_eq!(first, Some(call));
    assert!(LinearizabilityTester::new(log.info()).check().unwrap());
}

#[test]
#[should_panic(expected = "already finalized")]
fn test_push_after_info_panics() {
    let mut log = ConcurrentLog::<Set>::new(4);
    let call = log.push_back(SetOp::EmptyCall);
    log.push_ret(call, SetOp::Ret(true));
    let _ = log.info();

    log.push_back(SetOp::EmptyCall);
}
