//! History-producing workers
//!
//! Each worker drives a real concurrent container and records every call
//! right before invoking it and every return right after it completes, so
//! the recorded interval always contains the container's own linearization
//! point.
//!
//! ```text
//!   push_back(call) ──► container op ──► push_ret(call, ret)
//!   └──────────────── recorded interval ────────────────┘
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI8, Ordering};

use dashmap::DashSet;
use linea_core::{ConcurrentLog, Specification};
use linea_models::{Queue, QueueOp, Register, RegisterOp, Set, SetOp, Stack, StackOp};
use parking_lot::Mutex;
use rand::Rng;

/// Work assigned to every worker
#[derive(Debug, Clone, Copy)]
pub struct Workload {
    pub ops: usize,
    pub max_value: u8,
}

/// Record one operation
fn record<S: Specification>(log: &ConcurrentLog<S>, call: S::Op, run: impl FnOnce() -> S::Op) {
    let entry = log.push_back(call);
    let ret = run();
    log.push_ret(entry, ret);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Containers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Lock-based bounded LIFO
pub struct BoundedStack {
    items: Mutex<Vec<u8>>,
    capacity: usize,
}

impl BoundedStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn try_push(&self, value: u8) -> bool {
        let mut items = self.items.lock();
        if items.len() == self.capacity {
            return false;
        }
        items.push(value);
        true
    }

    pub fn try_pop(&self) -> Option<u8> {
        self.items.lock().pop()
    }
}

/// Lock-based bounded FIFO
pub struct BoundedQueue {
    items: Mutex<VecDeque<u8>>,
    capacity: usize,
}

impl BoundedQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn try_enqueue(&self, value: u8) -> bool {
        let mut items = self.items.lock();
        if items.len() == self.capacity {
            return false;
        }
        items.push_back(value);
        true
    }

    pub fn try_dequeue(&self) -> Option<u8> {
        self.items.lock().pop_front()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Workers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// 30% insert, 20% erase, 50% contains
pub fn set_worker(workload: Workload, set: &DashSet<u8>, log: &ConcurrentLog<Set>) {
    let mut rng = rand::thread_rng();
    for _ in 0..workload.ops {
        let value = rng.gen_range(0..=workload.max_value);
        match rng.gen_range(0..100) {
            0..=29 => record(log, SetOp::InsertCall(value), || {
                SetOp::Ret(set.insert(value))
            }),
            30..=49 => record(log, SetOp::EraseCall(value), || {
                SetOp::Ret(set.remove(&value).is_some())
            }),
            _ => record(log, SetOp::ContainsCall(value), || {
                SetOp::Ret(set.contains(&value))
            }),
        }
    }
}

pub fn stack_worker<const N: usize>(
    workload: Workload,
    stack: &BoundedStack,
    log: &ConcurrentLog<Stack<N>>,
) {
    let mut rng = rand::thread_rng();
    for _ in 0..workload.ops {
        if rng.gen_bool(0.5) {
            let value = rng.gen_range(0..=workload.max_value);
            record(log, StackOp::TryPush(value), || {
                StackOp::TryPushRet(stack.try_push(value))
            });
        } else {
            record(log, StackOp::TryPop, || StackOp::TryPopRet(stack.try_pop()));
        }
    }
}

pub fn queue_worker<const N: usize>(
    workload: Workload,
    queue: &BoundedQueue,
    log: &ConcurrentLog<Queue<N>>,
) {
    let mut rng = rand::thread_rng();
    for _ in 0..workload.ops {
        if rng.gen_bool(0.5) {
            let value = rng.gen_range(0..=workload.max_value);
            record(log, QueueOp::TryEnqueue(value), || {
                QueueOp::TryEnqueueRet(queue.try_enqueue(value))
            });
        } else {
            record(log, QueueOp::TryDequeue, || {
                QueueOp::TryDequeueRet(queue.try_dequeue())
            });
        }
    }
}

/// 40% read, 30% write, 30% compare-and-swap
pub fn register_worker(workload: Workload, register: &AtomicI8, log: &ConcurrentLog<Register>) {
    let max = i8::try_from(workload.max_value).unwrap_or(i8::MAX);
    let mut rng = rand::thread_rng();
    for _ in 0..workload.ops {
        match rng.gen_range(0..100) {
            0..=39 => record(log, RegisterOp::Read, || {
                RegisterOp::ReadRet(register.load(Ordering::SeqCst))
            }),
            40..=69 => {
                let value = rng.gen_range(0..=max);
                record(log, RegisterOp::Write(value), || {
                    register.store(value, Ordering::SeqCst);
                    RegisterOp::WriteRet
                });
            }
            _ => {
                let current = rng.gen_range(-1..=max);
                let new = rng.gen_range(0..=max);
                record(log, RegisterOp::Cas { current, new }, || {
                    let swapped = register
                        .compare_exchange(current, new, Ordering::SeqCst, Ordering::SeqCst)
                        .is_ok();
                    RegisterOp::CasRet(swapped)
                });
            }
        }
    }
}
