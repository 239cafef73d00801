use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify};

use cortex_core::errors::{CortexResult, ResilienceError};
use cortex_core::models::Priority;

struct Waiter {
    priority: Priority,
    seq: u64,
    notify: Arc<Notify>,
}

impl PartialEq for Waiter {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}
impl Eq for Waiter {}

impl PartialOrd for Waiter {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Waiter {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: higher Priority sorts first, and among
        // equal priorities the earlier `seq` sorts first (FIFO).
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

struct State {
    available: usize,
    waiters: BinaryHeap<Waiter>,
}

/// Bounded concurrency gate with strict weighted-priority admission order
/// (spec §4.1: "strict weighted-priority ordering of waiters").
///
/// No operation ever holds more than one permit, so this structure cannot
/// deadlock against itself. Always used behind an `Arc` so a [`Permit`]
/// can release itself from `Drop` without borrowing back into the caller.
pub struct PrioritySemaphore {
    ceiling: usize,
    state: Mutex<State>,
    seq: AtomicU64,
}

/// A held slot. Dropping it returns the slot to the semaphore and wakes
/// the highest-priority waiter.
pub struct Permit {
    sem: Arc<PrioritySemaphore>,
}

impl Drop for Permit {
    fn drop(&mut self) {
        let sem = self.sem.clone();
        tokio::spawn(async move { sem.release().await });
    }
}

impl PrioritySemaphore {
    pub fn new(ceiling: usize) -> Arc<Self> {
        Arc::new(Self {
            ceiling,
            state: Mutex::new(State {
                available: ceiling,
                waiters: BinaryHeap::new(),
            }),
            seq: AtomicU64::new(0),
        })
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    pub async fn in_flight(&self) -> usize {
        let state = self.state.lock().await;
        self.ceiling - state.available
    }

    /// Acquire a slot, waiting up to `timeout` in strict priority order.
    /// `Priority::Critical` callers still queue behind other in-flight
    /// critical work but are admitted ahead of every other class.
    pub async fn acquire(
        self: &Arc<Self>,
        priority: Priority,
        timeout: Duration,
    ) -> CortexResult<Permit> {
        let notify = {
            let mut state = self.state.lock().await;
            if state.waiters.is_empty() && state.available > 0 {
                state.available -= 1;
                return Ok(Permit { sem: self.clone() });
            }
            self.enqueue(&mut state, priority)
        };

        let started = tokio::time::Instant::now();
        loop {
            let remaining = timeout.saturating_sub(started.elapsed());
            if remaining.is_zero() || tokio::time::timeout(remaining, notify.notified()).await.is_err() {
                self.remove_waiter(&notify).await;
                return Err(ResilienceError::ConcurrencyTimeout {
                    waited_ms: timeout.as_millis() as u64,
                }
                .into());
            }
            let mut state = self.state.lock().await;
            if state.available > 0 {
                state.available -= 1;
                return Ok(Permit { sem: self.clone() });
            }
            // Spurious wake (a competing waiter raced us): re-queue at the
            // same priority and keep waiting.
            state.waiters.push(Waiter {
                priority,
                seq: self.seq.fetch_add(1, AtomicOrdering::Relaxed),
                notify: notify.clone(),
            });
        }
    }

    fn enqueue(&self, state: &mut State, priority: Priority) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        state.waiters.push(Waiter {
            priority,
            seq: self.seq.fetch_add(1, AtomicOrdering::Relaxed),
            notify: notify.clone(),
        });
        notify
    }

    async fn release(&self) {
        let mut state = self.state.lock().await;
        state.available += 1;
        if let Some(waiter) = state.waiters.pop() {
            waiter.notify.notify_one();
        }
    }

    async fn remove_waiter(&self, notify: &Arc<Notify>) {
        let mut state = self.state.lock().await;
        state.waiters.retain(|w| !Arc::ptr_eq(&w.notify, notify));
    }
}
