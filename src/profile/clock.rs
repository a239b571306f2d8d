use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Source of epoch-millisecond timestamps for visits and chronicle entries.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Deterministic clock that advances by a fixed step on every reading.
/// Clones share the same counter.
#[derive(Debug, Clone)]
pub struct ManualClock {
    next: Arc<AtomicI64>,
    step: i64,
}

impl ManualClock {
    pub fn starting_at(start: i64, step: i64) -> Self {
        Self {
            next: Arc::new(AtomicI64::new(start)),
            step,
        }
    }

    /// The value the next reading will return.
    pub fn peek(&self) -> i64 {
        self.next.load(Ordering::SeqCst)
    }

    pub fn set(&self, millis: i64) {
        self.next.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.next.fetch_add(self.step, Ordering::SeqCst)
    }
}
