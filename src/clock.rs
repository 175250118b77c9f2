//! Monotonic microsecond clock boundary
//!
//! The engine never calls a time source directly; it reads through this
//! trait. `MonotonicClock` is the wall source for live instrumentation,
//! `ManualClock` serves scripted readings for tests and trace replay.
//! The hot path consumes two readings per observed event: one at callback
//! entry and one when the current-line cursor is set.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Instant;

/// Source of monotonic microsecond timestamps
pub trait Clock {
    fn now_micros(&self) -> u64;
}

/// Wall clock anchored at construction time
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_micros(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }
}

/// Clock fed an explicit queue of readings
///
/// Each `now_micros` call pops the next queued reading; once the queue is
/// drained, the last delivered reading is repeated so time never moves
/// backwards. Shared via `Rc` between the feeder and the session.
#[derive(Debug, Default)]
pub struct ManualClock {
    queued: RefCell<VecDeque<u64>>,
    last: Cell<u64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one reading
    pub fn feed(&self, micros: u64) {
        self.queued.borrow_mut().push_back(micros);
    }

    /// Queue a batch of readings in order
    pub fn feed_all<I: IntoIterator<Item = u64>>(&self, readings: I) {
        let mut queued = self.queued.borrow_mut();
        queued.extend(readings);
    }

    /// Drop any queued readings and make `micros` the current time
    ///
    /// Every subsequent read returns `micros` until the clock is fed or
    /// set again, however many reads the consumer performs.
    pub fn set_now(&self, micros: u64) {
        self.queued.borrow_mut().clear();
        self.last.set(micros);
    }
}

impl Clock for ManualClock {
    fn now_micros(&self) -> u64 {
        match self.queued.borrow_mut().pop_front() {
            Some(micros) => {
                self.last.set(micros);
                micros
            }
            None => self.last.get(),
        }
    }
}
