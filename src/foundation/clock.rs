//! Monotonic time source and fixed-rate tick pacing.
//!
//! Everything that sleeps or measures elapsed time goes through [`Clock`] so the pacing logic
//! can run against [`ManualClock`] in tests.

use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};

/// Monotonic clock.
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;
    /// Block the caller for `d`.
    fn sleep(&self, d: Duration);
}

/// Wall-clock implementation backed by [`Instant`].
#[derive(Clone, Copy, Debug)]
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
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, d: Duration) {
        std::thread::sleep(d);
    }
}

/// Hand-driven clock. `sleep` advances time instantly and records the request.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
    sleeps: RefCell<Vec<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward without recording a sleep (simulates work).
    pub fn advance(&self, d: Duration) {
        self.now.set(self.now.get() + d);
    }

    /// Every sleep requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, d: Duration) {
        self.sleeps.borrow_mut().push(d);
        self.advance(d);
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn sleep(&self, d: Duration) {
        (**self).sleep(d)
    }
}

/// Outcome of one paced tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Time spent between [`TickScheduler::begin`] and [`TickScheduler::finish`].
    pub busy: Duration,
    /// Time slept to fill the rest of the tick.
    pub slept: Duration,
}

impl TickReport {
    /// `true` when the work alone took at least one full tick.
    pub fn overran(&self) -> bool {
        self.slept.is_zero()
    }
}

/// Best-effort fixed-rate pacing: sleep for whatever is left of the tick, never catch up.
#[derive(Debug)]
pub struct TickScheduler<C> {
    clock: C,
    tick: Duration,
}

impl<C: Clock> TickScheduler<C> {
    pub fn new(clock: C, tick: Duration) -> Self {
        Self { clock, tick }
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Timestamp the start of a tick.
    pub fn begin(&self) -> Duration {
        self.clock.now()
    }

    /// Sleep out the remainder of the tick started at `started`.
    pub fn finish(&self, started: Duration) -> TickReport {
        let busy = self.clock.now().saturating_sub(started);
        let slept = self.tick.saturating_sub(busy);
        if slept.is_zero() {
            tracing::trace!(?busy, tick = ?self.tick, "tick overran");
        } else {
            self.clock.sleep(slept);
        }
        TickReport { busy, slept }
    }
}
