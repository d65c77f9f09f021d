//! Timing primitives for the two loops: a fixed-interval timer for ticks and
//! a display-rate pacer for frames. Both are driven by an explicit `now`
//! so hosts and tests control time.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed.get()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed.get()
    }
}

/// Fires once per `period`. After a stall, at most `max_catch_up` overdue
/// ticks are reported and the rest are dropped.
#[derive(Clone, Debug)]
pub struct Interval {
    period: Duration,
    next_due: Instant,
    max_catch_up: u32,
}

impl Interval {
    pub const DEFAULT_CATCH_UP: u32 = 3;

    /// First tick is due one `period` after `start`.
    pub fn new(period: Duration, start: Instant) -> Self {
        Self {
            period,
            next_due: start + period,
            max_catch_up: Self::DEFAULT_CATCH_UP,
        }
    }

    pub fn with_max_catch_up(mut self, max: u32) -> Self {
        self.max_catch_up = max.max(1);
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Number of ticks due at `now`; advances the schedule past them.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let mut fired = 0;
        while now >= self.next_due {
            fired += 1;
            self.next_due += self.period;
            if fired == self.max_catch_up {
                if now >= self.next_due {
                    // Skip the backlog rather than replaying it.
                    self.next_due = now + self.period;
                }
                break;
            }
        }
        fired
    }
}

/// Display-refresh stand-in: one frame per `frame_interval`, never more than
/// one per poll.
#[derive(Clone, Debug)]
pub struct FramePacer {
    frame_interval: Duration,
    next_due: Instant,
}

impl FramePacer {
    /// The first frame is due immediately.
    pub fn new(frame_interval: Duration, start: Instant) -> Self {
        Self {
            frame_interval,
            next_due: start,
        }
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due += self.frame_interval;
        if self.next_due <= now {
            self.next_due = now + self.frame_interval;
        }
        true
    }
}
