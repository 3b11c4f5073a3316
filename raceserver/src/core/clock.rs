use std::cell::Cell;
use std::time::{Duration, Instant};

/// Clock returns the time elapsed since an arbitrary but fixed starting point.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// SystemClock is the monotonic wall clock.
#[derive(Debug, Clone)]
pub struct SystemClock {
    t_start: Instant,
}

impl SystemClock {
    pub fn new() -> SystemClock {
        SystemClock {
            t_start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        SystemClock::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.t_start.elapsed()
    }
}

/// ManualClock only moves when it is advanced explicitly.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> ManualClock {
        ManualClock::default()
    }

    pub fn advance(&self, dt: Duration) {
        self.now.set(self.now.get() + dt);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Ticker fires once per interval. If the owner falls behind by more than one interval, the
/// missed ticks are dropped instead of being fired in a burst.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next_due: Duration,
}

impl Ticker {
    pub fn new(interval: Duration, now: Duration) -> Ticker {
        Ticker {
            interval,
            next_due: now + interval,
        }
    }

    /// time_until_next returns the time until the next tick is due (zero if it is overdue).
    pub fn time_until_next(&self, now: Duration) -> Duration {
        self.next_due.saturating_sub(now)
    }

    /// poll returns true if a tick is due and schedules the next one.
    pub fn poll(&mut self, now: Duration) -> bool {
        if now < self.next_due {
            return false;
        }

        self.next_due += self.interval;

        if self.next_due <= now {
            log::warn!("Could not keep up with the tick interval, dropping missed ticks!");
            self.next_due = now + self.interval;
        }

        true
    }
}
