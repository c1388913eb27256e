//! Cancellable one-shot timers driven by the event loop's clock.
//!
//! Nothing runs in the background: the loop asks how long it may block
//! ([`Debouncer::time_until`]) and polls after waking. Every schedule pushes
//! the deadline back, so a burst of keystrokes fires once, after it settles.

use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
/// A deadline that is reset on every schedule and fires at most once.
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    #[must_use]
    /// An idle debouncer firing `delay` after the last schedule.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// (Re)start the timer from `now`, superseding any pending deadline.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Drop the pending deadline, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    /// Whether a deadline is pending.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once when the deadline has passed; the timer is then idle.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    /// How long until the deadline, zero if overdue, `None` if idle.
    pub fn time_until(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

#[must_use]
/// The shortest wait across several debouncers, capped at `idle`.
pub fn next_wakeup(timers: &[&Debouncer], now: Instant, idle: Duration) -> Duration {
    timers
        .iter()
        .filter_map(|timer| timer.time_until(now))
        .fold(idle, Duration::min)
}

#[cfg(test)]
#[path = "tests/debounce.rs"]
mod tests;
