//! Rate limiting for high-frequency event streams.
//!
//! Two disciplines, both with a single slot rather than a queue:
//!
//! - [`Debounce`]: a burst of calls collapses to the **last** one, executed
//!   after a quiescence delay.
//! - [`Throttle`]: at most one call per window, the **first** in each window
//!   executed immediately; the rest are dropped.
//!
//! Neither wrapper invokes anything itself. `Debounce` arms a host timer and
//! surrenders the stored payload when the matching [`Event::Timer`] arrives;
//! `Throttle` is a pure admission check against the host clock. This keeps
//! both usable from event handlers without callback plumbing.
//!
//! # Invariants
//!
//! 1. A `Debounce` holds at most one armed timer; re-calling cancels the old
//!    one before arming the next.
//! 2. `Debounce::on_timer` yields the payload exactly once per quiescent
//!    burst, and only for the timer it armed last.
//! 3. `Throttle` admits the first call of each window and drops (not queues)
//!    every later call inside it.
//!
//! [`Event::Timer`]: crate::event::Event::Timer

use crate::id::TimerId;
use crate::timer::TimerHost;

/// Trailing-edge debounce with a single pending-timer slot.
#[derive(Debug)]
pub struct Debounce<T> {
    delay_ms: u64,
    pending: Option<(TimerId, T)>,
}

impl<T> Debounce<T> {
    /// A debouncer that waits `delay_ms` of quiescence before releasing.
    #[must_use]
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Record an invocation, replacing any pending one.
    ///
    /// Cancels the previously armed timer (if any) and arms a fresh one, so
    /// only the most recent payload survives a burst.
    pub fn call(&mut self, host: &mut dyn TimerHost, payload: T) {
        if let Some((stale, _)) = self.pending.take() {
            host.clear_timer(stale);
        }
        let timer = host.set_timeout(self.delay_ms);
        self.pending = Some((timer, payload));
    }

    /// Offer a fired timer; yields the stored payload when it is ours.
    pub fn on_timer(&mut self, id: TimerId) -> Option<T> {
        match self.pending.take() {
            Some((armed, payload)) if armed == id => Some(payload),
            other => {
                self.pending = other;
                None
            }
        }
    }

    /// Drop any pending invocation and cancel its timer.
    pub fn cancel(&mut self, host: &mut dyn TimerHost) {
        if let Some((timer, _)) = self.pending.take() {
            host.clear_timer(timer);
        }
    }

    /// Whether an invocation is waiting for its quiescence timer.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Leading-edge throttle: first call in a window passes, the rest drop.
#[derive(Debug)]
pub struct Throttle {
    window_ms: u64,
    last_admitted: Option<u64>,
}

impl Throttle {
    #[must_use]
    pub const fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_admitted: None,
        }
    }

    /// Admit or drop an invocation at time `now_ms`.
    ///
    /// Returns the payload when this call opens a new window; `None` when a
    /// previous call already claimed it.
    pub fn admit<T>(&mut self, now_ms: u64, payload: T) -> Option<T> {
        match self.last_admitted {
            Some(last) if now_ms < last.saturating_add(self.window_ms) => None,
            _ => {
                self.last_admitted = Some(now_ms);
                Some(payload)
            }
        }
    }
}
