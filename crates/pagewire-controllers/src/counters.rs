//! Animated statistic counters.
//!
//! A counter element displays a magnitude plus a suffix (`"1,234 users"`).
//! When triggered, the displayed value climbs from zero to the target over a
//! fixed duration in a fixed number of steps, driven by a host interval
//! timer. The final tick snaps exactly to the target, so floating-point
//! accumulation never shows through, and the intermediate values are
//! monotonically non-decreasing.
//!
//! Elements whose text has no parseable magnitude are not counters; no timer
//! is created and the text is left alone.

use pagewire_core::counter::{format_magnitude, parse_counter};
use pagewire_core::id::{NodeId, TimerId};
use pagewire_host::HostSurface;

/// Total animation duration.
const DURATION_MS: u64 = 2000;
/// Number of render steps over the duration.
const STEPS: u32 = 60;

/// One in-flight counter animation.
#[derive(Debug)]
pub struct CounterAnimation {
    node: NodeId,
    target: f64,
    current: f64,
    per_step: f64,
    ticks: u32,
    suffix: String,
    timer: TimerId,
}

impl CounterAnimation {
    /// Begin animating `node`, or `None` when its text is not a counter.
    pub fn start(host: &mut dyn HostSurface, node: NodeId) -> Option<Self> {
        let (target, suffix) = parse_counter(&host.text(node))?;
        let timer = host.set_interval(DURATION_MS / u64::from(STEPS));
        Some(Self {
            node,
            target,
            current: 0.0,
            per_step: target / f64::from(STEPS),
            ticks: 0,
            suffix,
            timer,
        })
    }

    /// Render the final value immediately, skipping the animation.
    ///
    /// Used when the host prefers reduced motion or cannot deliver
    /// visibility notifications. Returns whether the text was a counter.
    pub fn render_final(host: &mut dyn HostSurface, node: NodeId) -> bool {
        match parse_counter(&host.text(node)) {
            Some((target, suffix)) => {
                host.set_text(node, &format!("{}{suffix}", format_magnitude(target)));
                true
            }
            None => false,
        }
    }

    /// The interval timer driving this animation.
    #[must_use]
    pub fn timer(&self) -> TimerId {
        self.timer
    }

    /// Advance one step. Returns `true` when the animation just finished
    /// (the interval is cleared as part of the final tick).
    pub fn tick(&mut self, host: &mut dyn HostSurface) -> bool {
        self.ticks += 1;
        if self.ticks >= STEPS {
            host.set_text(
                self.node,
                &format!("{}{}", format_magnitude(self.target), self.suffix),
            );
            host.clear_timer(self.timer);
            true
        } else {
            self.current += self.per_step;
            host.set_text(
                self.node,
                &format!("{}{}", format_magnitude(self.current), self.suffix),
            );
            false
        }
    }
}
