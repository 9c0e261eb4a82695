//! One-shot visibility effects: lazy media, entrance reveals, counters.
//!
//! One mechanism, three payloads. Each target is registered with the host's
//! visibility observation and recorded in an explicit watch table
//! (`Pending → Fired`). When the host reports an enter edge, the watch
//! fires its effect, flips to `Fired`, and unregisters the observation in
//! the same handler — so a target cannot fire twice no matter how often it
//! re-enters the viewport.
//!
//! # Effects
//!
//! - **Lazy load**: copy the staged `data-src` into `src`, mark loaded.
//!   Small threshold with a positive margin so media starts fetching just
//!   before it scrolls in.
//! - **Reveal**: add the animate-in class; the presentation layer owns the
//!   transition. A negative fold-side margin keeps blocks that barely peek
//!   over the fold from animating prematurely.
//! - **Counter**: run the counter animation once and mark the element
//!   counted. Half the element must be visible.
//!
//! # Degraded mode
//!
//! A host without visibility observation applies every effect eagerly at
//! bind: media loads, blocks reveal, counters render their final value.

use pagewire_core::event::Event;
use pagewire_core::geometry::{IntersectionConfig, Margin};
use pagewire_core::id::{NodeId, ObservationId};
use pagewire_host::HostSurface;

use crate::counters::CounterAnimation;
use crate::{Controller, Disabled};

/// Targeting and threshold configuration for the three effect kinds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObserveConfig {
    pub lazy_selector: String,
    pub reveal_selector: String,
    pub counter_selector: String,
    pub lazy_intersection: IntersectionConfig,
    pub reveal_intersection: IntersectionConfig,
    pub counter_intersection: IntersectionConfig,
    pub loaded_class: String,
    pub reveal_class: String,
    pub counted_class: String,
}

impl Default for ObserveConfig {
    fn default() -> Self {
        Self {
            lazy_selector: "[data-src]".to_string(),
            reveal_selector: ".feature-card, .section-title, .stat-card".to_string(),
            counter_selector: "[data-counter]".to_string(),
            lazy_intersection: IntersectionConfig::new(Margin::uniform(50.0), 0.1),
            reveal_intersection: IntersectionConfig::new(Margin::new(0.0, 0.0, -50.0, 0.0), 0.1),
            counter_intersection: IntersectionConfig::new(Margin::default(), 0.5),
            loaded_class: "loaded".to_string(),
            reveal_class: "animate-in".to_string(),
            counted_class: "counted".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EffectKind {
    LazyLoad,
    Reveal,
    Counter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WatchState {
    Pending,
    Fired,
}

/// One observed target and its one-shot bookkeeping.
#[derive(Debug, Clone, Copy)]
struct Watch {
    node: NodeId,
    observation: ObservationId,
    effect: EffectKind,
    state: WatchState,
}

/// Drives every visibility-triggered effect on the page.
#[derive(Debug)]
pub struct VisibilityController {
    cfg: ObserveConfig,
    watches: Vec<Watch>,
    animations: Vec<CounterAnimation>,
}

impl VisibilityController {
    /// Register every matching target, or report that this page has none.
    pub fn bind(host: &mut dyn HostSurface, cfg: ObserveConfig) -> Result<Self, Disabled> {
        let lazy = host.query_selector_all(&cfg.lazy_selector);
        let reveal = host.query_selector_all(&cfg.reveal_selector);
        let counters = host.query_selector_all(&cfg.counter_selector);

        if lazy.is_empty() && reveal.is_empty() && counters.is_empty() {
            return Err(Disabled::NoTargets {
                selector: format!(
                    "{}, {}, {}",
                    cfg.lazy_selector, cfg.reveal_selector, cfg.counter_selector
                ),
            });
        }

        if !host.supports_intersection() {
            tracing::warn!("visibility observation unavailable; applying effects eagerly");
            for node in lazy {
                apply_lazy(host, &cfg, node);
            }
            for node in reveal {
                host.add_class(node, &cfg.reveal_class);
            }
            for node in counters {
                if CounterAnimation::render_final(host, node) {
                    host.add_class(node, &cfg.counted_class);
                }
            }
            return Ok(Self {
                cfg,
                watches: Vec::new(),
                animations: Vec::new(),
            });
        }

        let mut watches = Vec::new();
        for (nodes, effect, intersection) in [
            (lazy, EffectKind::LazyLoad, cfg.lazy_intersection),
            (reveal, EffectKind::Reveal, cfg.reveal_intersection),
            (counters, EffectKind::Counter, cfg.counter_intersection),
        ] {
            for node in nodes {
                watches.push(Watch {
                    node,
                    observation: host.observe(node, intersection),
                    effect,
                    state: WatchState::Pending,
                });
            }
        }

        Ok(Self {
            cfg,
            watches,
            animations: Vec::new(),
        })
    }

    /// Number of watches that have not fired yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.watches
            .iter()
            .filter(|w| w.state == WatchState::Pending)
            .count()
    }

    /// Number of counter animations currently running.
    #[must_use]
    pub fn running_animations(&self) -> usize {
        self.animations.len()
    }

    fn on_enter(&mut self, host: &mut dyn HostSurface, observation: ObservationId) {
        let Some(idx) = self
            .watches
            .iter()
            .position(|w| w.observation == observation && w.state == WatchState::Pending)
        else {
            return;
        };
        self.watches[idx].state = WatchState::Fired;
        let Watch { node, effect, .. } = self.watches[idx];

        // Unregister before the effect: at-most-once even if the effect
        // itself changes layout.
        host.unobserve(observation);

        match effect {
            EffectKind::LazyLoad => apply_lazy(host, &self.cfg, node),
            EffectKind::Reveal => host.add_class(node, &self.cfg.reveal_class),
            EffectKind::Counter => {
                if host.prefers_reduced_motion() {
                    if CounterAnimation::render_final(host, node) {
                        host.add_class(node, &self.cfg.counted_class);
                    }
                } else if let Some(animation) = CounterAnimation::start(host, node) {
                    host.add_class(node, &self.cfg.counted_class);
                    self.animations.push(animation);
                }
            }
        }
    }
}

fn apply_lazy(host: &mut dyn HostSurface, cfg: &ObserveConfig, node: NodeId) {
    if let Some(src) = host.attr(node, "data-src") {
        host.set_attr(node, "src", &src);
        host.add_class(node, &cfg.loaded_class);
        tracing::debug!(node = %node, "deferred media loading");
    }
}

impl Controller for VisibilityController {
    fn name(&self) -> &'static str {
        "visibility"
    }

    fn handle_event(&mut self, host: &mut dyn HostSurface, event: &Event) {
        match event {
            Event::Visibility { observation, .. } => {
                let observation = *observation;
                self.on_enter(host, observation);
            }
            Event::Timer { id } => {
                let id = *id;
                self.animations
                    .retain_mut(|animation| animation.timer() != id || !animation.tick(host));
            }
            _ => {}
        }
    }
}
