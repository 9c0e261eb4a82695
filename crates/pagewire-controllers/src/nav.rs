//! Collapsible navigation: a toggle button and a slide-out panel.
//!
//! # State machine
//!
//! Two states, `Closed` (initial) and `Open`. Transitions:
//!
//! - toggle activated → invert
//! - panel link activated → `Closed` (then the anchor is scrolled to)
//! - pointer press outside toggle and panel while `Open` → `Closed`
//! - Escape while `Open` → `Closed`, focus returned to the toggle
//! - debounced resize past the desktop breakpoint while `Open` → `Closed`
//!
//! # Invariants
//!
//! 1. `Open` ⇔ panel `aria-hidden="false"` ⇔ toggle `aria-expanded="true"`
//!    ⇔ this controller holds the scroll lock.
//! 2. Every handler reads the current state before acting; no transition is
//!    coalesced or skipped.
//!
//! The controller also owns active-link highlighting: on (throttled) scroll,
//! the link whose section currently sits under the header offset line gets
//! the active class.

use std::cell::RefCell;
use std::rc::Rc;

use pagewire_core::event::{Event, KeyCode};
use pagewire_core::id::{NodeId, TimerId};
use pagewire_core::rate_limit::{Debounce, Throttle};
use pagewire_core::scroll_lock::{LockChange, ScrollLock};
use pagewire_host::HostSurface;

use crate::scroll::{self, ScrollConfig};
use crate::{Controller, Disabled};

/// Selectors and tuning for the navigation controller.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavConfig {
    pub toggle_selector: String,
    pub panel_selector: String,
    /// Candidate link elements; only panel descendants with a `#fragment`
    /// href are kept.
    pub link_selector: String,
    /// Class marking the link whose section is currently in view.
    pub active_class: String,
    /// Viewport width beyond which an open panel auto-collapses.
    pub desktop_breakpoint: f64,
    /// Delay before focus moves into a freshly opened panel, letting the
    /// opening transition start first.
    pub focus_delay_ms: u64,
    pub resize_debounce_ms: u64,
    pub scroll_throttle_ms: u64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            toggle_selector: ".nav-toggle".to_string(),
            panel_selector: ".nav-menu".to_string(),
            link_selector: "a".to_string(),
            active_class: "active".to_string(),
            desktop_breakpoint: 768.0,
            focus_delay_ms: 100,
            resize_debounce_ms: 150,
            scroll_throttle_ms: 100,
        }
    }
}

/// Whether the panel is out or away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Closed,
    Open,
}

/// The navigation controller. See the module docs for the state machine.
#[derive(Debug)]
pub struct NavController {
    cfg: NavConfig,
    scroll_cfg: ScrollConfig,
    toggle: NodeId,
    panel: NodeId,
    /// Panel links paired with their `#fragment` targets.
    links: Vec<(NodeId, String)>,
    state: NavState,
    lock: Rc<RefCell<ScrollLock>>,
    resize: Debounce<f64>,
    scroll_spy: Throttle,
    focus_timer: Option<TimerId>,
}

impl NavController {
    /// Wire up against the current page, or report why this page has no
    /// collapsible navigation.
    pub fn bind(
        host: &mut dyn HostSurface,
        cfg: NavConfig,
        scroll_cfg: ScrollConfig,
        lock: Rc<RefCell<ScrollLock>>,
    ) -> Result<Self, Disabled> {
        let toggle = host
            .query_selector(&cfg.toggle_selector)
            .ok_or_else(|| Disabled::MissingElement {
                role: "navigation toggle",
                selector: cfg.toggle_selector.clone(),
            })?;
        let panel = host
            .query_selector(&cfg.panel_selector)
            .ok_or_else(|| Disabled::MissingElement {
                role: "navigation panel",
                selector: cfg.panel_selector.clone(),
            })?;

        let links: Vec<(NodeId, String)> = host
            .query_selector_all(&cfg.link_selector)
            .into_iter()
            .filter(|&link| host.contains(panel, link))
            .filter_map(|link| {
                let href = host.attr(link, "href")?;
                let fragment = href.strip_prefix('#')?;
                (!fragment.is_empty()).then(|| (link, fragment.to_string()))
            })
            .collect();

        host.set_attr(panel, "aria-hidden", "true");
        host.set_attr(toggle, "aria-expanded", "false");

        let resize = Debounce::new(cfg.resize_debounce_ms);
        let scroll_spy = Throttle::new(cfg.scroll_throttle_ms);
        Ok(Self {
            cfg,
            scroll_cfg,
            toggle,
            panel,
            links,
            state: NavState::Closed,
            lock,
            resize,
            scroll_spy,
            focus_timer: None,
        })
    }

    #[must_use]
    pub fn state(&self) -> NavState {
        self.state
    }

    fn toggle_panel(&mut self, host: &mut dyn HostSurface) {
        match self.state {
            NavState::Closed => self.open(host),
            NavState::Open => self.close(host),
        }
    }

    fn open(&mut self, host: &mut dyn HostSurface) {
        self.state = NavState::Open;
        host.set_attr(self.panel, "aria-hidden", "false");
        host.set_attr(self.toggle, "aria-expanded", "true");
        if self.lock.borrow_mut().acquire() == LockChange::Engaged {
            let body = host.body();
            host.set_style(body, "overflow", "hidden");
        }
        self.focus_timer = Some(host.set_timeout(self.cfg.focus_delay_ms));
        tracing::debug!("navigation panel opened");
    }

    fn close(&mut self, host: &mut dyn HostSurface) {
        self.state = NavState::Closed;
        host.set_attr(self.panel, "aria-hidden", "true");
        host.set_attr(self.toggle, "aria-expanded", "false");
        if self.lock.borrow_mut().release() == LockChange::Released {
            let body = host.body();
            host.remove_style(body, "overflow");
        }
        if let Some(timer) = self.focus_timer.take() {
            host.clear_timer(timer);
        }
        tracing::debug!("navigation panel closed");
    }

    fn link_fragment(&self, target: NodeId) -> Option<String> {
        self.links
            .iter()
            .find(|(link, _)| *link == target)
            .map(|(_, fragment)| fragment.clone())
    }

    fn follow_link(&mut self, host: &mut dyn HostSurface, fragment: &str) {
        if self.state == NavState::Open {
            self.close(host);
        }
        if let Some(section) = host.query_selector(&format!("#{fragment}")) {
            scroll::scroll_to_anchor(host, section, &self.scroll_cfg);
            host.set_fragment(fragment);
        }
    }

    fn first_interactive(&self, host: &dyn HostSurface) -> Option<NodeId> {
        host.query_selector_all("a, button")
            .into_iter()
            .find(|&node| host.contains(self.panel, node))
    }

    fn on_timer(&mut self, host: &mut dyn HostSurface, id: TimerId) {
        if let Some(width) = self.resize.on_timer(id) {
            if self.state == NavState::Open && width > self.cfg.desktop_breakpoint {
                tracing::debug!(width, "auto-collapsing navigation at desktop width");
                self.close(host);
            }
        } else if self.focus_timer == Some(id) {
            self.focus_timer = None;
            if self.state == NavState::Open
                && let Some(first) = self.first_interactive(host)
            {
                host.focus(first);
            }
        }
    }

    /// Mark the link whose section spans the header offset line.
    fn update_active_link(&self, host: &mut dyn HostSurface) {
        let offset = scroll::header_height(host, &self.scroll_cfg) + self.scroll_cfg.extra_offset;
        let mut active: Option<NodeId> = None;
        for (link, fragment) in &self.links {
            let Some(section) = host.query_selector(&format!("#{fragment}")) else {
                continue;
            };
            let rect = host.bounding_rect(section);
            if rect.y <= offset && rect.bottom() > offset {
                active = Some(*link);
            }
        }
        for (link, _) in &self.links {
            if active == Some(*link) {
                host.add_class(*link, &self.cfg.active_class);
            } else {
                host.remove_class(*link, &self.cfg.active_class);
            }
        }
    }
}

impl Controller for NavController {
    fn name(&self) -> &'static str {
        "nav"
    }

    fn handle_event(&mut self, host: &mut dyn HostSurface, event: &Event) {
        match event {
            Event::Activate { target } if *target == self.toggle => self.toggle_panel(host),
            Event::Activate { target } => {
                if let Some(fragment) = self.link_fragment(*target) {
                    self.follow_link(host, &fragment);
                }
            }
            Event::PointerPress(press) if self.state == NavState::Open => {
                let inside = press.target.is_some_and(|t| {
                    host.contains(self.toggle, t) || host.contains(self.panel, t)
                });
                if !inside {
                    self.close(host);
                }
            }
            Event::Key(key) if key.code == KeyCode::Escape && self.state == NavState::Open => {
                self.close(host);
                host.focus(self.toggle);
            }
            Event::Resize { width, .. } => {
                let width = *width;
                self.resize.call(host, width);
            }
            Event::Scroll { .. } => {
                if self.scroll_spy.admit(host.now_ms(), ()).is_some() {
                    self.update_active_link(host);
                }
            }
            Event::Timer { id } => {
                let id = *id;
                self.on_timer(host, id);
            }
            _ => {}
        }
    }
}
