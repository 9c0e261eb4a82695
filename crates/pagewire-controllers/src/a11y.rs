//! Cross-cutting accessibility affordances.
//!
//! Not a state machine. Two jobs:
//!
//! - Maintain a body-level marker class distinguishing keyboard-driven focus
//!   from pointer-driven focus, so the presentation layer can show focus
//!   outlines only to keyboard users. Tab sets it, any pointer press clears
//!   it; the two are mutually exclusive in time, so last-event-wins is
//!   correct.
//! - Back-fill a generic accessible label onto interactive controls that
//!   have neither visible text nor an explicit label. Evaluated once at
//!   bind, as a safety net against unlabeled icon buttons; later DOM
//!   mutation is not re-checked.

use pagewire_core::event::{Event, KeyCode};
use pagewire_host::HostSurface;

use crate::Controller;

/// Configuration for the accessibility controller.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct A11yConfig {
    /// Interactive controls checked for missing labels.
    pub control_selector: String,
    /// Body class marking keyboard-driven focus.
    pub marker_class: String,
    /// Label applied to controls with no text and no label of their own.
    pub fallback_label: String,
}

impl Default for A11yConfig {
    fn default() -> Self {
        Self {
            control_selector: "button, a".to_string(),
            marker_class: "user-is-tabbing".to_string(),
            fallback_label: "Interactive control".to_string(),
        }
    }
}

/// The accessibility controller. Always applicable; never disabled.
pub struct A11yController {
    cfg: A11yConfig,
}

impl A11yController {
    /// Bind and run the one-time label back-fill.
    pub fn bind(host: &mut dyn HostSurface, cfg: A11yConfig) -> Self {
        let mut backfilled = 0u32;
        for control in host.query_selector_all(&cfg.control_selector) {
            if host.text(control).trim().is_empty() && host.attr(control, "aria-label").is_none() {
                host.set_attr(control, "aria-label", &cfg.fallback_label);
                backfilled += 1;
            }
        }
        if backfilled > 0 {
            tracing::debug!(backfilled, "labelled bare interactive controls");
        }
        Self { cfg }
    }
}

impl Controller for A11yController {
    fn name(&self) -> &'static str {
        "a11y"
    }

    fn handle_event(&mut self, host: &mut dyn HostSurface, event: &Event) {
        match event {
            Event::Key(key) if key.code == KeyCode::Tab => {
                let body = host.body();
                host.add_class(body, &self.cfg.marker_class);
            }
            Event::PointerPress(_) => {
                let body = host.body();
                host.remove_class(body, &self.cfg.marker_class);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagewire_core::event::PointerEvent;
    use pagewire_host::MemoryHost;

    #[test]
    fn tab_marks_body_and_pointer_clears_it() {
        let mut host = MemoryHost::new();
        let mut a11y = A11yController::bind(&mut host, A11yConfig::default());
        let body = host.body();

        a11y.handle_event(&mut host, &Event::key(KeyCode::Tab));
        assert!(host.has_class(body, "user-is-tabbing"));

        // Repeated tabs keep the single marker.
        a11y.handle_event(&mut host, &Event::key(KeyCode::Tab));
        assert!(host.has_class(body, "user-is-tabbing"));

        let press = Event::PointerPress(PointerEvent {
            target: None,
            x: 4.0,
            y: 4.0,
        });
        a11y.handle_event(&mut host, &press);
        assert!(!host.has_class(body, "user-is-tabbing"));
    }

    #[test]
    fn other_keys_do_not_mark_the_body() {
        let mut host = MemoryHost::new();
        let mut a11y = A11yController::bind(&mut host, A11yConfig::default());
        a11y.handle_event(&mut host, &Event::key(KeyCode::Enter));
        assert!(!host.has_class(host.body(), "user-is-tabbing"));
    }

    #[test]
    fn bare_controls_get_a_fallback_label_once() {
        let mut host = MemoryHost::new();
        let bare = host.insert("button").class("icon-button").node();
        let labelled = host
            .insert("button")
            .attr("aria-label", "Open menu")
            .node();
        let texty = host.insert("a").text("Pricing").node();

        A11yController::bind(&mut host, A11yConfig::default());

        assert_eq!(
            host.attr(bare, "aria-label").as_deref(),
            Some("Interactive control")
        );
        assert_eq!(host.attr(labelled, "aria-label").as_deref(), Some("Open menu"));
        assert_eq!(host.attr(texty, "aria-label"), None);
    }

    #[test]
    fn later_mutations_are_not_re_evaluated() {
        let mut host = MemoryHost::new();
        A11yController::bind(&mut host, A11yConfig::default());

        let added = host.insert("button").node();
        assert_eq!(host.attr(added, "aria-label"), None);
    }
}
