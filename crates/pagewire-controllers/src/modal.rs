//! Video overlay: lazily built, session-scoped, fully reversible.
//!
//! The overlay markup does not exist until the first open — a page where no
//! video is ever played pays no element cost. Each open creates a
//! `ModalSession` holding the fresh embedded-media element and the node that
//! had focus; close detaches the media (stopping playback by removal, not by
//! command), restores scrolling and focus, and drops the session. Escape is
//! honored only while a session exists, so repeated open/close cycles cannot
//! leak key handling.
//!
//! # Invariants
//!
//! 1. At most one session exists at a time; opening over a live session
//!    closes it first.
//! 2. After close, no media element remains anywhere in the overlay.
//! 3. The scroll lock is held exactly while a session exists.

use std::cell::RefCell;
use std::rc::Rc;

use pagewire_core::event::{Event, KeyCode};
use pagewire_core::id::NodeId;
use pagewire_core::scroll_lock::{LockChange, ScrollLock};
use pagewire_host::HostSurface;

use crate::{Controller, Disabled};

/// Selectors and class names for the video overlay.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModalConfig {
    /// Elements that open the overlay when activated; the media URL is read
    /// from this attribute.
    pub trigger_attr: String,
    pub overlay_class: String,
    pub content_class: String,
    pub close_class: String,
    pub media_class: String,
    pub close_label: String,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            trigger_attr: "data-video-url".to_string(),
            overlay_class: "video-modal".to_string(),
            content_class: "video-modal__content".to_string(),
            close_class: "video-modal__close".to_string(),
            media_class: "video-modal__frame".to_string(),
            close_label: "Close video".to_string(),
        }
    }
}

/// Overlay elements, built on first use and reused across sessions.
#[derive(Debug, Clone, Copy)]
struct Overlay {
    backdrop: NodeId,
    content: NodeId,
    close: NodeId,
}

/// Live state between an open and its matching close.
#[derive(Debug)]
struct ModalSession {
    media: NodeId,
    prev_focus: Option<NodeId>,
}

/// The video overlay controller.
pub struct ModalController {
    cfg: ModalConfig,
    triggers: Vec<NodeId>,
    lock: Rc<RefCell<ScrollLock>>,
    overlay: Option<Overlay>,
    session: Option<ModalSession>,
}

impl ModalController {
    /// Bind trigger elements. A page without triggers still gets a
    /// controller — the overlay can be opened programmatically.
    pub fn bind(
        host: &mut dyn HostSurface,
        cfg: ModalConfig,
        lock: Rc<RefCell<ScrollLock>>,
    ) -> Result<Self, Disabled> {
        let triggers = host.query_selector_all(&format!("[{}]", cfg.trigger_attr));
        Ok(Self {
            cfg,
            triggers,
            lock,
            overlay: None,
            session: None,
        })
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Open the overlay on `url`, closing any live session first.
    pub fn open(&mut self, host: &mut dyn HostSurface, url: &str) {
        if self.session.is_some() {
            self.close(host);
        }
        let overlay = self.ensure_overlay(host);

        let media = host.create_element("iframe");
        host.add_class(media, &self.cfg.media_class);
        host.set_attr(media, "src", url);
        host.set_attr(media, "allow", "autoplay; fullscreen");
        host.set_attr(media, "allowfullscreen", "");
        host.append_child(overlay.content, media);

        host.set_style(overlay.backdrop, "display", "flex");
        if self.lock.borrow_mut().acquire() == LockChange::Engaged {
            let body = host.body();
            host.set_style(body, "overflow", "hidden");
        }

        let prev_focus = host.focused();
        host.focus(overlay.close);
        self.session = Some(ModalSession { media, prev_focus });
        tracing::debug!(url, "video overlay opened");
    }

    /// Close the overlay, reversing every side effect of the open.
    pub fn close(&mut self, host: &mut dyn HostSurface) {
        let Some(session) = self.session.take() else {
            return;
        };
        host.remove_node(session.media);
        if let Some(overlay) = self.overlay {
            host.set_style(overlay.backdrop, "display", "none");
        }
        if self.lock.borrow_mut().release() == LockChange::Released {
            let body = host.body();
            host.remove_style(body, "overflow");
        }
        if let Some(prev) = session.prev_focus {
            host.focus(prev);
        }
        tracing::debug!("video overlay closed");
    }

    fn ensure_overlay(&mut self, host: &mut dyn HostSurface) -> Overlay {
        if let Some(overlay) = self.overlay {
            return overlay;
        }
        let backdrop = host.create_element("div");
        host.add_class(backdrop, &self.cfg.overlay_class);
        host.set_attr(backdrop, "role", "dialog");
        host.set_attr(backdrop, "aria-modal", "true");
        host.set_style(backdrop, "display", "none");

        let content = host.create_element("div");
        host.add_class(content, &self.cfg.content_class);

        let close = host.create_element("button");
        host.add_class(close, &self.cfg.close_class);
        host.set_attr(close, "aria-label", &self.cfg.close_label);
        host.set_text(close, "\u{00d7}");

        host.append_child(content, close);
        host.append_child(backdrop, content);
        let body = host.body();
        host.append_child(body, backdrop);

        let overlay = Overlay {
            backdrop,
            content,
            close,
        };
        self.overlay = Some(overlay);
        overlay
    }

    fn trigger_url(&self, host: &dyn HostSurface, target: NodeId) -> Option<String> {
        self.triggers
            .contains(&target)
            .then(|| host.attr(target, &self.cfg.trigger_attr))
            .flatten()
    }
}

impl Controller for ModalController {
    fn name(&self) -> &'static str {
        "modal"
    }

    fn handle_event(&mut self, host: &mut dyn HostSurface, event: &Event) {
        match event {
            Event::Activate { target } => {
                if let Some(overlay) = self.overlay
                    && *target == overlay.close
                {
                    self.close(host);
                } else if let Some(url) = self.trigger_url(host, *target) {
                    self.open(host, &url);
                }
            }
            Event::PointerPress(press) if self.session.is_some() => {
                // Backdrop press: on the overlay itself, not inside content.
                if let (Some(overlay), Some(target)) = (self.overlay, press.target)
                    && target == overlay.backdrop
                {
                    self.close(host);
                }
            }
            Event::Key(key) if key.code == KeyCode::Escape && self.session.is_some() => {
                self.close(host);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagewire_host::MemoryHost;

    fn fixture() -> (MemoryHost, ModalController, NodeId) {
        let mut host = MemoryHost::new();
        let trigger = host
            .insert("button")
            .attr("data-video-url", "https://example.com/v")
            .text("Watch the demo")
            .node();
        let lock = Rc::new(RefCell::new(ScrollLock::new()));
        let modal = ModalController::bind(&mut host, ModalConfig::default(), lock).unwrap();
        (host, modal, trigger)
    }

    fn media_nodes(host: &MemoryHost) -> Vec<NodeId> {
        host.query_selector_all("iframe")
    }

    #[test]
    fn overlay_markup_is_not_built_until_first_open() {
        let (host, modal, _) = fixture();
        assert!(!modal.is_open());
        assert!(host.query_selector(".video-modal").is_none());
    }

    #[test]
    fn trigger_activation_opens_with_media_and_focus() {
        let (mut host, mut modal, trigger) = fixture();
        host.focus(trigger);

        let event = Event::Activate { target: trigger };
        modal.handle_event(&mut host, &event);

        assert!(modal.is_open());
        let media = media_nodes(&host);
        assert_eq!(media.len(), 1);
        assert_eq!(
            host.attr(media[0], "src").as_deref(),
            Some("https://example.com/v")
        );
        let close = host.query_selector(".video-modal__close").unwrap();
        assert_eq!(host.focused(), Some(close));
        let body = host.body();
        assert_eq!(host.style(body, "overflow").as_deref(), Some("hidden"));
    }

    #[test]
    fn close_detaches_media_and_restores_scroll_and_focus() {
        let (mut host, mut modal, trigger) = fixture();
        host.focus(trigger);
        modal.open(&mut host, "https://example.com/v");

        modal.close(&mut host);

        assert!(!modal.is_open());
        assert!(media_nodes(&host).is_empty());
        let body = host.body();
        assert_eq!(host.style(body, "overflow"), None);
        assert_eq!(host.focused(), Some(trigger));
        let overlay = host.query_selector(".video-modal").unwrap();
        assert_eq!(host.style(overlay, "display").as_deref(), Some("none"));
    }

    #[test]
    fn escape_closes_only_while_open() {
        let (mut host, mut modal, _) = fixture();
        let escape = Event::key(KeyCode::Escape);

        // No session: nothing to do, nothing breaks.
        modal.handle_event(&mut host, &escape);
        assert!(!modal.is_open());

        modal.open(&mut host, "https://example.com/v");
        modal.handle_event(&mut host, &escape);
        assert!(!modal.is_open());
        assert!(media_nodes(&host).is_empty());
    }

    #[test]
    fn backdrop_press_closes_but_content_press_does_not() {
        let (mut host, mut modal, _) = fixture();
        modal.open(&mut host, "https://example.com/v");
        let backdrop = host.query_selector(".video-modal").unwrap();
        let content = host.query_selector(".video-modal__content").unwrap();

        let press_content = Event::press_on(content);
        modal.handle_event(&mut host, &press_content);
        assert!(modal.is_open());

        let press_backdrop = Event::press_on(backdrop);
        modal.handle_event(&mut host, &press_backdrop);
        assert!(!modal.is_open());
    }

    #[test]
    fn repeated_cycles_never_accumulate_media() {
        let (mut host, mut modal, _) = fixture();
        for i in 0..3 {
            modal.open(&mut host, &format!("https://example.com/v{i}"));
            assert_eq!(media_nodes(&host).len(), 1);
            modal.close(&mut host);
            assert!(media_nodes(&host).is_empty());
        }
        // Still exactly one overlay in the page.
        assert_eq!(host.query_selector_all(".video-modal").len(), 1);
    }

    #[test]
    fn opening_over_a_live_session_replaces_it() {
        let (mut host, mut modal, _) = fixture();
        modal.open(&mut host, "https://example.com/a");
        modal.open(&mut host, "https://example.com/b");

        let media = media_nodes(&host);
        assert_eq!(media.len(), 1);
        assert_eq!(
            host.attr(media[0], "src").as_deref(),
            Some("https://example.com/b")
        );
        // The lock is still held exactly once.
        modal.close(&mut host);
        let body = host.body();
        assert_eq!(host.style(body, "overflow"), None);
    }
}
