//! Anchor scrolling under a fixed header.
//!
//! The page header is fixed, so a naive scroll puts the target's top edge
//! underneath it. These helpers read the header's rendered height at call
//! time (it changes with breakpoints) and aim below it.

use pagewire_core::id::NodeId;
use pagewire_host::{HostSurface, ScrollBehavior};

/// Where anchor scrolls aim, shared by navigation links and the engine's
/// `scroll_to_section`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollConfig {
    /// Selector for the fixed page header.
    pub header_selector: String,
    /// Extra gap below the header, in pixels.
    pub extra_offset: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            header_selector: ".site-header".to_string(),
            extra_offset: 16.0,
        }
    }
}

/// Current rendered height of the fixed header, or `0.0` without one.
#[must_use]
pub fn header_height(host: &dyn HostSurface, config: &ScrollConfig) -> f64 {
    host.query_selector(&config.header_selector)
        .map(|header| host.bounding_rect(header).height)
        .unwrap_or(0.0)
}

/// Scroll so `target`'s top sits `offset` pixels below the viewport top.
///
/// Defers to host smooth scrolling; drops to an instant jump when the user
/// prefers reduced motion.
pub fn smooth_scroll_to(host: &mut dyn HostSurface, target: NodeId, offset: f64) {
    let rect = host.bounding_rect(target);
    let y = (host.scroll_y() + rect.y - offset).max(0.0);
    let behavior = if host.prefers_reduced_motion() {
        ScrollBehavior::Auto
    } else {
        ScrollBehavior::Smooth
    };
    host.scroll_to(y, behavior);
}

/// Scroll `target` under the fixed header with the configured gap.
pub fn scroll_to_anchor(host: &mut dyn HostSurface, target: NodeId, config: &ScrollConfig) {
    let offset = header_height(host, config) + config.extra_offset;
    smooth_scroll_to(host, target, offset);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagewire_core::geometry::Rect;
    use pagewire_host::MemoryHost;

    fn fixture() -> (MemoryHost, NodeId) {
        let mut host = MemoryHost::new();
        host.insert("header")
            .class("site-header")
            .layout(Rect::new(0.0, 0.0, 1280.0, 64.0));
        let section = host
            .insert("section")
            .id("pricing")
            .layout(Rect::new(0.0, 2000.0, 1280.0, 700.0))
            .node();
        (host, section)
    }

    #[test]
    fn header_height_reads_rendered_height() {
        let (host, _) = fixture();
        assert_eq!(header_height(&host, &ScrollConfig::default()), 64.0);
    }

    #[test]
    fn header_height_is_zero_without_header() {
        let host = MemoryHost::new();
        assert_eq!(header_height(&host, &ScrollConfig::default()), 0.0);
    }

    #[test]
    fn anchor_scroll_aims_below_the_header() {
        let (mut host, section) = fixture();
        scroll_to_anchor(&mut host, section, &ScrollConfig::default());
        let (y, behavior) = host.last_scroll().unwrap();
        assert_eq!(y, 2000.0 - 64.0 - 16.0);
        assert_eq!(behavior, ScrollBehavior::Smooth);
    }

    #[test]
    fn scroll_target_never_goes_negative() {
        let (mut host, _) = fixture();
        let top = host
            .insert("section")
            .id("top")
            .layout(Rect::new(0.0, 10.0, 1280.0, 500.0))
            .node();
        scroll_to_anchor(&mut host, top, &ScrollConfig::default());
        assert_eq!(host.last_scroll().unwrap().0, 0.0);
    }

    #[test]
    fn reduced_motion_scrolls_instantly() {
        let (mut host, section) = fixture();
        host.set_reduced_motion(true);
        scroll_to_anchor(&mut host, section, &ScrollConfig::default());
        assert_eq!(host.last_scroll().unwrap().1, ScrollBehavior::Auto);
    }
}
