//! The `HostSurface` trait: everything the engine may ask of its host.

use pagewire_core::geometry::{IntersectionConfig, Rect, Size};
use pagewire_core::id::{NodeId, ObservationId};
use pagewire_core::timer::TimerHost;

/// How a programmatic scroll should move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Jump immediately.
    Auto,
    /// Animate; the host owns the physics.
    Smooth,
}

/// Platform abstraction the controllers are written against.
///
/// Element addressing is by opaque [`NodeId`]. Lookup methods return `None`
/// (or an empty vec) for anything absent — controllers treat that as "not
/// applicable on this page", never as an error. Mutations on a stale id are
/// a no-op.
///
/// `bounding_rect` is viewport-relative: an element at the top of the
/// visible area reports `y == 0.0` regardless of scroll position.
pub trait HostSurface: TimerHost {
    // ── Lookup ──────────────────────────────────────────────────────

    /// First element matching a simple selector, in document order.
    fn query_selector(&self, selector: &str) -> Option<NodeId>;

    /// All elements matching a simple selector, in document order.
    fn query_selector_all(&self, selector: &str) -> Vec<NodeId>;

    // ── Attributes, classes, text, style ────────────────────────────

    fn attr(&self, node: NodeId, name: &str) -> Option<String>;
    fn set_attr(&mut self, node: NodeId, name: &str, value: &str);
    fn remove_attr(&mut self, node: NodeId, name: &str);

    fn has_class(&self, node: NodeId, class: &str) -> bool;
    fn add_class(&mut self, node: NodeId, class: &str);
    fn remove_class(&mut self, node: NodeId, class: &str);

    /// Concatenated text content of the element.
    fn text(&self, node: NodeId) -> String;
    fn set_text(&mut self, node: NodeId, text: &str);

    fn style(&self, node: NodeId, property: &str) -> Option<String>;
    fn set_style(&mut self, node: NodeId, property: &str, value: &str);
    fn remove_style(&mut self, node: NodeId, property: &str);

    // ── Structure ───────────────────────────────────────────────────

    /// The page body element (always present).
    fn body(&self) -> NodeId;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Whether `node` is `ancestor` or a descendant of it.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;

    /// Create a detached element; attach it with [`append_child`].
    ///
    /// [`append_child`]: HostSurface::append_child
    fn create_element(&mut self, tag: &str) -> NodeId;

    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Detach and destroy an element and its subtree.
    fn remove_node(&mut self, node: NodeId);

    // ── Geometry and scrolling ──────────────────────────────────────

    /// Viewport-relative bounding rect. Zero rect for a stale id.
    fn bounding_rect(&self, node: NodeId) -> Rect;

    fn viewport(&self) -> Size;

    /// Current vertical scroll offset of the page.
    fn scroll_y(&self) -> f64;

    fn scroll_to(&mut self, y: f64, behavior: ScrollBehavior);

    /// Update the URL fragment without a page reload.
    fn set_fragment(&mut self, fragment: &str);

    // ── Focus ───────────────────────────────────────────────────────

    fn focus(&mut self, node: NodeId);
    fn focused(&self) -> Option<NodeId>;

    // ── Visibility observation ──────────────────────────────────────

    /// Whether this host can deliver visibility notifications at all.
    /// When `false`, controllers fall back to firing effects eagerly.
    fn supports_intersection(&self) -> bool;

    /// Register interest in `node` crossing into the configured region.
    /// The host delivers [`Event::Visibility`] on each enter edge until
    /// [`unobserve`] is called.
    ///
    /// [`Event::Visibility`]: pagewire_core::Event::Visibility
    /// [`unobserve`]: HostSurface::unobserve
    fn observe(&mut self, node: NodeId, config: IntersectionConfig) -> ObservationId;

    fn unobserve(&mut self, observation: ObservationId);

    // ── Preferences ─────────────────────────────────────────────────

    /// The user's reduced-motion preference, as reported by the platform.
    fn prefers_reduced_motion(&self) -> bool;
}
