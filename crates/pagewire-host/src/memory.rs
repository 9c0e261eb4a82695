//! Deterministic in-memory host surface.
//!
//! `MemoryHost` keeps an element arena, an ordered timer queue, and a list of
//! visibility observations. It never runs anything by itself: tests (or a
//! reference embedding) build a page with [`MemoryHost::insert`], then drive
//! the engine by feeding the events returned from [`MemoryHost::advance`] and
//! [`MemoryHost::pump_visibility`] back into dispatch.
//!
//! # Determinism
//!
//! - Queries return elements in document order (creation order of attached
//!   elements).
//! - `advance` fires due timers ordered by deadline, ties broken by timer id.
//! - `pump_visibility` reports enter edges only: an observation must drop
//!   below its threshold before it can report entering again.

use ahash::AHashMap;

use pagewire_core::Event;
use pagewire_core::geometry::{IntersectionConfig, Rect, Size, intersection_ratio};
use pagewire_core::id::{NodeId, ObservationId, TimerId};
use pagewire_core::timer::TimerHost;

use crate::selector;
use crate::surface::{HostSurface, ScrollBehavior};

#[derive(Debug)]
struct NodeData {
    tag: String,
    classes: Vec<String>,
    attrs: AHashMap<String, String>,
    text: String,
    styles: AHashMap<String, String>,
    /// Absolute page-coordinate layout, supplied by the fixture.
    layout: Rect,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            classes: Vec::new(),
            attrs: AHashMap::new(),
            text: String::new(),
            styles: AHashMap::new(),
            layout: Rect::default(),
            parent: None,
            children: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct TimerEntry {
    id: TimerId,
    fire_at: u64,
    period: Option<u64>,
}

#[derive(Debug)]
struct Observation {
    id: ObservationId,
    node: NodeId,
    config: IntersectionConfig,
    inside: bool,
}

/// In-memory [`HostSurface`] implementation.
pub struct MemoryHost {
    nodes: AHashMap<NodeId, NodeData>,
    order: Vec<NodeId>,
    body: NodeId,
    next_id: u64,
    viewport: Size,
    scroll_y: f64,
    last_scroll: Option<(f64, ScrollBehavior)>,
    fragment: Option<String>,
    focused: Option<NodeId>,
    now: u64,
    timers: Vec<TimerEntry>,
    observations: Vec<Observation>,
    intersection_supported: bool,
    reduced_motion: bool,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// An empty page: a body element and a 1280×800 viewport.
    #[must_use]
    pub fn new() -> Self {
        let body = NodeId::new(1);
        let mut nodes = AHashMap::new();
        nodes.insert(body, NodeData::new("body"));
        Self {
            nodes,
            order: vec![body],
            body,
            next_id: 2,
            viewport: Size::new(1280.0, 800.0),
            scroll_y: 0.0,
            last_scroll: None,
            fragment: None,
            focused: None,
            now: 0,
            timers: Vec::new(),
            observations: Vec::new(),
            intersection_supported: true,
            reduced_motion: false,
        }
    }

    // ── Fixture building ────────────────────────────────────────────

    /// Append a new element to the body.
    pub fn insert(&mut self, tag: &str) -> ElementBuilder<'_> {
        let parent = self.body;
        self.insert_into(parent, tag)
    }

    /// Append a new element to `parent`.
    pub fn insert_into(&mut self, parent: NodeId, tag: &str) -> ElementBuilder<'_> {
        let node = self.alloc(tag);
        self.attach(parent, node);
        ElementBuilder { host: self, node }
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Size::new(width, height);
    }

    pub fn set_intersection_supported(&mut self, supported: bool) {
        self.intersection_supported = supported;
    }

    pub fn set_reduced_motion(&mut self, preferred: bool) {
        self.reduced_motion = preferred;
    }

    // ── Driving ─────────────────────────────────────────────────────

    /// Move the clock forward by `ms`, returning timer events in firing
    /// order. Repeating timers fire as many times as their period fits.
    pub fn advance(&mut self, ms: u64) -> Vec<Event> {
        let deadline = self.now.saturating_add(ms);
        let mut fired = Vec::new();
        loop {
            let due = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, t)| t.fire_at <= deadline)
                .min_by_key(|(_, t)| (t.fire_at, t.id.get()))
                .map(|(i, _)| i);
            let Some(idx) = due else { break };
            let entry = &mut self.timers[idx];
            let id = entry.id;
            self.now = entry.fire_at.max(self.now);
            match entry.period {
                Some(period) => entry.fire_at += period,
                None => {
                    self.timers.remove(idx);
                }
            }
            fired.push(Event::Timer { id });
        }
        self.now = deadline;
        fired
    }

    /// Recompute every observation against the current scroll position,
    /// returning one event per enter edge.
    pub fn pump_visibility(&mut self) -> Vec<Event> {
        let viewport = Rect::of_viewport(self.viewport);
        let scroll = self.scroll_y;
        let nodes = &self.nodes;
        let mut events = Vec::new();
        for obs in &mut self.observations {
            let Some(data) = nodes.get(&obs.node) else {
                continue;
            };
            let rel = Rect::new(
                data.layout.x,
                data.layout.y - scroll,
                data.layout.width,
                data.layout.height,
            );
            let ratio = intersection_ratio(rel, viewport, obs.config.margin);
            let entered = ratio > 0.0 && ratio >= obs.config.threshold;
            if entered && !obs.inside {
                obs.inside = true;
                events.push(Event::Visibility {
                    observation: obs.id,
                    target: obs.node,
                    ratio,
                });
            } else if !entered {
                obs.inside = false;
            }
        }
        events
    }

    // ── Assertion helpers ───────────────────────────────────────────

    #[must_use]
    pub fn exists(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    #[must_use]
    pub fn last_scroll(&self) -> Option<(f64, ScrollBehavior)> {
        self.last_scroll
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub fn active_observations(&self) -> usize {
        self.observations.len()
    }

    // ── Internals ───────────────────────────────────────────────────

    fn alloc(&mut self, tag: &str) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, NodeData::new(tag));
        self.order.push(id);
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        if !self.nodes.contains_key(&parent) || !self.nodes.contains_key(&child) {
            return;
        }
        if let Some(data) = self.nodes.get_mut(&child) {
            data.parent = Some(parent);
        }
        if let Some(data) = self.nodes.get_mut(&parent) {
            data.children.push(child);
        }
    }

    fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.body {
                return true;
            }
            match self.nodes.get(&current).and_then(|d| d.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn next_raw_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn destroy_subtree(&mut self, node: NodeId) {
        let children = self
            .nodes
            .get(&node)
            .map(|d| d.children.clone())
            .unwrap_or_default();
        for child in children {
            self.destroy_subtree(child);
        }
        self.nodes.remove(&node);
        self.order.retain(|&n| n != node);
        if self.focused == Some(node) {
            self.focused = None;
        }
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(data) = self.nodes.get(&node) else {
            return;
        };
        out.push_str(&data.text);
        for &child in &data.children {
            self.collect_text(child, out);
        }
    }
}

impl TimerHost for MemoryHost {
    fn set_timeout(&mut self, delay_ms: u64) -> TimerId {
        let id = TimerId::new(self.next_raw_id());
        self.timers.push(TimerEntry {
            id,
            fire_at: self.now + delay_ms,
            period: None,
        });
        id
    }

    fn set_interval(&mut self, period_ms: u64) -> TimerId {
        let period = period_ms.max(1);
        let id = TimerId::new(self.next_raw_id());
        self.timers.push(TimerEntry {
            id,
            fire_at: self.now + period,
            period: Some(period),
        });
        id
    }

    fn clear_timer(&mut self, id: TimerId) {
        self.timers.retain(|t| t.id != id);
    }

    fn now_ms(&self) -> u64 {
        self.now
    }
}

impl HostSurface for MemoryHost {
    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        let sels = selector::parse_list(selector);
        self.order.iter().copied().find(|&node| {
            self.is_attached(node)
                && self.nodes.get(&node).is_some_and(|d| {
                    sels.iter().any(|s| s.matches(&d.tag, &d.classes, &d.attrs))
                })
        })
    }

    fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        let sels = selector::parse_list(selector);
        self.order
            .iter()
            .copied()
            .filter(|&node| {
                self.is_attached(node)
                    && self.nodes.get(&node).is_some_and(|d| {
                        sels.iter().any(|s| s.matches(&d.tag, &d.classes, &d.attrs))
                    })
            })
            .collect()
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes.get(&node)?.attrs.get(name).cloned()
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(data) = self.nodes.get_mut(&node) {
            data.attrs.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(data) = self.nodes.get_mut(&node) {
            data.attrs.remove(name);
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes
            .get(&node)
            .is_some_and(|d| d.classes.iter().any(|c| c == class))
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(data) = self.nodes.get_mut(&node)
            && !data.classes.iter().any(|c| c == class)
        {
            data.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(data) = self.nodes.get_mut(&node) {
            data.classes.retain(|c| c != class);
        }
    }

    fn text(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        let children = self
            .nodes
            .get(&node)
            .map(|d| d.children.clone())
            .unwrap_or_default();
        for child in children {
            self.destroy_subtree(child);
        }
        if let Some(data) = self.nodes.get_mut(&node) {
            data.children.clear();
            data.text = text.to_string();
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes.get(&node)?.styles.get(property).cloned()
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(data) = self.nodes.get_mut(&node) {
            data.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn remove_style(&mut self, node: NodeId, property: &str) {
        if let Some(data) = self.nodes.get_mut(&node) {
            data.styles.remove(property);
        }
    }

    fn body(&self) -> NodeId {
        self.body
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node)?.parent
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.nodes.get(&n).and_then(|d| d.parent);
        }
        false
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(tag)
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.attach(parent, child);
    }

    fn remove_node(&mut self, node: NodeId) {
        if node == self.body {
            return;
        }
        if let Some(parent) = self.nodes.get(&node).and_then(|d| d.parent)
            && let Some(pdata) = self.nodes.get_mut(&parent)
        {
            pdata.children.retain(|&c| c != node);
        }
        self.destroy_subtree(node);
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        match self.nodes.get(&node) {
            Some(data) => Rect::new(
                data.layout.x,
                data.layout.y - self.scroll_y,
                data.layout.width,
                data.layout.height,
            ),
            None => Rect::default(),
        }
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn scroll_to(&mut self, y: f64, behavior: ScrollBehavior) {
        let y = y.max(0.0);
        self.scroll_y = y;
        self.last_scroll = Some((y, behavior));
    }

    fn set_fragment(&mut self, fragment: &str) {
        self.fragment = Some(fragment.to_string());
    }

    fn focus(&mut self, node: NodeId) {
        if self.nodes.contains_key(&node) && self.is_attached(node) {
            self.focused = Some(node);
        }
    }

    fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    fn supports_intersection(&self) -> bool {
        self.intersection_supported
    }

    fn observe(&mut self, node: NodeId, config: IntersectionConfig) -> ObservationId {
        let id = ObservationId::new(self.next_raw_id());
        self.observations.push(Observation {
            id,
            node,
            config,
            inside: false,
        });
        id
    }

    fn unobserve(&mut self, observation: ObservationId) {
        self.observations.retain(|o| o.id != observation);
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}

/// Fluent fixture builder returned by [`MemoryHost::insert`].
pub struct ElementBuilder<'h> {
    host: &'h mut MemoryHost,
    node: NodeId,
}

impl ElementBuilder<'_> {
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn class(self, class: &str) -> Self {
        self.host.add_class(self.node, class);
        self
    }

    pub fn attr(self, name: &str, value: &str) -> Self {
        self.host.set_attr(self.node, name, value);
        self
    }

    pub fn text(self, text: &str) -> Self {
        if let Some(data) = self.host.nodes.get_mut(&self.node) {
            data.text = text.to_string();
        }
        self
    }

    /// Absolute page-coordinate layout rect for this element.
    pub fn layout(self, rect: Rect) -> Self {
        if let Some(data) = self.host.nodes.get_mut(&self.node) {
            data.layout = rect;
        }
        self
    }

    /// Finish building and return the element id.
    #[must_use]
    pub fn node(self) -> NodeId {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagewire_core::geometry::Margin;
    use pretty_assertions::assert_eq;

    fn host_with_sections() -> (MemoryHost, NodeId, NodeId) {
        let mut host = MemoryHost::new();
        let a = host
            .insert("section")
            .id("about")
            .layout(Rect::new(0.0, 900.0, 1280.0, 600.0))
            .node();
        let b = host
            .insert("section")
            .id("contact")
            .class("highlight")
            .layout(Rect::new(0.0, 1500.0, 1280.0, 600.0))
            .node();
        (host, a, b)
    }

    // ── Queries and structure ───────────────────────────────────────

    #[test]
    fn queries_respect_document_order() {
        let (host, a, b) = host_with_sections();
        assert_eq!(host.query_selector("section"), Some(a));
        assert_eq!(host.query_selector_all("section"), vec![a, b]);
        assert_eq!(host.query_selector("#contact"), Some(b));
        assert_eq!(host.query_selector(".highlight"), Some(b));
        assert_eq!(host.query_selector("#missing"), None);
    }

    #[test]
    fn detached_elements_are_not_found() {
        let mut host = MemoryHost::new();
        let floating = host.create_element("div");
        host.set_attr(floating, "id", "x");
        assert_eq!(host.query_selector("#x"), None);

        let body = host.body();
        host.append_child(body, floating);
        assert_eq!(host.query_selector("#x"), Some(floating));
    }

    #[test]
    fn contains_walks_ancestry() {
        let mut host = MemoryHost::new();
        let outer = host.insert("div").node();
        let inner = host.insert_into(outer, "span").node();
        assert!(host.contains(outer, inner));
        assert!(host.contains(outer, outer));
        assert!(!host.contains(inner, outer));
        assert!(host.contains(host.body(), inner));
    }

    #[test]
    fn remove_node_destroys_subtree_and_drops_focus() {
        let mut host = MemoryHost::new();
        let outer = host.insert("div").node();
        let inner = host.insert_into(outer, "button").node();
        host.focus(inner);
        assert_eq!(host.focused(), Some(inner));

        host.remove_node(outer);
        assert!(!host.exists(outer));
        assert!(!host.exists(inner));
        assert_eq!(host.focused(), None);
    }

    #[test]
    fn text_concatenates_descendants_and_set_text_replaces_them() {
        let mut host = MemoryHost::new();
        let button = host.insert("button").node();
        let icon = host.insert_into(button, "span").text("▶ ").node();
        host.insert_into(button, "span").text("Play");
        assert_eq!(host.text(button), "▶ Play");

        host.set_text(button, "Stop");
        assert_eq!(host.text(button), "Stop");
        assert!(!host.exists(icon));
    }

    // ── Timers ──────────────────────────────────────────────────────

    #[test]
    fn one_shot_timers_fire_in_deadline_order() {
        let mut host = MemoryHost::new();
        let late = host.set_timeout(200);
        let early = host.set_timeout(50);
        let events = host.advance(250);
        assert_eq!(
            events,
            vec![Event::Timer { id: early }, Event::Timer { id: late }]
        );
        assert_eq!(host.pending_timers(), 0);
        assert_eq!(host.now_ms(), 250);
    }

    #[test]
    fn interval_fires_repeatedly_within_one_advance() {
        let mut host = MemoryHost::new();
        let tick = host.set_interval(30);
        let events = host.advance(100);
        assert_eq!(events.len(), 3); // 30, 60, 90
        assert!(events.iter().all(|e| *e == Event::Timer { id: tick }));
        assert_eq!(host.pending_timers(), 1);
    }

    #[test]
    fn cleared_timers_never_fire() {
        let mut host = MemoryHost::new();
        let id = host.set_timeout(10);
        host.clear_timer(id);
        assert!(host.advance(50).is_empty());
    }

    // ── Visibility ──────────────────────────────────────────────────

    #[test]
    fn observation_reports_enter_edges_only() {
        let mut host = MemoryHost::new();
        host.set_viewport(1280.0, 800.0);
        let target = host
            .insert("img")
            .layout(Rect::new(0.0, 1200.0, 100.0, 100.0))
            .node();
        let obs = host.observe(
            target,
            IntersectionConfig::new(Margin::default(), 0.5),
        );

        // Below the fold: nothing.
        assert!(host.pump_visibility().is_empty());

        // Scrolled into view: one enter event.
        host.scroll_to(1000.0, ScrollBehavior::Auto);
        let events = host.pump_visibility();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            Event::Visibility { observation, target: t, .. }
                if observation == obs && t == target
        ));

        // Still visible: no repeat while inside.
        assert!(host.pump_visibility().is_empty());

        // Out and back in: a second enter edge.
        host.scroll_to(0.0, ScrollBehavior::Auto);
        assert!(host.pump_visibility().is_empty());
        host.scroll_to(1000.0, ScrollBehavior::Auto);
        assert_eq!(host.pump_visibility().len(), 1);
    }

    #[test]
    fn unobserve_stops_notifications() {
        let mut host = MemoryHost::new();
        let target = host
            .insert("img")
            .layout(Rect::new(0.0, 100.0, 100.0, 100.0))
            .node();
        let obs = host.observe(
            target,
            IntersectionConfig::new(Margin::default(), 0.1),
        );
        host.unobserve(obs);
        assert!(host.pump_visibility().is_empty());
        assert_eq!(host.active_observations(), 0);
    }
}
