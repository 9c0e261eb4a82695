//! Degradation behavior: pages missing markup, hosts missing capabilities.
//!
//! The engine must stay usable no matter what the page lacks; every refusal
//! is recorded with a reason instead of thrown.

use std::cell::Cell;
use std::rc::Rc;

use pagewire_controllers::{Disabled, FormField, FormTransport};
use pagewire_core::geometry::Rect;
use pagewire_core::{Event, KeyCode, NodeId, SubmissionId};
use pagewire_host::{HostSurface, MemoryHost};
use pagewire_runtime::{Engine, EngineConfig, EngineError, InitOutcome};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct CountingTransport {
    begun: Rc<Cell<u64>>,
}

impl FormTransport for CountingTransport {
    fn begin(&mut self, _form: NodeId, _fields: &[FormField]) -> SubmissionId {
        self.begun.set(self.begun.get() + 1);
        SubmissionId::new(self.begun.get())
    }
}

fn empty_engine() -> Engine<MemoryHost> {
    Engine::init(
        MemoryHost::new(),
        EngineConfig::default(),
        Box::new(CountingTransport::default()),
    )
}

#[test]
fn empty_page_reports_each_refusal_with_its_reason() {
    let engine = empty_engine();
    let report = engine.report();

    assert!(matches!(
        report.disabled_reason("nav"),
        Some(Disabled::MissingElement { role, .. }) if *role == "navigation toggle"
    ));
    assert!(matches!(
        report.disabled_reason("visibility"),
        Some(Disabled::NoTargets { .. })
    ));
    assert!(matches!(
        report.disabled_reason("form"),
        Some(Disabled::NoTargets { .. })
    ));

    // The modal needs no markup until opened; a11y is cross-cutting.
    assert!(report.is_ready("modal"));
    assert!(report.is_ready("a11y"));
    assert_eq!(report.ready_count(), 2);
    assert_eq!(report.disabled_count(), 3);
}

#[test]
fn report_iterates_in_registry_order() {
    let engine = empty_engine();
    let names: Vec<&str> = engine.report().iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["nav", "visibility", "modal", "form", "a11y"]);
    assert!(
        engine
            .report()
            .iter()
            .all(|e| matches!(e.outcome, InitOutcome::Ready | InitOutcome::Disabled(_)))
    );
}

#[test]
fn an_empty_page_still_dispatches_without_panicking() {
    let mut engine = empty_engine();
    let body = engine.host().body();

    engine.dispatch(Event::key(KeyCode::Escape));
    engine.dispatch(Event::key(KeyCode::Tab));
    engine.dispatch(Event::press_on(body));
    engine.dispatch(Event::Resize {
        width: 1920.0,
        height: 1080.0,
    });
    engine.dispatch(Event::Scroll { y: 10.0 });
    engine.dispatch(Event::Activate { target: body });
    for event in engine.host_mut().advance(1000) {
        engine.dispatch(event);
    }
}

#[test]
fn the_modal_still_opens_programmatically_on_a_bare_page() {
    let mut engine = empty_engine();
    engine.open_video_modal("https://example.com/v").unwrap();

    let host = engine.host();
    assert!(host.query_selector(".video-modal").is_some());
    assert_eq!(host.query_selector_all("iframe").len(), 1);

    engine.dispatch(Event::key(KeyCode::Escape));
    assert!(engine.host().query_selector_all("iframe").is_empty());
}

#[test]
fn scroll_to_section_reports_unknown_sections() {
    let mut engine = empty_engine();
    assert_eq!(
        engine.scroll_to_section("pricing"),
        Err(EngineError::UnknownSection {
            id: "pricing".to_string()
        })
    );
}

#[test]
fn host_without_observer_support_loads_everything_eagerly() {
    let mut host = MemoryHost::new();
    host.set_intersection_supported(false);
    let img = host
        .insert("img")
        .attr("data-src", "/assets/chart.webp")
        .layout(Rect::new(0.0, 3000.0, 600.0, 400.0))
        .node();
    let stat = host
        .insert("span")
        .attr("data-counter", "")
        .text("10,000+")
        .layout(Rect::new(0.0, 4000.0, 200.0, 50.0))
        .node();

    let engine = Engine::init(
        host,
        EngineConfig::default(),
        Box::new(CountingTransport::default()),
    );

    // Far below the fold, yet applied at init: degraded but correct.
    let host = engine.host();
    assert_eq!(
        host.attr(img, "src").as_deref(),
        Some("/assets/chart.webp")
    );
    assert_eq!(host.text(stat), "10.0K+");
    assert!(host.has_class(stat, "counted"));
    assert_eq!(host.active_observations(), 0);
    assert!(engine.report().is_ready("visibility"));
}

#[test]
fn nav_disabled_leaves_other_controllers_working() {
    // A page with a form but no navigation markup.
    let mut host = MemoryHost::new();
    let form = host.insert("form").node();
    host.insert_into(form, "input")
        .attr("name", "email")
        .attr("value", "ada@example.com")
        .node();

    let transport = CountingTransport::default();
    let begun = Rc::clone(&transport.begun);
    let mut engine = Engine::init(host, EngineConfig::default(), Box::new(transport));

    assert!(!engine.report().is_ready("nav"));
    assert!(engine.report().is_ready("form"));

    engine.dispatch(Event::Submit { form });
    assert_eq!(begun.get(), 1);
}

#[test]
fn events_for_vanished_elements_are_ignored() {
    let mut engine = empty_engine();
    let ghost = NodeId::new(9999);
    engine.dispatch(Event::Activate { target: ghost });
    engine.dispatch(Event::press_on(ghost));
    engine.dispatch(Event::Submit { form: ghost });

    // Host state is untouched.
    assert_eq!(engine.host().last_scroll(), None);
    assert_eq!(engine.host().fragment(), None);
}
