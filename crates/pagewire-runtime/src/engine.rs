//! The engine: controller registry, event routing, public operations.

use std::cell::RefCell;
use std::rc::Rc;

use pagewire_controllers::{
    A11yController, Controller, FormController, FormTransport, ModalController, NavController,
    VisibilityController, scroll,
};
use pagewire_core::Event;
use pagewire_core::scroll_lock::ScrollLock;
use pagewire_host::HostSurface;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::report::InitReport;

/// Owns the host surface and one fixed slot per interaction controller.
///
/// The registry is deliberately closed: this is a fixed set of named
/// interaction patterns, not an extensible component model. A slot is `None`
/// when its controller refused to bind; the reason lives in the
/// [`InitReport`].
pub struct Engine<H: HostSurface> {
    host: H,
    config: EngineConfig,
    nav: Option<NavController>,
    visibility: Option<VisibilityController>,
    modal: Option<ModalController>,
    form: Option<FormController>,
    a11y: Option<A11yController>,
    report: InitReport,
}

impl<H: HostSurface> Engine<H> {
    /// Construct every controller exactly once against the ready document.
    ///
    /// Best-effort by design: each bind outcome is recorded and a refusal
    /// never prevents the remaining controllers from starting.
    pub fn init(mut host: H, config: EngineConfig, transport: Box<dyn FormTransport>) -> Self {
        let lock = Rc::new(RefCell::new(ScrollLock::new()));
        let mut report = InitReport::default();

        let nav = report.record(
            "nav",
            NavController::bind(
                &mut host,
                config.nav.clone(),
                config.scroll.clone(),
                Rc::clone(&lock),
            ),
        );
        let visibility = report.record(
            "visibility",
            VisibilityController::bind(&mut host, config.observe.clone()),
        );
        let modal = report.record(
            "modal",
            ModalController::bind(&mut host, config.modal.clone(), Rc::clone(&lock)),
        );
        let form = report.record(
            "form",
            FormController::bind(&mut host, config.form.clone(), transport),
        );
        let a11y = report.record("a11y", Ok(A11yController::bind(&mut host, config.a11y.clone())));

        tracing::debug!(
            ready = report.ready_count(),
            disabled = report.disabled_count(),
            "engine initialized"
        );

        Self {
            host,
            config,
            nav,
            visibility,
            modal,
            form,
            a11y,
            report,
        }
    }

    /// Offer one host event to every live controller, in registry order.
    pub fn dispatch(&mut self, event: Event) {
        let Self {
            host,
            nav,
            visibility,
            modal,
            form,
            a11y,
            ..
        } = self;
        let controllers: [Option<&mut dyn Controller>; 5] = [
            nav.as_mut().map(|c| c as &mut dyn Controller),
            visibility.as_mut().map(|c| c as &mut dyn Controller),
            modal.as_mut().map(|c| c as &mut dyn Controller),
            form.as_mut().map(|c| c as &mut dyn Controller),
            a11y.as_mut().map(|c| c as &mut dyn Controller),
        ];
        for controller in controllers.into_iter().flatten() {
            controller.handle_event(&mut *host, &event);
        }
    }

    /// Smooth-scroll the page so the named section sits under the header.
    pub fn scroll_to_section(&mut self, id: &str) -> Result<(), EngineError> {
        let section = self
            .host
            .query_selector(&format!("#{id}"))
            .ok_or_else(|| EngineError::UnknownSection { id: id.to_string() })?;
        scroll::scroll_to_anchor(&mut self.host, section, &self.config.scroll);
        self.host.set_fragment(id);
        Ok(())
    }

    /// Open the video overlay on `url` via the registry's modal controller.
    pub fn open_video_modal(&mut self, url: &str) -> Result<(), EngineError> {
        let modal = self
            .modal
            .as_mut()
            .ok_or(EngineError::ControllerDisabled { name: "modal" })?;
        modal.open(&mut self.host, url);
        Ok(())
    }

    /// Construction outcomes, one entry per registry slot.
    #[must_use]
    pub fn report(&self) -> &InitReport {
        &self.report
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access, used by embeddings to pump timers and
    /// visibility between dispatches.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
