//! Form validation and submission feedback.
//!
//! Submission is intercepted per form. Required fields must have non-empty
//! trimmed values; each failing field gets an error marker plus an inline
//! message, and any failure aborts before the transport is touched. A valid
//! submit disables the control with a transient label and hands the payload
//! to the [`FormTransport`] collaborator; the outcome arrives later as a
//! [`Event::SubmissionSettled`] and surfaces as a dismissible banner that
//! auto-removes after a few seconds. Success additionally clears the form.
//!
//! The transport is opaque: this controller neither knows nor cares whether
//! it is a network call, a queue, or a test stub.
//!
//! [`Event::SubmissionSettled`]: pagewire_core::Event::SubmissionSettled

use ahash::AHashMap;

use pagewire_core::event::{Event, SubmitOutcome};
use pagewire_core::id::{NodeId, SubmissionId, TimerId};
use pagewire_host::HostSurface;

use crate::{Controller, Disabled};

/// The opaque submission collaborator.
///
/// `begin` must return immediately with a ticket; the embedding later
/// reports the outcome by dispatching [`Event::SubmissionSettled`] with the
/// same id.
///
/// [`Event::SubmissionSettled`]: pagewire_core::Event::SubmissionSettled
pub trait FormTransport {
    fn begin(&mut self, form: NodeId, fields: &[FormField]) -> SubmissionId;
}

/// One named field value captured at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

/// Selectors, class names, and copy for form feedback.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormConfig {
    pub form_selector: String,
    pub field_selector: String,
    pub submit_selector: String,
    pub error_class: String,
    pub error_message_class: String,
    pub banner_class: String,
    pub required_message: String,
    pub submitting_label: String,
    pub success_message: String,
    pub failure_message: String,
    pub banner_dismiss_ms: u64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            form_selector: "form".to_string(),
            field_selector: "input, textarea, select".to_string(),
            submit_selector: "[type=submit]".to_string(),
            error_class: "error".to_string(),
            error_message_class: "field-error".to_string(),
            banner_class: "form-banner".to_string(),
            required_message: "This field is required".to_string(),
            submitting_label: "Sending...".to_string(),
            success_message: "Thanks! We'll be in touch soon.".to_string(),
            failure_message: "Something went wrong. Please try again.".to_string(),
            banner_dismiss_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubmissionState {
    Idle,
    Submitting,
}

#[derive(Debug)]
struct FormInstance {
    form: NodeId,
    submit: Option<NodeId>,
    state: SubmissionState,
    pending: Option<SubmissionId>,
    saved_label: Option<String>,
    /// Failing field → its inline message node.
    errors: AHashMap<NodeId, NodeId>,
    banner: Option<(NodeId, TimerId)>,
}

/// Intercepts and validates every form on the page.
pub struct FormController {
    cfg: FormConfig,
    transport: Box<dyn FormTransport>,
    forms: Vec<FormInstance>,
}

impl std::fmt::Debug for FormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("cfg", &self.cfg)
            .field("forms", &self.forms)
            .finish_non_exhaustive()
    }
}

impl FormController {
    /// Bind every form present at init.
    pub fn bind(
        host: &mut dyn HostSurface,
        cfg: FormConfig,
        transport: Box<dyn FormTransport>,
    ) -> Result<Self, Disabled> {
        let form_nodes = host.query_selector_all(&cfg.form_selector);
        if form_nodes.is_empty() {
            return Err(Disabled::NoTargets {
                selector: cfg.form_selector,
            });
        }
        let forms = form_nodes
            .into_iter()
            .map(|form| {
                let submit = host
                    .query_selector_all(&cfg.submit_selector)
                    .into_iter()
                    .find(|&n| host.contains(form, n));
                FormInstance {
                    form,
                    submit,
                    state: SubmissionState::Idle,
                    pending: None,
                    saved_label: None,
                    errors: AHashMap::new(),
                    banner: None,
                }
            })
            .collect();
        Ok(Self {
            cfg,
            transport,
            forms,
        })
    }

    fn fields_of(&self, host: &dyn HostSurface, form: NodeId) -> Vec<NodeId> {
        host.query_selector_all(&self.cfg.field_selector)
            .into_iter()
            .filter(|&n| host.contains(form, n))
            .collect()
    }

    fn on_submit(&mut self, host: &mut dyn HostSurface, form: NodeId) {
        let Some(idx) = self.forms.iter().position(|f| f.form == form) else {
            return;
        };
        if self.forms[idx].state == SubmissionState::Submitting {
            return;
        }

        let fields = self.fields_of(host, form);
        let mut all_valid = true;
        for &field in &fields {
            let required = host.attr(field, "required").is_some();
            let value = host.attr(field, "value").unwrap_or_default();
            if required && value.trim().is_empty() {
                all_valid = false;
                self.mark_invalid(host, idx, field);
            } else {
                self.clear_invalid(host, idx, field);
            }
        }
        if !all_valid {
            tracing::debug!(form = %form, "submission blocked by validation");
            return;
        }

        let payload: Vec<FormField> = fields
            .iter()
            .filter_map(|&field| {
                let name = host.attr(field, "name")?;
                Some(FormField {
                    name,
                    value: host.attr(field, "value").unwrap_or_default(),
                })
            })
            .collect();

        let inst = &mut self.forms[idx];
        inst.state = SubmissionState::Submitting;
        if let Some(button) = inst.submit {
            inst.saved_label = Some(host.text(button));
            host.set_text(button, &self.cfg.submitting_label);
            host.set_attr(button, "disabled", "");
        }
        inst.pending = Some(self.transport.begin(form, &payload));
        tracing::debug!(form = %form, fields = payload.len(), "submission started");
    }

    fn mark_invalid(&mut self, host: &mut dyn HostSurface, idx: usize, field: NodeId) {
        host.add_class(field, &self.cfg.error_class);
        let inst = &mut self.forms[idx];
        if !inst.errors.contains_key(&field) {
            let message = host.create_element("span");
            host.add_class(message, &self.cfg.error_message_class);
            host.set_text(message, &self.cfg.required_message);
            let parent = host.parent(field).unwrap_or(inst.form);
            host.append_child(parent, message);
            inst.errors.insert(field, message);
        }
    }

    fn clear_invalid(&mut self, host: &mut dyn HostSurface, idx: usize, field: NodeId) {
        host.remove_class(field, &self.cfg.error_class);
        if let Some(message) = self.forms[idx].errors.remove(&field) {
            host.remove_node(message);
        }
    }

    fn on_settled(&mut self, host: &mut dyn HostSurface, id: SubmissionId, outcome: SubmitOutcome) {
        let Some(idx) = self.forms.iter().position(|f| f.pending == Some(id)) else {
            return;
        };
        let form = self.forms[idx].form;
        {
            let inst = &mut self.forms[idx];
            inst.state = SubmissionState::Idle;
            inst.pending = None;
            if let Some(button) = inst.submit {
                host.remove_attr(button, "disabled");
                if let Some(label) = inst.saved_label.take() {
                    host.set_text(button, &label);
                }
            }
        }

        match outcome {
            SubmitOutcome::Success => {
                for field in self.fields_of(host, form) {
                    host.set_attr(field, "value", "");
                }
                tracing::debug!(form = %form, "submission succeeded");
            }
            SubmitOutcome::Failure => {
                tracing::warn!(form = %form, "submission failed");
            }
        }
        self.show_banner(host, idx, outcome);
    }

    fn show_banner(&mut self, host: &mut dyn HostSurface, idx: usize, outcome: SubmitOutcome) {
        self.dismiss_banner(host, idx);

        let banner = host.create_element("div");
        host.add_class(banner, &self.cfg.banner_class);
        let (modifier, message) = match outcome {
            SubmitOutcome::Success => ("--success", self.cfg.success_message.as_str()),
            SubmitOutcome::Failure => ("--failure", self.cfg.failure_message.as_str()),
        };
        host.add_class(banner, &format!("{}{modifier}", self.cfg.banner_class));
        host.set_attr(banner, "role", "status");
        host.set_text(banner, message);
        host.append_child(self.forms[idx].form, banner);

        let timer = host.set_timeout(self.cfg.banner_dismiss_ms);
        self.forms[idx].banner = Some((banner, timer));
    }

    fn dismiss_banner(&mut self, host: &mut dyn HostSurface, idx: usize) {
        if let Some((banner, timer)) = self.forms[idx].banner.take() {
            host.clear_timer(timer);
            host.remove_node(banner);
        }
    }

    fn on_banner_timer(&mut self, host: &mut dyn HostSurface, id: TimerId) {
        let Some(idx) = self
            .forms
            .iter()
            .position(|f| f.banner.is_some_and(|(_, t)| t == id))
        else {
            return;
        };
        if let Some((banner, _)) = self.forms[idx].banner.take() {
            host.remove_node(banner);
        }
    }

    fn on_activate(&mut self, host: &mut dyn HostSurface, target: NodeId) {
        let Some(idx) = self
            .forms
            .iter()
            .position(|f| f.banner.is_some_and(|(b, _)| b == target))
        else {
            return;
        };
        self.dismiss_banner(host, idx);
    }
}

impl Controller for FormController {
    fn name(&self) -> &'static str {
        "form"
    }

    fn handle_event(&mut self, host: &mut dyn HostSurface, event: &Event) {
        match event {
            Event::Submit { form } => {
                let form = *form;
                self.on_submit(host, form);
            }
            Event::SubmissionSettled { id, outcome } => {
                let (id, outcome) = (*id, *outcome);
                self.on_settled(host, id, outcome);
            }
            Event::Timer { id } => {
                let id = *id;
                self.on_banner_timer(host, id);
            }
            Event::Activate { target } => {
                let target = *target;
                self.on_activate(host, target);
            }
            _ => {}
        }
    }
}
