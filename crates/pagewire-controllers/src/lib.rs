#![forbid(unsafe_code)]

//! Interaction controllers for Pagewire.
//!
//! One controller per interaction pattern: collapsible navigation, one-shot
//! visibility effects (lazy media, entrance reveals, animated counters), the
//! video overlay, form validation/submission feedback, and accessibility
//! affordances. Controllers are constructed once by the engine, each binding
//! to its own subset of page elements; a page without a controller's markup
//! yields a [`Disabled`] reason instead of a half-wired instance.
//!
//! Controllers never talk to each other. The only shared resource is the
//! reference-counted scroll lock (navigation and modal both suppress page
//! scrolling while open).

pub mod a11y;
pub mod counters;
pub mod form;
pub mod modal;
pub mod nav;
pub mod observe;
pub mod scroll;

use pagewire_core::Event;
use pagewire_host::HostSurface;

pub use a11y::{A11yConfig, A11yController};
pub use counters::CounterAnimation;
pub use form::{FormConfig, FormController, FormField, FormTransport};
pub use modal::{ModalConfig, ModalController};
pub use nav::{NavConfig, NavController, NavState};
pub use observe::{ObserveConfig, VisibilityController};
pub use scroll::{ScrollConfig, header_height, scroll_to_anchor, smooth_scroll_to};

/// A unit of interactive behavior bound to a fixed set of page elements.
///
/// Every host event is offered to every live controller; each one filters by
/// its own targets and ignores the rest. Handlers are short and re-entrant
/// per the single-threaded host model.
pub trait Controller {
    /// Stable name used in the init report and diagnostics.
    fn name(&self) -> &'static str;

    /// React to a host-delivered event.
    fn handle_event(&mut self, host: &mut dyn HostSurface, event: &Event);
}

/// Why a controller refused to bind on this page.
///
/// Refusal is the expected outcome on pages without the relevant markup; the
/// engine records it and moves on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Disabled {
    /// A structurally required element is missing.
    #[error("required {role} element `{selector}` not found")]
    MissingElement {
        role: &'static str,
        selector: String,
    },
    /// The page has nothing for this controller to manage.
    #[error("no targets match `{selector}`")]
    NoTargets { selector: String },
}
