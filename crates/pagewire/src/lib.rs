#![forbid(unsafe_code)]

//! Pagewire public facade and prelude.
//!
//! Re-exports the pieces an embedding actually touches: the [`Engine`] and
//! its configuration, the [`HostSurface`] abstraction (plus the
//! deterministic [`MemoryHost`]), the event vocabulary, and the form
//! transport hook. The individual `pagewire-*` crates remain available for
//! anything not surfaced here.
//!
//! ```no_run
//! use pagewire::prelude::*;
//!
//! struct NullTransport;
//!
//! impl FormTransport for NullTransport {
//!     fn begin(&mut self, _form: NodeId, _fields: &[FormField]) -> SubmissionId {
//!         SubmissionId::new(1)
//!     }
//! }
//!
//! let host = MemoryHost::new();
//! let mut engine = Engine::init(host, EngineConfig::default(), Box::new(NullTransport));
//! engine.dispatch(Event::key(KeyCode::Tab));
//! ```

pub use pagewire_controllers::{Controller, Disabled, FormField, FormTransport, NavState};
pub use pagewire_core::{
    Event, IntersectionConfig, KeyCode, KeyEvent, Margin, Modifiers, NodeId, ObservationId,
    PointerEvent, Rect, ScrollLock, Size, SubmissionId, SubmitOutcome, TimerHost, TimerId,
};
pub use pagewire_host::{HostSurface, MemoryHost, ScrollBehavior};
pub use pagewire_runtime::{ControllerInit, Engine, EngineConfig, EngineError, InitOutcome, InitReport};

/// The handful of names almost every embedding imports.
pub mod prelude {
    pub use pagewire_controllers::{FormField, FormTransport};
    pub use pagewire_core::{Event, KeyCode, NodeId, SubmissionId, SubmitOutcome};
    pub use pagewire_host::{HostSurface, MemoryHost, ScrollBehavior};
    pub use pagewire_runtime::{Engine, EngineConfig, EngineError};
}
