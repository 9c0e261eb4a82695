#![forbid(unsafe_code)]

//! Engine orchestration for Pagewire.
//!
//! The [`Engine`] owns the host surface and exactly one instance of each
//! interaction controller, created when the embedding says the document is
//! ready. Construction is best-effort: a controller that refuses to bind is
//! recorded in the [`InitReport`] with its reason and the rest of the page
//! keeps working. After init, the embedding feeds every host event through
//! [`Engine::dispatch`].
//!
//! Two operations are exposed to the hosting page: scrolling to a named
//! section and opening the video overlay programmatically.

pub mod config;
pub mod engine;
pub mod error;
pub mod report;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::EngineError;
pub use report::{ControllerInit, InitOutcome, InitReport};
