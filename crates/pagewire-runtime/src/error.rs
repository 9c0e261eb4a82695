//! Errors surfaced by the engine's public operations.

/// Failure of an externally invoked engine operation.
///
/// These are the only errors the engine reports to callers; everything that
/// can go wrong during init degrades into the init report instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// `scroll_to_section` was asked for a section that is not on the page.
    #[error("no section with id `{id}`")]
    UnknownSection { id: String },
    /// The operation needs a controller that is disabled on this page.
    #[error("{name} controller is disabled on this page")]
    ControllerDisabled { name: &'static str },
}
