//! The event vocabulary a host surface delivers to the engine.
//!
//! Events are plain data. The host translates whatever its platform produces
//! (DOM events, synthetic test input) into this enum and feeds it to
//! `Engine::dispatch`; controllers filter by their own targets. There is no
//! subscription step and no inter-controller event traffic.

use bitflags::bitflags;

use crate::id::{NodeId, ObservationId, SubmissionId, TimerId};

bitflags! {
    /// Keyboard modifier state at the time of a key press.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
    }
}

/// Key identity for the small set of keys the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    Tab,
    Enter,
    Char(char),
}

/// A key press with its modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A press of `code` with no modifiers held.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }
}

/// A raw pointer press somewhere on the page.
///
/// `target` is the most specific element under the pointer, or `None` when
/// the press landed outside any tracked element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub target: Option<NodeId>,
    pub x: f64,
    pub y: f64,
}

/// Outcome of an opaque form submission, reported by the transport
/// collaborator via the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Success,
    Failure,
}

/// A host-delivered event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A key press.
    Key(KeyEvent),
    /// A raw pointer press (used for outside-click and backdrop detection).
    PointerPress(PointerEvent),
    /// Semantic activation of a control (click or keyboard activation of a
    /// button or link).
    Activate { target: NodeId },
    /// The viewport was resized.
    Resize { width: f64, height: f64 },
    /// The page scrolled to a new vertical offset.
    Scroll { y: f64 },
    /// A registered observation crossed its visibility threshold.
    Visibility {
        observation: ObservationId,
        target: NodeId,
        ratio: f64,
    },
    /// A host timer fired.
    Timer { id: TimerId },
    /// A form was submitted by the user.
    Submit { form: NodeId },
    /// An in-flight form submission settled.
    SubmissionSettled {
        id: SubmissionId,
        outcome: SubmitOutcome,
    },
}

impl Event {
    /// Shorthand for an unmodified key press.
    #[must_use]
    pub const fn key(code: KeyCode) -> Self {
        Self::Key(KeyEvent::plain(code))
    }

    /// Shorthand for a pointer press on `target` (coordinates zeroed).
    #[must_use]
    pub const fn press_on(target: NodeId) -> Self {
        Self::PointerPress(PointerEvent {
            target: Some(target),
            x: 0.0,
            y: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_key_has_no_modifiers() {
        let ev = KeyEvent::plain(KeyCode::Escape);
        assert!(ev.modifiers.is_empty());
        assert_eq!(ev.code, KeyCode::Escape);
    }

    #[test]
    fn key_shorthand_matches_explicit_construction() {
        assert_eq!(
            Event::key(KeyCode::Tab),
            Event::Key(KeyEvent {
                code: KeyCode::Tab,
                modifiers: Modifiers::empty(),
            })
        );
    }

    #[test]
    fn press_on_carries_target() {
        let node = NodeId::new(9);
        match Event::press_on(node) {
            Event::PointerPress(p) => assert_eq!(p.target, Some(node)),
            other => panic!("unexpected event {other:?}"),
        }
    }
}
