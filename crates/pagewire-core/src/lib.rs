#![forbid(unsafe_code)]

//! Vocabulary types and pure utilities for the Pagewire interaction engine.
//!
//! Everything in this crate is host-agnostic: opaque ids, the event
//! vocabulary delivered by a host surface, pixel geometry, rate-limiting
//! wrappers, the shared scroll lock, and counter text math. The host
//! abstraction itself lives in `pagewire-host`; controllers live in
//! `pagewire-controllers`.

pub mod counter;
pub mod event;
pub mod geometry;
pub mod id;
pub mod rate_limit;
pub mod scroll_lock;
pub mod timer;

pub use event::{Event, KeyCode, KeyEvent, Modifiers, PointerEvent, SubmitOutcome};
pub use geometry::{IntersectionConfig, Margin, Rect, Size};
pub use id::{NodeId, ObservationId, SubmissionId, TimerId};
pub use rate_limit::{Debounce, Throttle};
pub use scroll_lock::{LockChange, ScrollLock};
pub use timer::TimerHost;
