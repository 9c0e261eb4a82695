#![forbid(unsafe_code)]

//! Host surface abstraction for Pagewire.
//!
//! [`HostSurface`] is the engine's only window onto the presentation
//! environment: element lookup, attribute/class/text/style mutation,
//! geometry, scrolling, focus, timers, and visibility observation. A real
//! embedding implements it over its platform; [`MemoryHost`] implements it
//! over an in-memory element arena and backs the whole test suite.
//!
//! The model is host-driven and deterministic: the embedder translates
//! platform input into [`Event`](pagewire_core::Event) values and feeds them
//! to the engine, and pumps timers/visibility explicitly. Nothing in this
//! crate spins a loop of its own.

pub mod memory;
mod selector;
pub mod surface;

pub use memory::MemoryHost;
pub use surface::{HostSurface, ScrollBehavior};
