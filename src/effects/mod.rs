//! Imperative shell around the pure core.
//!
//! Everything here touches the host: the registry owns per-element state,
//! the detector races timers against transition-end events, and the
//! controller mutates classes and inline display across animation frames.
//!
//! # Staleness
//!
//! A new phase never tears down the timers, frames or listeners of the one
//! it interrupts. It replaces the element's live completion id instead, and
//! every deferred callback compares its captured id with the live one before
//! doing anything.

mod controller;
mod detector;
mod registry;

pub use controller::{TransitionController, HIDDEN};
pub use detector::CompletionDetector;
pub use registry::{next_completion_id, Registry};
