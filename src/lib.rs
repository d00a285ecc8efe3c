//! Toggle Transition: CSS class-based enter/leave transitions for a
//! reactive visibility binding.
//!
//! A directive bound to an element watches a boolean visibility value and
//! walks the element through `{name}-enter-*` or `{name}-leave-*` classes
//! whenever it changes, hiding the element with inline `display: none`
//! once a leave transition has finished.
//!
//! # Core Concepts
//!
//! - **Argument store**: `name` and `duration` bindings recorded per element
//! - **Phase driver**: class sequencing with a forced reflow and a
//!   double animation-frame wait between `from` and `to`
//! - **Completion detector**: races transition-end events against a timeout
//!   predicted from computed style, discarding superseded waits by id
//!
//! The host (DOM, frames, timers, effects) sits behind the traits in
//! [`host`]; [`host::mock`] provides a deterministic headless host.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use toggle_transition::directive::{DirectiveContext, TransitionDirective};
//! use toggle_transition::host::mock::{MockElement, MockScheduler, MockScope, MockSignal};
//!
//! let scheduler = MockScheduler::new();
//! let scope = MockScope::new();
//! let directive = TransitionDirective::new(scheduler.clone());
//! let element = MockElement::new(1).with_transition("0s", "0.3s");
//! let visible = MockSignal::new(json!(false));
//!
//! let _cleanup = directive.bind(DirectiveContext {
//!     element: element.clone(),
//!     arg: None,
//!     get: visible.getter(),
//!     scope: &*scope,
//! });
//!
//! visible.set(json!(true));
//! scope.trigger();
//! assert!(element.has_class("v-enter-from"));
//!
//! scheduler.run_frame();
//! scheduler.run_frame();
//! assert!(element.has_class("v-enter-to"));
//!
//! element.end_transition("opacity");
//! assert!(element.classes().is_empty());
//! ```

pub mod args;
pub mod config;
pub mod core;
pub mod directive;
pub mod effects;
pub mod host;

// Re-export commonly used types
pub use config::TransitionOptions;
pub use crate::core::{Direction, DurationPair, ElementTransitionState, PhaseState, Stage};
pub use directive::{Cleanup, DirectiveContext, TransitionDirective};
pub use effects::TransitionController;
pub use host::{EffectScope, Element, ElementKey, Scheduler};
