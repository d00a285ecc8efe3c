//! Seams to the host environment.
//!
//! The controller never talks to a browser directly. It drives an
//! [`Element`] (class list, inline display, computed style, layout reads and
//! transition-end events), a [`Scheduler`] (animation frames and timers) and
//! an [`EffectScope`] (reactive effect registration). A browser binding
//! implements these over the DOM; [`mock`] implements them in memory.
//!
//! Everything runs on the host's single-threaded event loop, so the traits
//! take `&self` and callbacks are not `Send`.

pub mod mock;

use crate::core::ComputedTransition;
use std::fmt;

/// Callback run once by the scheduler.
pub type Callback = Box<dyn FnOnce()>;

/// Handler invoked for every transition-end event dispatched on an element.
pub type TransitionEndHandler = Box<dyn FnMut(&TransitionEndEvent)>;

/// Stable identity of an element, used as the side-table key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ElementKey(pub u64);

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// Handle of a registered transition-end listener.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ListenerId(pub u64);

/// A native transition-end event.
///
/// Events bubble, so `target` may be a descendant of the element the
/// listener was registered on.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionEndEvent {
    pub target: ElementKey,
    pub property_name: String,
}

/// An element the controller can transition.
pub trait Element {
    fn key(&self) -> ElementKey;

    fn add_class(&self, class: &str);

    fn remove_class(&self, class: &str);

    /// Whether the element carries an inline style declaration.
    ///
    /// Elements without one are never given an inline `display`.
    fn supports_inline_style(&self) -> bool;

    /// Current inline `display`, empty when unset.
    fn inline_display(&self) -> String;

    fn set_inline_display(&self, value: &str);

    /// Snapshot of the computed transition style.
    fn computed_transition(&self) -> ComputedTransition;

    /// Read a layout metric, forcing pending style changes to flush.
    fn force_layout(&self) -> f64;

    fn on_transition_end(&self, handler: TransitionEndHandler) -> ListenerId;

    fn off_transition_end(&self, id: ListenerId);
}

/// Frame and timer scheduling of the host event loop.
pub trait Scheduler {
    /// Run `callback` before the next repaint.
    fn request_animation_frame(&self, callback: Callback);

    /// Run `callback` after `delay_ms` milliseconds.
    fn set_timeout(&self, delay_ms: f64, callback: Callback);
}

/// Reactive effect registration of the host runtime.
pub trait EffectScope {
    /// Run `effect` now and again whenever a signal it read changes.
    fn effect(&self, effect: Box<dyn FnMut()>);
}
