//! Phase driver.
//!
//! Turns each visibility change into the enter or leave class sequence:
//!
//! ```text
//! enter: +active +from, show   | 2 frames | -from +to | done | -active -to
//! leave: +from, reflow, +active | 2 frames | -from +to | done | -active -to, hide
//! ```
//!
//! The forced layout read and the two-frame wait make the browser commit the
//! `from` state before `to` is applied. Without them the class changes are
//! coalesced and no transition is rendered.

use super::detector::CompletionDetector;
use super::registry::{next_completion_id, Registry};
use crate::config::TransitionOptions;
use crate::core::{class_names, CompletionId, Direction, PhaseChange, PhaseState, Stage};
use crate::host::{Callback, Element, ElementKey, Scheduler};
use chrono::Utc;
use std::rc::Rc;
use tracing::{debug, trace};

/// Inline display value that hides the element.
pub const HIDDEN: &str = "none";

/// Drives the transition of a single element.
///
/// Cloning is cheap; clones share the element, scheduler and registry and
/// are handed to frame and completion callbacks.
#[derive(Clone)]
pub struct TransitionController {
    element: Rc<dyn Element>,
    scheduler: Rc<dyn Scheduler>,
    registry: Rc<Registry>,
    detector: CompletionDetector,
}

impl TransitionController {
    pub fn new(
        element: Rc<dyn Element>,
        scheduler: Rc<dyn Scheduler>,
        registry: Rc<Registry>,
    ) -> Self {
        let detector = CompletionDetector::new(
            Rc::clone(&element),
            Rc::clone(&scheduler),
            Rc::clone(&registry),
        );
        Self {
            element,
            scheduler,
            registry,
            detector,
        }
    }

    pub fn key(&self) -> ElementKey {
        self.element.key()
    }

    /// Ensure the element has state and remember its pre-directive display.
    ///
    /// Arguments bound earlier are kept. A pre-existing `display: none` is
    /// not remembered, otherwise entering could never show the element.
    pub fn attach(&self, options: &TransitionOptions) {
        let key = self.key();
        let display = if self.element.supports_inline_style() {
            self.element.inline_display()
        } else {
            String::new()
        };
        let original = if display == HIDDEN { String::new() } else { display };

        self.registry.ensure(key, || options.initial_state());
        self.registry
            .with_mut(key, |state| state.original_display = original);
    }

    /// React to a new visibility value.
    ///
    /// The first call only sets the initial display; later calls start an
    /// enter or leave phase when the value differs from the last one.
    /// Re-evaluating with an unchanged value is a no-op, so a running
    /// transition is not restarted by an unrelated effect re-run.
    pub fn on_visibility_change(&self, show: bool) {
        let key = self.key();
        let Some((mounted, visible)) = self.registry.with(key, |s| (s.mounted, s.visible)) else {
            trace!(element = %key, "Ignoring visibility change of unbound element");
            return;
        };

        if !mounted {
            self.mount(show);
        } else if show == visible {
            trace!(element = %key, show, "Visibility unchanged");
        } else if show {
            self.start(Direction::Enter);
        } else {
            self.start(Direction::Leave);
        }
    }

    fn mount(&self, show: bool) {
        let key = self.key();
        let Some(original) = self.registry.with_mut(key, |state| {
            state.mounted = true;
            state.visible = show;
            state.original_display.clone()
        }) else {
            return;
        };

        debug!(element = %key, show, "Mounted without transition");
        self.set_display(if show { original.as_str() } else { HIDDEN });
    }

    fn start(&self, direction: Direction) {
        let key = self.key();
        let phase_id = next_completion_id();
        let Some((name, original, explicit)) = self.registry.with_mut(key, |state| {
            let from = state.phase;
            state.phase = PhaseState::of(direction);
            state.visible = direction == Direction::Enter;
            state.pending_completion = phase_id;
            state.history = state.history.record(PhaseChange {
                from,
                to: state.phase,
                completion: phase_id,
                timestamp: Utc::now(),
            });
            (
                state.name.clone(),
                state.original_display.clone(),
                state.explicit_duration(direction),
            )
        }) else {
            return;
        };

        debug!(element = %key, %direction, name = %name, completion = phase_id, "Starting phase");

        // Drop whatever the interrupted opposite phase left behind.
        for stage in Stage::ALL {
            self.remove_classes(&name, direction.opposite(), stage);
        }

        match direction {
            Direction::Enter => {
                self.add_classes(&name, direction, Stage::Active);
                self.add_classes(&name, direction, Stage::From);
                self.set_display(&original);
            }
            Direction::Leave => {
                self.add_classes(&name, direction, Stage::From);
                self.element.force_layout();
                self.add_classes(&name, direction, Stage::Active);
            }
        }

        let controller = self.clone();
        self.next_frame_twice(Box::new(move || {
            controller.swap_to_final(direction, phase_id, name, explicit);
        }));
    }

    fn swap_to_final(
        &self,
        direction: Direction,
        phase_id: CompletionId,
        name: String,
        explicit: Option<f64>,
    ) {
        let key = self.key();
        if !self.registry.is_live(key, phase_id) {
            trace!(element = %key, %direction, completion = phase_id, "Skipping superseded frame swap");
            return;
        }

        self.remove_classes(&name, direction, Stage::From);
        self.add_classes(&name, direction, Stage::To);

        let controller = self.clone();
        self.detector.wait(
            explicit,
            Box::new(move || controller.finish(direction, &name)),
        );
    }

    fn finish(&self, direction: Direction, name: &str) {
        let key = self.key();
        self.registry.with_mut(key, |state| {
            let from = state.phase;
            state.phase = PhaseState::Idle;
            state.history = state.history.record(PhaseChange {
                from,
                to: PhaseState::Idle,
                completion: state.pending_completion,
                timestamp: Utc::now(),
            });
        });

        self.remove_classes(name, direction, Stage::Active);
        self.remove_classes(name, direction, Stage::To);
        if direction == Direction::Leave {
            self.set_display(HIDDEN);
        }
        debug!(element = %key, %direction, "Phase finished");
    }

    fn next_frame_twice(&self, callback: Callback) {
        let scheduler = Rc::clone(&self.scheduler);
        self.scheduler.request_animation_frame(Box::new(move || {
            scheduler.request_animation_frame(callback);
        }));
    }

    fn add_classes(&self, name: &str, direction: Direction, stage: Stage) {
        for class in class_names(name, direction, stage) {
            trace!(element = %self.key(), class = %class, "Adding class");
            self.element.add_class(&class);
        }
    }

    fn remove_classes(&self, name: &str, direction: Direction, stage: Stage) {
        for class in class_names(name, direction, stage) {
            self.element.remove_class(&class);
        }
    }

    fn set_display(&self, value: &str) {
        if self.element.supports_inline_style() {
            self.element.set_inline_display(value);
        }
    }
}
