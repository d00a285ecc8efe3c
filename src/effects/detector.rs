//! Completion detection.
//!
//! A wait resolves through whichever path gets there first: an explicit
//! duration timer, the expected number of transition-end events, or a
//! fallback timer just past the predicted timeout. Every path checks the
//! completion id at fire time, so waits superseded by a newer phase resolve
//! as no-ops instead of being torn down.

use super::registry::Registry;
use crate::core::{transition_info, CompletionId};
use crate::host::{Callback, Element, ElementKey, ListenerId, Scheduler};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::trace;

/// Slack added to the predicted timeout before the fallback fires.
const FALLBACK_SLACK_MS: f64 = 1.0;

/// Resolves a single wait at most once, and only while its id is live.
struct Resolver {
    registry: Rc<Registry>,
    key: ElementKey,
    id: CompletionId,
    settled: Cell<bool>,
    on_complete: RefCell<Option<Callback>>,
}

impl Resolver {
    fn resolve(&self, source: &'static str) {
        if self.settled.replace(true) {
            return;
        }
        if !self.registry.is_live(self.key, self.id) {
            trace!(element = %self.key, completion = self.id, source, "Discarding stale completion");
            return;
        }
        trace!(element = %self.key, completion = self.id, source, "Transition completed");
        let callback = self.on_complete.borrow_mut().take();
        if let Some(callback) = callback {
            callback();
        }
    }
}

/// Detects the end of the CSS transition running on one element.
#[derive(Clone)]
pub struct CompletionDetector {
    element: Rc<dyn Element>,
    scheduler: Rc<dyn Scheduler>,
    registry: Rc<Registry>,
}

impl CompletionDetector {
    pub fn new(
        element: Rc<dyn Element>,
        scheduler: Rc<dyn Scheduler>,
        registry: Rc<Registry>,
    ) -> Self {
        Self {
            element,
            scheduler,
            registry,
        }
    }

    /// Wait for the running transition to end, then call `on_complete`.
    ///
    /// Starting a wait makes its id the live one, invalidating any earlier
    /// wait on the same element. With an explicit duration only a timer is
    /// used; otherwise computed style predicts the timeout and event count.
    ///
    /// Returns the id of the new wait, or `None` if the element has no
    /// state (in which case `on_complete` is dropped).
    pub fn wait(&self, explicit_ms: Option<f64>, on_complete: Callback) -> Option<CompletionId> {
        let key = self.element.key();
        let id = self.registry.begin_completion(key)?;
        let resolver = Rc::new(Resolver {
            registry: Rc::clone(&self.registry),
            key,
            id,
            settled: Cell::new(false),
            on_complete: RefCell::new(Some(on_complete)),
        });

        if let Some(ms) = explicit_ms {
            trace!(element = %key, completion = id, duration_ms = ms, "Waiting for explicit duration");
            self.scheduler
                .set_timeout(ms, Box::new(move || resolver.resolve("explicit")));
            return Some(id);
        }

        let info = transition_info(&self.element.computed_transition());
        trace!(
            element = %key,
            completion = id,
            timeout_ms = info.timeout,
            prop_count = info.prop_count,
            has_transform = info.has_transform,
            "Waiting for transition end"
        );

        let listener: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
        if info.prop_count > 0 {
            let ended = Cell::new(0usize);
            let element = Rc::clone(&self.element);
            let slot = Rc::clone(&listener);
            let resolver = Rc::clone(&resolver);
            let prop_count = info.prop_count;

            let handle = self.element.on_transition_end(Box::new(move |event| {
                if event.target != key {
                    return;
                }
                ended.set(ended.get() + 1);
                if ended.get() >= prop_count {
                    if let Some(id) = slot.take() {
                        element.off_transition_end(id);
                    }
                    resolver.resolve("event");
                }
            }));
            listener.set(Some(handle));
        }

        let element = Rc::clone(&self.element);
        self.scheduler.set_timeout(
            info.timeout + FALLBACK_SLACK_MS,
            Box::new(move || {
                if let Some(id) = listener.take() {
                    element.off_transition_end(id);
                }
                resolver.resolve("timeout");
            }),
        );

        Some(id)
    }
}
