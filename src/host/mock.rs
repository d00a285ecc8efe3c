//! Deterministic in-memory host.
//!
//! [`MockElement`] records every DOM mutation in order, [`MockScheduler`]
//! runs animation frames and timers against a virtual clock, and
//! [`MockScope`] re-runs registered effects on demand. Together they let the
//! whole controller run headless with exact control over frame boundaries
//! and elapsed time.

use super::{
    Callback, Element, EffectScope, ElementKey, ListenerId, Scheduler, TransitionEndEvent,
    TransitionEndHandler,
};
use crate::core::ComputedTransition;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A DOM mutation observed on a [`MockElement`].
#[derive(Clone, Debug, PartialEq)]
pub enum DomOp {
    AddClass(String),
    RemoveClass(String),
    SetDisplay(String),
    ForceLayout,
}

/// In-memory element with a class list, inline display and computed style.
pub struct MockElement {
    key: ElementKey,
    classes: RefCell<Vec<String>>,
    display: RefCell<Option<String>>,
    computed: RefCell<ComputedTransition>,
    listeners: RefCell<Vec<(ListenerId, Option<TransitionEndHandler>)>>,
    next_listener: Cell<u64>,
    ops: RefCell<Vec<DomOp>>,
}

impl MockElement {
    /// Element with an empty inline style and no computed transition.
    pub fn new(key: u64) -> Rc<Self> {
        Rc::new(Self::build(key, Some(String::new())))
    }

    /// Element that carries no inline style declaration.
    pub fn without_style(key: u64) -> Rc<Self> {
        Rc::new(Self::build(key, None))
    }

    fn build(key: u64, display: Option<String>) -> Self {
        Self {
            key: ElementKey(key),
            classes: RefCell::new(Vec::new()),
            display: RefCell::new(display),
            computed: RefCell::new(ComputedTransition::default()),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(1),
            ops: RefCell::new(Vec::new()),
        }
    }

    /// Preset the inline display without recording an operation.
    pub fn with_display(self: Rc<Self>, display: &str) -> Rc<Self> {
        *self.display.borrow_mut() = Some(display.to_string());
        self
    }

    /// Preset the computed transition style.
    pub fn with_transition(self: Rc<Self>, delay: &str, duration: &str) -> Rc<Self> {
        *self.computed.borrow_mut() = ComputedTransition::new(delay, duration);
        self
    }

    pub fn classes(&self) -> Vec<String> {
        self.classes.borrow().clone()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().iter().any(|c| c == class)
    }

    /// Inline display, `None` when the element has no inline style.
    pub fn display(&self) -> Option<String> {
        self.display.borrow().clone()
    }

    /// Every mutation since creation or the last [`MockElement::clear_ops`].
    pub fn ops(&self) -> Vec<DomOp> {
        self.ops.borrow().clone()
    }

    pub fn clear_ops(&self) {
        self.ops.borrow_mut().clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Dispatch a transition-end event whose target is this element.
    pub fn end_transition(&self, property: &str) {
        self.dispatch_transition_end(self.key, property);
    }

    /// Dispatch a transition-end event to every listener on this element.
    ///
    /// Listeners may deregister themselves while handling the event.
    pub fn dispatch_transition_end(&self, target: ElementKey, property: &str) {
        let event = TransitionEndEvent {
            target,
            property_name: property.to_string(),
        };
        let ids: Vec<ListenerId> = self.listeners.borrow().iter().map(|(id, _)| *id).collect();

        for id in ids {
            let handler = self
                .listeners
                .borrow_mut()
                .iter_mut()
                .find(|(listener, _)| *listener == id)
                .and_then(|(_, handler)| handler.take());

            if let Some(mut handler) = handler {
                handler(&event);
                if let Some(slot) = self
                    .listeners
                    .borrow_mut()
                    .iter_mut()
                    .find(|(listener, _)| *listener == id)
                {
                    slot.1 = Some(handler);
                }
            }
        }
    }

    fn record(&self, op: DomOp) {
        self.ops.borrow_mut().push(op);
    }
}

impl Element for MockElement {
    fn key(&self) -> ElementKey {
        self.key
    }

    fn add_class(&self, class: &str) {
        let mut classes = self.classes.borrow_mut();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
        drop(classes);
        self.record(DomOp::AddClass(class.to_string()));
    }

    fn remove_class(&self, class: &str) {
        self.classes.borrow_mut().retain(|c| c != class);
        self.record(DomOp::RemoveClass(class.to_string()));
    }

    fn supports_inline_style(&self) -> bool {
        self.display.borrow().is_some()
    }

    fn inline_display(&self) -> String {
        self.display.borrow().clone().unwrap_or_default()
    }

    fn set_inline_display(&self, value: &str) {
        *self.display.borrow_mut() = Some(value.to_string());
        self.record(DomOp::SetDisplay(value.to_string()));
    }

    fn computed_transition(&self) -> ComputedTransition {
        self.computed.borrow().clone()
    }

    fn force_layout(&self) -> f64 {
        self.record(DomOp::ForceLayout);
        0.0
    }

    fn on_transition_end(&self, handler: TransitionEndHandler) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Some(handler)));
        id
    }

    fn off_transition_end(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(listener, _)| *listener != id);
    }
}

struct Timer {
    due: f64,
    seq: u64,
    callback: Callback,
}

/// Frame queue and timer wheel over a virtual clock.
#[derive(Default)]
pub struct MockScheduler {
    now: Cell<f64>,
    seq: Cell<u64>,
    frames: RefCell<Vec<Callback>>,
    timers: RefCell<Vec<Timer>>,
}

impl MockScheduler {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Virtual time in milliseconds.
    pub fn now(&self) -> f64 {
        self.now.get()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Run every callback queued for the next frame.
    ///
    /// Callbacks requested while the frame runs wait for the following one.
    pub fn run_frame(&self) -> usize {
        let frames = std::mem::take(&mut *self.frames.borrow_mut());
        let count = frames.len();
        for callback in frames {
            callback();
        }
        count
    }

    /// Move the clock forward, firing due timers in order.
    pub fn advance(&self, ms: f64) {
        let target = self.now.get() + ms;
        while let Some(timer) = self.take_next_timer(target) {
            self.now.set(timer.due.max(self.now.get()));
            (timer.callback)();
        }
        self.now.set(target);
    }

    /// Run frames and timers until nothing is left to do.
    pub fn run_until_idle(&self) {
        loop {
            if self.pending_frames() > 0 {
                self.run_frame();
                continue;
            }
            let next_due = self
                .timers
                .borrow()
                .iter()
                .map(|timer| timer.due)
                .fold(f64::INFINITY, f64::min);
            if next_due.is_finite() {
                let step = (next_due - self.now.get()).max(0.0);
                self.advance(step);
            } else {
                break;
            }
        }
    }

    fn take_next_timer(&self, limit: f64) -> Option<Timer> {
        let mut timers = self.timers.borrow_mut();
        let index = timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= limit)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
            .map(|(index, _)| index)?;
        Some(timers.remove(index))
    }
}

impl Scheduler for MockScheduler {
    fn request_animation_frame(&self, callback: Callback) {
        self.frames.borrow_mut().push(callback);
    }

    fn set_timeout(&self, delay_ms: f64, callback: Callback) {
        let seq = self.seq.get();
        self.seq.set(seq + 1);
        self.timers.borrow_mut().push(Timer {
            due: self.now.get() + delay_ms.max(0.0),
            seq,
            callback,
        });
    }
}

/// Effect scope whose effects re-run when [`MockScope::trigger`] is called.
#[derive(Default)]
pub struct MockScope {
    effects: RefCell<Vec<Box<dyn FnMut()>>>,
}

impl MockScope {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn effect_count(&self) -> usize {
        self.effects.borrow().len()
    }

    /// Re-run every registered effect.
    pub fn trigger(&self) {
        let mut effects = std::mem::take(&mut *self.effects.borrow_mut());
        for effect in effects.iter_mut() {
            effect();
        }
        let mut slot = self.effects.borrow_mut();
        effects.append(&mut slot);
        *slot = effects;
    }
}

impl EffectScope for MockScope {
    fn effect(&self, mut effect: Box<dyn FnMut()>) {
        effect();
        self.effects.borrow_mut().push(effect);
    }
}

/// A writable value read by directive getters.
#[derive(Clone, Default)]
pub struct MockSignal {
    value: Rc<RefCell<Value>>,
}

impl MockSignal {
    pub fn new(value: Value) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
        }
    }

    pub fn get(&self) -> Value {
        self.value.borrow().clone()
    }

    pub fn set(&self, value: Value) {
        *self.value.borrow_mut() = value;
    }

    /// Getter closure suitable for a directive context.
    pub fn getter(&self) -> Rc<dyn Fn() -> Value> {
        let value = Rc::clone(&self.value);
        Rc::new(move || value.borrow().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_requested_during_a_frame_wait_for_the_next() {
        let scheduler = MockScheduler::new();
        let inner = Rc::clone(&scheduler);
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);

        scheduler.request_animation_frame(Box::new(move || {
            counter.set(counter.get() + 1);
            let counter = Rc::clone(&counter);
            inner.request_animation_frame(Box::new(move || counter.set(counter.get() + 1)));
        }));

        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(scheduler.pending_frames(), 1);
        scheduler.run_frame();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn timers_fire_in_due_order() {
        let scheduler = MockScheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for (delay, label) in [(30.0, "c"), (10.0, "a"), (20.0, "b")] {
            let order = Rc::clone(&order);
            scheduler.set_timeout(delay, Box::new(move || order.borrow_mut().push(label)));
        }

        scheduler.advance(15.0);
        assert_eq!(*order.borrow(), vec!["a"]);
        scheduler.advance(100.0);
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
        assert_eq!(scheduler.now(), 115.0);
    }

    #[test]
    fn listener_can_remove_itself_while_handling() {
        let element = MockElement::new(1);
        let seen = Rc::new(Cell::new(0));
        let id_slot: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));

        let handle = Rc::clone(&element);
        let slot = Rc::clone(&id_slot);
        let counter = Rc::clone(&seen);
        let id = element.on_transition_end(Box::new(move |_| {
            counter.set(counter.get() + 1);
            if let Some(id) = slot.get() {
                handle.off_transition_end(id);
            }
        }));
        id_slot.set(Some(id));

        element.end_transition("opacity");
        element.end_transition("opacity");

        assert_eq!(seen.get(), 1);
        assert_eq!(element.listener_count(), 0);
    }

    #[test]
    fn scope_runs_effect_immediately_and_on_trigger() {
        let scope = MockScope::new();
        let runs = Rc::new(Cell::new(0));
        let counter = Rc::clone(&runs);

        scope.effect(Box::new(move || counter.set(counter.get() + 1)));
        assert_eq!(runs.get(), 1);

        scope.trigger();
        assert_eq!(runs.get(), 2);
        assert_eq!(scope.effect_count(), 1);
    }
}
