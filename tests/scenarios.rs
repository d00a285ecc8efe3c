//! End-to-end scenarios against the in-memory host.

use serde_json::json;
use std::rc::Rc;
use toggle_transition::core::{DurationPair, PhaseState};
use toggle_transition::directive::{Cleanup, DirectiveContext, TransitionDirective};
use toggle_transition::host::Element;
use toggle_transition::host::mock::{DomOp, MockElement, MockScheduler, MockScope, MockSignal};
use toggle_transition::TransitionOptions;

struct Harness {
    scheduler: Rc<MockScheduler>,
    scope: Rc<MockScope>,
    directive: TransitionDirective,
}

impl Harness {
    fn new() -> Self {
        Self::with_options(TransitionOptions::default())
    }

    fn with_options(options: TransitionOptions) -> Self {
        let scheduler = MockScheduler::new();
        Self {
            directive: TransitionDirective::with_options(scheduler.clone(), options),
            scheduler,
            scope: MockScope::new(),
        }
    }

    fn bind(&self, element: &Rc<MockElement>, arg: Option<&str>, signal: &MockSignal) -> Cleanup {
        self.directive.bind(DirectiveContext {
            element: element.clone(),
            arg,
            get: signal.getter(),
            scope: &*self.scope,
        })
    }

    fn set(&self, signal: &MockSignal, visible: bool) {
        signal.set(json!(visible));
        self.scope.trigger();
    }
}

fn add(class: &str) -> DomOp {
    DomOp::AddClass(class.to_string())
}

fn remove(class: &str) -> DomOp {
    DomOp::RemoveClass(class.to_string())
}

fn display(value: &str) -> DomOp {
    DomOp::SetDisplay(value.to_string())
}

fn class_ops(ops: &[DomOp]) -> Vec<DomOp> {
    ops.iter()
        .filter(|op| matches!(op, DomOp::AddClass(_) | DomOp::RemoveClass(_)))
        .cloned()
        .collect()
}

#[test]
fn first_evaluation_never_touches_classes() {
    for initial in [true, false] {
        let h = Harness::new();
        let element = MockElement::new(1).with_display("inline-block");
        let signal = MockSignal::new(json!(initial));

        let _cleanup = h.bind(&element, None, &signal);
        h.scheduler.run_until_idle();

        let expected = if initial { "inline-block" } else { "none" };
        assert_eq!(element.ops(), vec![display(expected)]);
        assert!(element.classes().is_empty());
    }
}

#[test]
fn enter_runs_full_class_sequence() {
    let h = Harness::new();
    let element = MockElement::new(1)
        .with_display("block")
        .with_transition("0s", "0.3s");
    let signal = MockSignal::new(json!(false));
    let _cleanup = h.bind(&element, None, &signal);
    element.clear_ops();

    h.set(&signal, true);

    assert_eq!(
        class_ops(&element.ops()),
        vec![
            remove("v-leave-from"),
            remove("v-leave-active"),
            remove("v-leave-to"),
            add("v-enter-active"),
            add("v-enter-from"),
        ]
    );
    assert_eq!(element.display(), Some("block".to_string()));
    element.clear_ops();

    // The swap waits for the second frame boundary
    h.scheduler.run_frame();
    assert!(element.ops().is_empty());
    h.scheduler.run_frame();
    assert_eq!(
        element.ops(),
        vec![remove("v-enter-from"), add("v-enter-to")]
    );
    element.clear_ops();

    element.end_transition("opacity");
    assert_eq!(
        element.ops(),
        vec![remove("v-enter-active"), remove("v-enter-to")]
    );
    assert!(element.classes().is_empty());
    assert_eq!(element.display(), Some("block".to_string()));
    assert_eq!(h.directive.phase(element.key()), Some(PhaseState::Idle));
}

#[test]
fn leave_runs_full_class_sequence() {
    let h = Harness::new();
    let element = MockElement::new(1)
        .with_display("grid")
        .with_transition("0.1s", "0.2s");
    let signal = MockSignal::new(json!(true));
    let _cleanup = h.bind(&element, None, &signal);
    element.clear_ops();

    h.set(&signal, false);

    let ops: Vec<DomOp> = element
        .ops()
        .into_iter()
        .filter(|op| !matches!(op, DomOp::RemoveClass(_)))
        .collect();
    assert_eq!(
        ops,
        vec![add("v-leave-from"), DomOp::ForceLayout, add("v-leave-active")]
    );
    assert_eq!(h.directive.phase(element.key()), Some(PhaseState::Leaving));
    element.clear_ops();

    h.scheduler.run_frame();
    h.scheduler.run_frame();
    assert_eq!(
        element.ops(),
        vec![remove("v-leave-from"), add("v-leave-to")]
    );
    assert_eq!(element.display(), Some("grid".to_string()));
    element.clear_ops();

    // No event fires; the fallback resolves just past delay + duration
    h.scheduler.advance(300.0);
    assert!(element.ops().is_empty());
    h.scheduler.advance(1.0);
    assert_eq!(
        element.ops(),
        vec![
            remove("v-leave-active"),
            remove("v-leave-to"),
            display("none"),
        ]
    );
    assert!(element.classes().is_empty());
}

#[test]
fn auxiliary_arguments_shape_the_transition() {
    let h = Harness::new();
    let element = MockElement::new(1).with_transition("0s", "10s");
    let name = MockSignal::new(json!("fade slide"));
    let duration = MockSignal::new(json!([300, 500]));
    let visible = MockSignal::new(json!(true));

    let _cleanup = h.bind(&element, Some("name"), &name);
    let _cleanup = h.bind(&element, Some("duration"), &duration);
    let _cleanup = h.bind(&element, None, &visible);

    let state = h.directive.state(element.key()).unwrap();
    assert_eq!(state.duration, Some(DurationPair::new(300.0, 500.0)));

    h.set(&visible, false);
    assert!(element.has_class("fade-leave-from"));
    assert!(element.has_class("slide-leave-active"));

    h.scheduler.run_frame();
    h.scheduler.run_frame();
    assert!(element.has_class("fade-leave-to"));
    assert!(element.has_class("slide-leave-to"));

    // Leave uses the second duration and ignores the 10s computed style
    h.scheduler.advance(499.0);
    assert!(element.has_class("fade-leave-active"));
    h.scheduler.advance(1.0);
    assert!(element.classes().is_empty());
    assert_eq!(element.display(), Some("none".to_string()));
}

#[test]
fn scalar_duration_applies_to_both_directions() {
    let h = Harness::new();
    let element = MockElement::new(1);
    let visible = MockSignal::new(json!(false));
    let _cleanup = h.bind(&element, Some("duration"), &MockSignal::new(json!(200)));
    let _cleanup = h.bind(&element, None, &visible);

    h.set(&visible, true);
    h.scheduler.run_frame();
    h.scheduler.run_frame();
    h.scheduler.advance(199.0);
    assert!(element.has_class("v-enter-to"));
    h.scheduler.advance(1.0);
    assert!(element.classes().is_empty());
}

#[test]
fn rapid_toggles_leave_only_the_last_phase() {
    let h = Harness::new();
    let element = MockElement::new(1).with_transition("0s", "0.2s");
    let visible = MockSignal::new(json!(false));
    let _cleanup = h.bind(&element, None, &visible);

    h.set(&visible, true);
    h.scheduler.run_frame();
    h.set(&visible, false);
    h.scheduler.run_frame();
    h.scheduler.run_frame();
    h.set(&visible, true);

    assert!(element.classes().iter().all(|c| c.starts_with("v-enter-")));

    h.scheduler.run_frame();
    h.scheduler.run_frame();
    assert_eq!(
        element.classes(),
        vec!["v-enter-active".to_string(), "v-enter-to".to_string()]
    );

    // Stale listeners from the leave phase see the event too, but only the
    // live enter wait completes
    element.end_transition("opacity");
    h.scheduler.run_until_idle();

    assert!(element.classes().is_empty());
    assert_eq!(element.display(), Some(String::new()));

    let history = h.directive.history(element.key()).unwrap();
    assert_eq!(
        history.get_path(),
        vec![
            &PhaseState::Idle,
            &PhaseState::Entering,
            &PhaseState::Leaving,
            &PhaseState::Entering,
            &PhaseState::Idle,
        ]
    );
    let state = h.directive.state(element.key()).unwrap();
    assert_eq!(history.last().map(|c| c.completion), Some(state.pending_completion));
}

#[test]
fn completion_ids_increase_with_each_phase() {
    let h = Harness::new();
    let element = MockElement::new(1);
    let visible = MockSignal::new(json!(true));
    let _cleanup = h.bind(&element, None, &visible);

    let mut last = h.directive.state(element.key()).unwrap().pending_completion;
    for value in [false, true, false, true] {
        h.set(&visible, value);
        let id = h.directive.state(element.key()).unwrap().pending_completion;
        assert!(id > last);
        last = id;
    }
}

#[test]
fn unbind_discards_state_and_rebind_starts_fresh() {
    let h = Harness::new();
    let element = MockElement::new(1);
    let visible = MockSignal::new(json!(true));
    let cleanup = h.bind(&element, None, &visible);

    h.set(&visible, false);
    cleanup();
    assert!(h.directive.state(element.key()).is_none());
    assert_eq!(h.directive.bound_count(), 0);

    // Pending frames and timers of the torn-down phase are harmless
    h.scheduler.run_until_idle();
    assert!(h.directive.state(element.key()).is_none());
    assert!(element.has_class("v-leave-from"));

    // A fresh binding mounts without a transition
    let fresh = Harness::new();
    let element = MockElement::new(2);
    let visible = MockSignal::new(json!(true));
    let _cleanup = fresh.bind(&element, None, &visible);
    let state = fresh.directive.state(element.key()).unwrap();
    assert!(state.mounted);
    assert_eq!(state.name, "v");
    assert!(state.duration.is_none());
    assert!(element.classes().is_empty());
}

#[test]
fn options_seed_every_element() {
    let options = TransitionOptions::default().name("pop").duration(50.0, 80.0);
    let h = Harness::with_options(options);
    let first = MockElement::new(1);
    let second = MockElement::new(2);
    let a = MockSignal::new(json!(false));
    let b = MockSignal::new(json!(true));
    let _cleanup = h.bind(&first, None, &a);
    let _cleanup = h.bind(&second, Some("name"), &MockSignal::new(json!("zoom")));
    let _cleanup = h.bind(&second, None, &b);

    a.set(json!(true));
    b.set(json!(false));
    h.scope.trigger();

    assert!(first.has_class("pop-enter-from"));
    assert!(second.has_class("zoom-leave-active"));

    h.scheduler.run_frame();
    h.scheduler.run_frame();
    h.scheduler.advance(50.0);
    assert!(first.classes().is_empty());
    assert!(second.has_class("zoom-leave-to"));
    h.scheduler.advance(30.0);
    assert!(second.classes().is_empty());
    assert_eq!(second.display(), Some("none".to_string()));
}

#[test]
fn truthy_values_drive_visibility() {
    let h = Harness::new();
    let element = MockElement::new(1);
    let visible = MockSignal::new(json!(0));
    let _cleanup = h.bind(&element, None, &visible);
    assert_eq!(element.display(), Some("none".to_string()));

    visible.set(json!("shown"));
    h.scope.trigger();
    assert_eq!(h.directive.phase(element.key()), Some(PhaseState::Entering));

    visible.set(json!(null));
    h.scope.trigger();
    assert_eq!(h.directive.phase(element.key()), Some(PhaseState::Leaving));
}
