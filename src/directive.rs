//! Directive binding contract.
//!
//! The host runtime calls [`TransitionDirective::bind`] once per binding on
//! an element. Bindings with a `name` or `duration` argument only record
//! their value; the primary binding registers an effect that feeds the
//! visibility value to the element's controller on every change.

use crate::args::{self, ArgumentName};
use crate::config::TransitionOptions;
use crate::core::{ElementTransitionState, PhaseHistory, PhaseState};
use crate::effects::{Registry, TransitionController};
use crate::host::{EffectScope, Element, ElementKey, Scheduler};
use serde_json::Value;
use std::rc::Rc;
use tracing::{debug, warn};

/// Runs when the binding is torn down.
pub type Cleanup = Box<dyn FnOnce()>;

/// Getter for a binding's current value.
pub type ValueGetter = Rc<dyn Fn() -> Value>;

/// What the host supplies for a single binding.
pub struct DirectiveContext<'a> {
    pub element: Rc<dyn Element>,
    /// Argument name, e.g. `name` in `v-transition:name`
    pub arg: Option<&'a str>,
    pub get: ValueGetter,
    pub scope: &'a dyn EffectScope,
}

/// The transition directive, shared by every element it binds.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use toggle_transition::directive::{DirectiveContext, TransitionDirective};
/// use toggle_transition::host::mock::{MockElement, MockScheduler, MockScope, MockSignal};
///
/// let scheduler = MockScheduler::new();
/// let scope = MockScope::new();
/// let directive = TransitionDirective::new(scheduler.clone());
/// let element = MockElement::new(1);
/// let visible = MockSignal::new(json!(true));
///
/// let _cleanup = directive.bind(DirectiveContext {
///     element: element.clone(),
///     arg: None,
///     get: visible.getter(),
///     scope: &*scope,
/// });
///
/// visible.set(json!(false));
/// scope.trigger();
/// scheduler.run_until_idle();
/// assert_eq!(element.display(), Some("none".to_string()));
/// ```
#[derive(Clone)]
pub struct TransitionDirective {
    scheduler: Rc<dyn Scheduler>,
    registry: Rc<Registry>,
    options: TransitionOptions,
}

impl TransitionDirective {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self::with_options(scheduler, TransitionOptions::default())
    }

    pub fn with_options(scheduler: Rc<dyn Scheduler>, options: TransitionOptions) -> Self {
        Self {
            scheduler,
            registry: Registry::new(),
            options,
        }
    }

    pub fn options(&self) -> &TransitionOptions {
        &self.options
    }

    /// Bind the directive to an element.
    ///
    /// Auxiliary bindings return a no-op cleanup. The primary binding's
    /// cleanup discards all transition state of the element.
    pub fn bind(&self, ctx: DirectiveContext<'_>) -> Cleanup {
        let key = ctx.element.key();
        let arg = ArgumentName::parse(ctx.arg);

        if arg.is_auxiliary() {
            self.bind_argument(key, arg, &(ctx.get)());
            return Box::new(|| {});
        }

        let controller = TransitionController::new(
            ctx.element,
            Rc::clone(&self.scheduler),
            Rc::clone(&self.registry),
        );
        controller.attach(&self.options);
        debug!(element = %key, "Bound transition");

        let get = ctx.get;
        ctx.scope.effect(Box::new(move || {
            controller.on_visibility_change(is_truthy(&get()));
        }));

        let registry = Rc::clone(&self.registry);
        Box::new(move || {
            registry.remove(key);
            debug!(element = %key, "Unbound transition");
        })
    }

    fn bind_argument(&self, key: ElementKey, arg: ArgumentName, value: &Value) {
        self.registry.ensure(key, || self.options.initial_state());
        let outcome = self
            .registry
            .with_mut(key, |state| args::bind(state, arg, value));

        if let Some(Err(errors)) = outcome {
            for error in errors {
                warn!(element = %key, argument = ?arg, %error, "Ignoring transition argument");
            }
        }
    }

    /// Copy of the element's transition state, if it is bound.
    pub fn state(&self, key: ElementKey) -> Option<ElementTransitionState> {
        self.registry.snapshot(key)
    }

    pub fn phase(&self, key: ElementKey) -> Option<PhaseState> {
        self.registry.with(key, |state| state.phase)
    }

    pub fn history(&self, key: ElementKey) -> Option<PhaseHistory> {
        self.registry.with(key, |state| state.history.clone())
    }

    /// Number of elements currently carrying transition state.
    pub fn bound_count(&self) -> usize {
        self.registry.len()
    }
}

/// Script truthiness of a directive value.
///
/// `null`, `false`, `0` and `""` are falsy; everything else, including
/// empty arrays and objects, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
