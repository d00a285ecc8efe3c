//! Side-table of per-element transition state.
//!
//! State lives here keyed by element identity instead of on the element
//! itself. Removing an entry is how unbinding discards an element's state.

use crate::core::{CompletionId, ElementTransitionState};
use crate::host::ElementKey;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_COMPLETION_ID: AtomicU64 = AtomicU64::new(1);

/// Allocate the next completion id.
///
/// The counter is shared by every controller in the process and only ever
/// increases, so a newer id never equals an older one.
pub fn next_completion_id() -> CompletionId {
    NEXT_COMPLETION_ID.fetch_add(1, Ordering::Relaxed)
}

/// Map from element to its transition state.
#[derive(Default)]
pub struct Registry {
    states: RefCell<HashMap<ElementKey, ElementTransitionState>>,
}

impl Registry {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Create state for `key` unless it already exists.
    pub fn ensure<F>(&self, key: ElementKey, init: F)
    where
        F: FnOnce() -> ElementTransitionState,
    {
        self.states.borrow_mut().entry(key).or_insert_with(init);
    }

    pub fn len(&self) -> usize {
        self.states.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.borrow().is_empty()
    }

    /// Read the state of `key`. The closure must not re-enter the registry.
    pub fn with<R, F>(&self, key: ElementKey, f: F) -> Option<R>
    where
        F: FnOnce(&ElementTransitionState) -> R,
    {
        self.states.borrow().get(&key).map(f)
    }

    /// Mutate the state of `key`. The closure must not re-enter the registry.
    pub fn with_mut<R, F>(&self, key: ElementKey, f: F) -> Option<R>
    where
        F: FnOnce(&mut ElementTransitionState) -> R,
    {
        self.states.borrow_mut().get_mut(&key).map(f)
    }

    pub fn snapshot(&self, key: ElementKey) -> Option<ElementTransitionState> {
        self.with(key, Clone::clone)
    }

    pub fn remove(&self, key: ElementKey) -> Option<ElementTransitionState> {
        self.states.borrow_mut().remove(&key)
    }

    /// Start a new completion wait for `key`, invalidating any older one.
    ///
    /// Returns `None` when the element has no state (it was unbound).
    pub fn begin_completion(&self, key: ElementKey) -> Option<CompletionId> {
        self.with_mut(key, |state| {
            let id = next_completion_id();
            state.pending_completion = id;
            id
        })
    }

    /// Whether `id` is still the live completion id of `key`.
    pub fn is_live(&self, key: ElementKey, id: CompletionId) -> bool {
        self.with(key, |state| state.pending_completion == id)
            .unwrap_or(false)
    }
}
