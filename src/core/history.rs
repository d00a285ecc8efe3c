//! Phase change history.
//!
//! Keeps the most recent phase changes of an element for diagnostics.
//! The history is bounded so a long-lived element toggled many times does
//! not grow without limit.

use super::state::{CompletionId, PhaseState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of phase changes retained per element.
pub const HISTORY_LIMIT: usize = 32;

/// Record of a single phase change.
///
/// # Example
///
/// ```rust
/// use toggle_transition::core::{PhaseChange, PhaseState};
/// use chrono::Utc;
///
/// let change = PhaseChange {
///     from: PhaseState::Idle,
///     to: PhaseState::Entering,
///     completion: 7,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(change.to.name(), "Entering");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseChange {
    pub from: PhaseState,
    pub to: PhaseState,
    /// Completion id live after the change
    pub completion: CompletionId,
    pub timestamp: DateTime<Utc>,
}

/// Ordered, bounded history of phase changes.
///
/// `record` returns a new history and leaves the original untouched.
///
/// # Example
///
/// ```rust
/// use toggle_transition::core::{PhaseChange, PhaseHistory, PhaseState};
/// use chrono::Utc;
///
/// let history = PhaseHistory::new();
/// let history = history.record(PhaseChange {
///     from: PhaseState::Idle,
///     to: PhaseState::Leaving,
///     completion: 1,
///     timestamp: Utc::now(),
/// });
/// let history = history.record(PhaseChange {
///     from: PhaseState::Leaving,
///     to: PhaseState::Idle,
///     completion: 1,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(
///     history.get_path(),
///     vec![&PhaseState::Idle, &PhaseState::Leaving, &PhaseState::Idle]
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseHistory {
    changes: VecDeque<PhaseChange>,
}

impl PhaseHistory {
    pub fn new() -> Self {
        Self {
            changes: VecDeque::new(),
        }
    }

    /// Record a change, returning a new history.
    ///
    /// The oldest change is dropped once [`HISTORY_LIMIT`] is reached.
    pub fn record(&self, change: PhaseChange) -> Self {
        let mut changes = self.changes.clone();
        if changes.len() == HISTORY_LIMIT {
            changes.pop_front();
        }
        changes.push_back(change);
        Self { changes }
    }

    pub fn changes(&self) -> impl Iterator<Item = &PhaseChange> {
        self.changes.iter()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn last(&self) -> Option<&PhaseChange> {
        self.changes.back()
    }

    /// States traversed: the first `from`, then every `to`.
    pub fn get_path(&self) -> Vec<&PhaseState> {
        let mut path = Vec::new();
        if let Some(first) = self.changes.front() {
            path.push(&first.from);
        }
        for change in &self.changes {
            path.push(&change.to);
        }
        path
    }
}
