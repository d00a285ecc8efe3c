//! Per-element transition state.
//!
//! One [`ElementTransitionState`] exists for every element bound to the
//! directive. It is owned by the registry side-table and mutated only by the
//! controller bound to that element.

use super::history::PhaseHistory;
use super::phase::{Direction, DEFAULT_NAME};
use serde::{Deserialize, Serialize};

/// Identifier of a completion wait.
///
/// Ids come from a process-wide monotonic counter. A completion fires only
/// while its id is still the live id of its element.
pub type CompletionId = u64;

/// What the element is doing right now.
///
/// Exactly one of these describes an element at any time.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum PhaseState {
    #[default]
    Idle,
    Entering,
    Leaving,
}

impl PhaseState {
    pub fn name(&self) -> &str {
        match self {
            Self::Idle => "Idle",
            Self::Entering => "Entering",
            Self::Leaving => "Leaving",
        }
    }

    /// Check whether a transition is in flight.
    pub fn is_animating(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    pub fn of(direction: Direction) -> Self {
        match direction {
            Direction::Enter => Self::Entering,
            Direction::Leave => Self::Leaving,
        }
    }
}

/// Explicit durations in milliseconds, one per direction.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct DurationPair {
    pub enter: f64,
    pub leave: f64,
}

impl DurationPair {
    pub fn new(enter: f64, leave: f64) -> Self {
        Self { enter, leave }
    }

    /// Same duration for both directions.
    pub fn uniform(ms: f64) -> Self {
        Self::new(ms, ms)
    }

    pub fn for_direction(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Enter => self.enter,
            Direction::Leave => self.leave,
        }
    }
}

/// Transition state attached to a single element.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ElementTransitionState {
    /// CSS class prefix, possibly several whitespace-separated tokens
    pub name: String,
    /// Explicit duration override; inferred from computed style when absent
    pub duration: Option<DurationPair>,
    /// Set after the first visibility evaluation
    pub mounted: bool,
    /// Live completion id; zero until the first phase starts
    pub pending_completion: CompletionId,
    /// Visibility requested by the most recent evaluation
    pub visible: bool,
    /// Inline `display` value the element had before the directive bound
    pub original_display: String,
    pub phase: PhaseState,
    pub history: PhaseHistory,
}

impl Default for ElementTransitionState {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            duration: None,
            mounted: false,
            pending_completion: 0,
            visible: false,
            original_display: String::new(),
            phase: PhaseState::Idle,
            history: PhaseHistory::new(),
        }
    }
}

impl ElementTransitionState {
    /// Explicit duration for a direction, if one was bound.
    pub fn explicit_duration(&self, direction: Direction) -> Option<f64> {
        self.duration.map(|pair| pair.for_direction(direction))
    }
}
