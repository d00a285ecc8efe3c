//! Transition directions, class stages and class name derivation.
//!
//! Every class the controller touches is derived here as
//! `"{name}-{direction}-{stage}"`, one class per whitespace-separated
//! token of the transition name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name used when no `name` argument is bound.
pub const DEFAULT_NAME: &str = "v";

/// One direction of a transition.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Becoming visible
    Enter,
    /// Becoming hidden
    Leave,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enter => "enter",
            Self::Leave => "leave",
        }
    }

    /// The direction a new phase cancels when it starts.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Enter => Self::Leave,
            Self::Leave => Self::Enter,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three class states applied in sequence during a phase.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Stage {
    From,
    Active,
    To,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::From, Stage::Active, Stage::To];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::From => "from",
            Self::Active => "active",
            Self::To => "to",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive the class tokens for `direction`/`stage` under a transition name.
///
/// Each whitespace-separated token of `name` yields its own class, so a
/// name of `"fade slide"` produces `fade-enter-from` and `slide-enter-from`.
/// A blank name falls back to [`DEFAULT_NAME`].
///
/// # Example
///
/// ```rust
/// use toggle_transition::core::{class_names, Direction, Stage};
///
/// assert_eq!(class_names("v", Direction::Enter, Stage::From), vec!["v-enter-from"]);
/// assert_eq!(
///     class_names("fade slide", Direction::Leave, Stage::To),
///     vec!["fade-leave-to", "slide-leave-to"]
/// );
/// ```
pub fn class_names(name: &str, direction: Direction, stage: Stage) -> Vec<String> {
    let mut tokens: Vec<&str> = name.split_whitespace().collect();
    if tokens.is_empty() {
        tokens.push(DEFAULT_NAME);
    }
    tokens
        .into_iter()
        .map(|token| format!("{token}-{direction}-{stage}"))
        .collect()
}
