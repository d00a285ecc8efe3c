//! Pure transition logic.
//!
//! This module contains everything that does not touch the host:
//! - Class name derivation for each direction and stage
//! - Timeout prediction from computed transition style
//! - The per-element state record and its bounded phase history

mod history;
mod phase;
mod state;
mod timing;

pub use history::{PhaseChange, PhaseHistory, HISTORY_LIMIT};
pub use phase::{class_names, Direction, Stage, DEFAULT_NAME};
pub use state::{CompletionId, DurationPair, ElementTransitionState, PhaseState};
pub use timing::{
    get_timeout, parse_list, parse_ms, transition_info, ComputedTransition, TransitionInfo,
};
