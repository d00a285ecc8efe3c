//! Argument decoding errors.

use thiserror::Error;

/// Reasons an auxiliary argument value is rejected.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ArgumentError {
    #[error("Transition name must be a string, got {found}")]
    InvalidName { found: String },

    #[error("Duration must be a number or an [enter, leave] pair, got {found}")]
    InvalidDurationShape { found: String },

    #[error("{direction} duration must be a finite non-negative number of milliseconds, got {found}")]
    InvalidDurationValue { direction: String, found: String },
}
