//! Argument store for auxiliary directive bindings.
//!
//! Besides the primary visibility binding, an element may carry bindings
//! with an argument name: `name` sets the class prefix and `duration` sets
//! explicit enter/leave durations. These run before the visibility effect
//! reads them, so they only record values on the element's state.
//!
//! Duration decoding uses `Validation` so every invalid component of a
//! value is reported at once instead of stopping at the first.

pub mod error;

pub use error::ArgumentError;

use crate::core::{DurationPair, ElementTransitionState, DEFAULT_NAME};
use serde_json::Value;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Argument names the directive recognizes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ArgumentName {
    Name,
    Duration,
    /// The primary visibility binding
    Show,
}

impl ArgumentName {
    /// Classify a binding's argument.
    ///
    /// Missing and unrecognized arguments are treated as the primary
    /// visibility binding.
    ///
    /// # Example
    ///
    /// ```rust
    /// use toggle_transition::args::ArgumentName;
    ///
    /// assert_eq!(ArgumentName::parse(Some("name")), ArgumentName::Name);
    /// assert_eq!(ArgumentName::parse(Some("duration")), ArgumentName::Duration);
    /// assert_eq!(ArgumentName::parse(None), ArgumentName::Show);
    /// assert_eq!(ArgumentName::parse(Some("speed")), ArgumentName::Show);
    /// ```
    pub fn parse(arg: Option<&str>) -> Self {
        match arg {
            Some("name") => Self::Name,
            Some("duration") => Self::Duration,
            _ => Self::Show,
        }
    }

    pub fn is_auxiliary(&self) -> bool {
        !matches!(self, Self::Show)
    }
}

/// Record an auxiliary argument value on an element's state.
///
/// A rejected value leaves the previous value in place and returns every
/// problem found with it. Binding [`ArgumentName::Show`] does nothing; the
/// visibility binding is handled by the controller.
pub fn bind(
    state: &mut ElementTransitionState,
    arg: ArgumentName,
    value: &Value,
) -> Result<(), Vec<ArgumentError>> {
    match arg {
        ArgumentName::Name => {
            state.name = decode_name(value).map_err(|e| vec![e])?;
        }
        ArgumentName::Duration => match decode_duration(value) {
            Validation::Success(pair) => state.duration = Some(pair),
            Validation::Failure(errors) => return Err(errors.iter().cloned().collect()),
        },
        ArgumentName::Show => {}
    }
    Ok(())
}

/// Decode a `name` value. Null or blank resets to the default prefix.
pub fn decode_name(value: &Value) -> Result<String, ArgumentError> {
    match value {
        Value::Null => Ok(DEFAULT_NAME.to_string()),
        Value::String(name) if name.trim().is_empty() => Ok(DEFAULT_NAME.to_string()),
        Value::String(name) => Ok(name.trim().to_string()),
        other => Err(ArgumentError::InvalidName {
            found: other.to_string(),
        }),
    }
}

/// Decode a `duration` value into an enter/leave pair.
///
/// A scalar applies to both directions; a two-element array is taken as
/// `[enter, leave]`. Components may be numbers or numeric strings.
///
/// # Example
///
/// ```rust
/// use toggle_transition::args::decode_duration;
/// use toggle_transition::core::DurationPair;
/// use serde_json::json;
/// use stillwater::validation::Validation;
///
/// match decode_duration(&json!(500)) {
///     Validation::Success(pair) => assert_eq!(pair, DurationPair::new(500.0, 500.0)),
///     Validation::Failure(_) => panic!("scalar duration should decode"),
/// }
/// ```
pub fn decode_duration(value: &Value) -> Validation<DurationPair, NonEmptyVec<ArgumentError>> {
    match value {
        Value::Array(items) if items.len() == 2 => {
            let components = vec![
                decode_component("enter", &items[0]),
                decode_component("leave", &items[1]),
            ];
            Validation::all_vec(components).map(|ms| DurationPair::new(ms[0], ms[1]))
        }
        Value::Number(_) | Value::String(_) => {
            decode_component("enter", value).map(DurationPair::uniform)
        }
        other => Validation::fail(ArgumentError::InvalidDurationShape {
            found: other.to_string(),
        }),
    }
}

fn decode_component(direction: &str, value: &Value) -> Validation<f64, NonEmptyVec<ArgumentError>> {
    let ms = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match ms {
        Some(ms) if ms.is_finite() && ms >= 0.0 => Validation::success(ms),
        _ => Validation::fail(ArgumentError::InvalidDurationValue {
            direction: direction.to_string(),
            found: value.to_string(),
        }),
    }
}
