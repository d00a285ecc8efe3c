//! Directive-wide options.
//!
//! Options seed the state of every element the directive binds. Per-element
//! `name` and `duration` arguments override them.

use crate::args::decode_duration;
use crate::core::{DurationPair, ElementTransitionState, DEFAULT_NAME};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use stillwater::validation::Validation;
use thiserror::Error;
use tracing::warn;

/// Errors raised while loading options.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid transition options: {0}")]
    Parse(String),
}

/// Defaults applied to every newly bound element.
///
/// # Example
///
/// ```rust
/// use toggle_transition::config::TransitionOptions;
/// use toggle_transition::core::DurationPair;
///
/// let options = TransitionOptions::from_json(r#"{ "name": "fade", "duration": [150, 300] }"#).unwrap();
/// assert_eq!(options.name, "fade");
/// assert_eq!(options.duration, Some(DurationPair::new(150.0, 300.0)));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionOptions {
    pub name: String,
    #[serde(deserialize_with = "deserialize_duration")]
    pub duration: Option<DurationPair>,
}

impl Default for TransitionOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            duration: None,
        }
    }
}

impl TransitionOptions {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set explicit enter/leave durations in milliseconds.
    ///
    /// Negative or non-finite values are rejected with a warning and the
    /// previous duration is kept, as for the `duration` argument.
    pub fn duration(mut self, enter: f64, leave: f64) -> Self {
        let value = Value::Array(vec![Value::from(enter), Value::from(leave)]);
        match decode_duration(&value) {
            Validation::Success(pair) => self.duration = Some(pair),
            Validation::Failure(errors) => {
                for error in errors.iter() {
                    warn!(%error, "Ignoring default transition duration");
                }
            }
        }
        self
    }

    /// Fresh element state carrying these defaults.
    pub fn initial_state(&self) -> ElementTransitionState {
        let name = if self.name.trim().is_empty() {
            DEFAULT_NAME.to_string()
        } else {
            self.name.clone()
        };
        ElementTransitionState {
            name,
            duration: self.duration,
            ..ElementTransitionState::default()
        }
    }
}

// Accepts the same shapes as the `duration` argument, plus an explicit
// `{ "enter": .., "leave": .. }` object.
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Option<DurationPair>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let value = match value {
        Value::Null => return Ok(None),
        Value::Object(fields) => Value::Array(vec![
            fields.get("enter").cloned().unwrap_or(Value::Null),
            fields.get("leave").cloned().unwrap_or(Value::Null),
        ]),
        other => other,
    };
    match decode_duration(&value) {
        Validation::Success(pair) => Ok(Some(pair)),
        Validation::Failure(errors) => {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            Err(serde::de::Error::custom(messages.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let options = TransitionOptions::from_json("{}").unwrap();
        assert_eq!(options, TransitionOptions::default());
    }

    #[test]
    fn scalar_duration_applies_to_both_directions() {
        let options = TransitionOptions::from_json(r#"{ "duration": 400 }"#).unwrap();
        assert_eq!(options.duration, Some(DurationPair::uniform(400.0)));
    }

    #[test]
    fn object_duration_is_accepted() {
        let options =
            TransitionOptions::from_json(r#"{ "duration": { "enter": 100, "leave": 200 } }"#)
                .unwrap();
        assert_eq!(options.duration, Some(DurationPair::new(100.0, 200.0)));
    }

    #[test]
    fn invalid_duration_is_a_parse_error() {
        let result = TransitionOptions::from_json(r#"{ "duration": [1, -5] }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn invalid_object_duration_is_a_parse_error() {
        let negative =
            TransitionOptions::from_json(r#"{ "duration": { "enter": -5, "leave": 100 } }"#);
        assert!(matches!(negative, Err(ConfigError::Parse(msg)) if msg.contains("enter")));

        let missing = TransitionOptions::from_json(r#"{ "duration": { "enter": 5 } }"#);
        assert!(matches!(missing, Err(ConfigError::Parse(msg)) if msg.contains("leave")));
    }

    #[test]
    fn builder_keeps_previous_duration_on_invalid_values() {
        let options = TransitionOptions::default()
            .duration(100.0, 200.0)
            .duration(-1.0, 50.0)
            .duration(f64::NAN, 50.0);
        assert_eq!(options.duration, Some(DurationPair::new(100.0, 200.0)));

        assert!(TransitionOptions::default()
            .duration(f64::INFINITY, 0.0)
            .duration
            .is_none());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            TransitionOptions::from_json("{ name"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn initial_state_carries_options() {
        let state = TransitionOptions::default()
            .name("slide")
            .duration(120.0, 240.0)
            .initial_state();

        assert_eq!(state.name, "slide");
        assert_eq!(state.duration, Some(DurationPair::new(120.0, 240.0)));
        assert!(!state.mounted);
    }
}
