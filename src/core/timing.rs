//! Timeout prediction from computed transition style.
//!
//! Computed style reports `transition-delay` and `transition-duration` as
//! comma-separated lists such as `"0s, 0.1s"`. The predicted end of the
//! transition is the latest `delay + duration` over all listed properties.

use serde::{Deserialize, Serialize};

/// Raw computed transition style of an element.
///
/// Fields hold the CSS list strings exactly as the host reports them.
/// Hosts without style computation leave them empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputedTransition {
    pub delay: String,
    pub duration: String,
    pub property: String,
}

impl ComputedTransition {
    pub fn new(delay: impl Into<String>, duration: impl Into<String>) -> Self {
        Self {
            delay: delay.into(),
            duration: duration.into(),
            property: String::new(),
        }
    }

    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = property.into();
        self
    }
}

/// What the completion detector needs to know about a running transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionInfo {
    /// Predicted total time in milliseconds until every property has ended
    pub timeout: f64,
    /// Number of transition-end events to wait for
    pub prop_count: usize,
    /// Whether `transform` (or `all`) is among the transitioned properties
    pub has_transform: bool,
}

/// Parse a single CSS time value into milliseconds.
///
/// Accepts `s` and `ms` suffixes. Some engines format computed values with
/// a locale comma as decimal separator, so `"0,3s"` is read as `0.3s`.
/// Anything unparseable counts as zero.
///
/// # Example
///
/// ```rust
/// use toggle_transition::core::parse_ms;
///
/// assert_eq!(parse_ms("0.3s"), 300.0);
/// assert_eq!(parse_ms("0,3s"), 300.0);
/// assert_eq!(parse_ms("150ms"), 150.0);
/// ```
pub fn parse_ms(value: &str) -> f64 {
    let value = value.trim().replace(',', ".");
    let (number, scale) = if let Some(ms) = value.strip_suffix("ms") {
        (ms, 1.0)
    } else if let Some(s) = value.strip_suffix('s') {
        (s, 1000.0)
    } else {
        (value.as_str(), 1000.0)
    };

    match number.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n * scale,
        _ => 0.0,
    }
}

/// Split a computed CSS time list into milliseconds.
pub fn parse_list(list: &str) -> Vec<f64> {
    if list.trim().is_empty() {
        return Vec::new();
    }

    // A comma between two digits is a locale decimal point, any other comma
    // separates list items.
    let chars: Vec<char> = list.chars().collect();
    let mut items = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        let decimal = c == ','
            && i > 0
            && chars[i - 1].is_ascii_digit()
            && chars.get(i + 1).is_some_and(char::is_ascii_digit);
        if c == ',' && !decimal {
            items.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    items.push(current);

    items.iter().map(|item| parse_ms(item)).collect()
}

/// Latest end time over all properties.
///
/// The shorter list is cycled to the length of the longer one, matching
/// how CSS repeats list values across transitioned properties.
pub fn get_timeout(delays: &[f64], durations: &[f64]) -> f64 {
    let len = delays.len().max(durations.len());
    (0..len)
        .map(|i| {
            let delay = cycled(delays, i);
            let duration = cycled(durations, i);
            delay + duration
        })
        .fold(0.0, f64::max)
}

fn cycled(values: &[f64], index: usize) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values[index % values.len()]
    }
}

/// Inspect computed style and predict when the transition ends.
///
/// A non-positive prediction forces `prop_count` to zero so the detector
/// never waits for events that will not fire.
pub fn transition_info(style: &ComputedTransition) -> TransitionInfo {
    let delays = parse_list(&style.delay);
    let durations = parse_list(&style.duration);
    let timeout = get_timeout(&delays, &durations);
    let prop_count = if timeout > 0.0 { durations.len() } else { 0 };

    TransitionInfo {
        timeout,
        prop_count,
        has_transform: has_transform(&style.property),
    }
}

fn has_transform(property: &str) -> bool {
    property
        .split(',')
        .map(str::trim)
        .any(|p| p == "transform" || p == "all")
}
