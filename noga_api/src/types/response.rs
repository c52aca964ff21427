//! Recognized top-level shapes of gateway responses.

use serde_json::{Map, Value};

use crate::Error;

/// The documented top-level shapes a dataset response can take.
///
/// The gateway is not consistent across datasets: production mix and CO2
/// wrap their day entries in an object under an `energy` key, demand uses a
/// `demand` key, and some endpoints return the day-entry array bare. New
/// wrappers get a new variant here and one more arm in [`detect`].
///
/// [`detect`]: ResponseShape::detect
#[derive(Debug)]
pub enum ResponseShape {
    /// Object with an `energy` key holding the day entries.
    Energy(Vec<Value>),
    /// Object with a `demand` key holding the day entries.
    Demand(Vec<Value>),
    /// A bare array of day entries with no wrapping object.
    Bare(Vec<Value>),
}

impl ResponseShape {
    /// Classifies a decoded response, checking wrappers in priority order:
    /// `energy`, then `demand`, then a bare array.
    pub fn detect(raw: Value) -> Result<Self, Error> {
        match raw {
            Value::Object(mut map) => {
                if let Some(value) = map.remove("energy") {
                    Ok(Self::Energy(entries_of(value)))
                } else if let Some(value) = map.remove("demand") {
                    Ok(Self::Demand(entries_of(value)))
                } else {
                    Err(Error::Schema("unexpected response structure".to_string()))
                }
            }
            Value::Array(entries) => Ok(Self::Bare(entries)),
            _ => Err(Error::Schema("unexpected response structure".to_string())),
        }
    }

    /// The day entries, regardless of which wrapper carried them.
    pub fn into_day_entries(self) -> Vec<Value> {
        match self {
            Self::Energy(entries) | Self::Demand(entries) | Self::Bare(entries) => entries,
        }
    }
}

// A keyed wrapper may hold `null` instead of an array on empty days; both
// normalize to no entries.
fn entries_of(value: Value) -> Vec<Value> {
    match value {
        Value::Array(entries) => entries,
        _ => Vec::new(),
    }
}

/// One date-keyed bucket of interval records inside a response.
pub struct DayEntry(Map<String, Value>);

impl DayEntry {
    /// Wraps an entry if it is an object. Non-object entries carry nothing
    /// usable and are skipped by the normalizer.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// The entry's `date` field, when present and textual.
    pub fn date(&self) -> Option<&str> {
        self.0.get("date").and_then(Value::as_str)
    }

    /// The interval records under the first candidate key holding an array.
    /// No such key means an empty day, not an error.
    pub fn interval_records(&self, candidates: &[String]) -> &[Value] {
        candidates
            .iter()
            .find_map(|key| self.0.get(key).and_then(Value::as_array))
            .map_or(&[], Vec::as_slice)
    }
}
