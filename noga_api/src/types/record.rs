//! Flat output rows produced by the normalizer.

use serde::Serialize;
use serde_json::{Map, Value};

/// One output row: the enclosing day entry's date merged with the fields of
/// one interval record.
///
/// Fields are an insertion-ordered map rather than a fixed schema. Upstream
/// adds and drops columns without notice, so unknown fields pass through
/// unchanged and absent ones stay absent instead of failing the row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatRecord(Map<String, Value>);

impl FlatRecord {
    /// Builds a row from a day's date and one interval record. The date
    /// occupies the first column and wins over any `date` field the interval
    /// record itself carries.
    pub fn merge(date: Option<&str>, interval: &Map<String, Value>) -> Self {
        let mut fields = Map::new();
        fields.insert(
            "date".to_string(),
            date.map_or(Value::Null, |d| Value::String(d.to_string())),
        );
        for (key, value) in interval {
            if key == "date" {
                continue;
            }
            fields.insert(key.clone(), value.clone());
        }
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Field names and values in column order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
