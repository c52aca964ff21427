//! Flattening of raw gateway responses into uniform row sequences.

use serde_json::Value;

use crate::types::{DayEntry, FlatRecord, ResponseShape};
use crate::Error;

/// Flattens one decoded response into ordered rows.
///
/// `interval_keys` is the ordered list of field names that may hold a day
/// entry's interval records (e.g. `productionMixData`, then the generic
/// `data`); the first key holding an array wins.
///
/// Row order follows the response: day entries in original order, and within
/// a day, interval records in original order. The row count always equals
/// the sum of the interval-record counts across all day entries.
pub fn flatten(raw: Value, interval_keys: &[String]) -> Result<Vec<FlatRecord>, Error> {
    let shape = ResponseShape::detect(raw)?;
    let mut records = Vec::new();
    for entry in shape.into_day_entries() {
        let Some(entry) = DayEntry::from_value(entry) else {
            tracing::warn!("skipping non-object day entry");
            continue;
        };
        for interval in entry.interval_records(interval_keys) {
            match interval {
                Value::Object(fields) => records.push(FlatRecord::merge(entry.date(), fields)),
                _ => tracing::warn!("skipping non-object interval record"),
            }
        }
    }
    Ok(records)
}
