use noga_api::types::FlatRecord;
use noga_api::{flatten, Error};
use serde_json::{json, Value};

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn day_entries() -> Value {
    json!([
        {
            "date": "01-01-2024",
            "data": [
                {"hour": "00:00", "mw": 100},
                {"hour": "00:30", "mw": 110}
            ]
        },
        {
            "date": "02-01-2024",
            "data": [
                {"hour": "00:00", "mw": 120}
            ]
        }
    ])
}

fn row_dates(records: &[FlatRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.get("date").and_then(Value::as_str).unwrap().to_string())
        .collect()
}

#[test]
fn shape_detection_is_transparent_to_output() {
    let bare = flatten(day_entries(), &keys(&["data"])).unwrap();
    let energy = flatten(json!({"energy": day_entries()}), &keys(&["data"])).unwrap();
    let demand = flatten(json!({"demand": day_entries()}), &keys(&["data"])).unwrap();

    assert_eq!(bare, energy);
    assert_eq!(bare, demand);
}

#[test]
fn record_count_equals_sum_of_interval_counts() {
    let records = flatten(day_entries(), &keys(&["data"])).unwrap();
    assert_eq!(records.len(), 3);
}

#[test]
fn order_follows_day_then_interval_order() {
    let records = flatten(day_entries(), &keys(&["data"])).unwrap();
    assert_eq!(
        row_dates(&records),
        vec!["01-01-2024", "01-01-2024", "02-01-2024"]
    );
    let hours: Vec<&str> = records
        .iter()
        .map(|r| r.get("hour").and_then(Value::as_str).unwrap())
        .collect();
    assert_eq!(hours, vec!["00:00", "00:30", "00:00"]);
}

#[test]
fn day_date_overrides_interval_date_field() {
    let raw = json!([
        {
            "date": "01-01-2024",
            "data": [
                {"date": "31-12-1999", "mw": 50}
            ]
        }
    ]);
    let records = flatten(raw, &keys(&["data"])).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].get("date").and_then(Value::as_str),
        Some("01-01-2024")
    );
    // The date stays the first column even when the interval carried one.
    let first_field = records[0].fields().next().unwrap().0;
    assert_eq!(first_field, "date");
}

#[test]
fn unrecognized_shape_is_a_schema_error() {
    let raw = json!({"somethingElse": []});
    let err = flatten(raw, &keys(&["data"])).unwrap_err();
    assert!(matches!(err, Error::Schema(_)));
    assert!(err.to_string().contains("unexpected response structure"));

    let scalar = json!(42);
    assert!(matches!(
        flatten(scalar, &keys(&["data"])),
        Err(Error::Schema(_))
    ));
}

#[test]
fn production_mix_scenario_flattens_exactly() {
    let raw = json!({
        "energy": [
            {
                "date": "01-01-2024",
                "productionMixData": [
                    {"hour": "00:00", "coal": 10},
                    {"hour": "00:05", "coal": 12}
                ]
            }
        ]
    });
    let records = flatten(raw, &keys(&["productionMixData", "data"])).unwrap();
    assert_eq!(records.len(), 2);

    assert_eq!(
        records[0].get("date").and_then(Value::as_str),
        Some("01-01-2024")
    );
    assert_eq!(records[0].get("hour").and_then(Value::as_str), Some("00:00"));
    assert_eq!(records[0].get("coal"), Some(&json!(10)));
    assert_eq!(records[1].get("hour").and_then(Value::as_str), Some("00:05"));
    assert_eq!(records[1].get("coal"), Some(&json!(12)));
}

#[test]
fn bare_empty_array_yields_no_records() {
    let records = flatten(json!([]), &keys(&["data"])).unwrap();
    assert!(records.is_empty());
}

#[test]
fn keyed_wrapper_holding_null_yields_no_records() {
    let records = flatten(json!({"energy": null}), &keys(&["data"])).unwrap();
    assert!(records.is_empty());
}

#[test]
fn day_without_interval_key_contributes_zero_but_does_not_abort() {
    let raw = json!([
        {"date": "01-01-2024"},
        {
            "date": "02-01-2024",
            "data": [{"mw": 1}]
        }
    ]);
    let records = flatten(raw, &keys(&["data"])).unwrap();
    assert_eq!(row_dates(&records), vec!["02-01-2024"]);
}

#[test]
fn missing_day_date_becomes_null_not_an_error() {
    let raw = json!([
        {"data": [{"mw": 7}]}
    ]);
    let records = flatten(raw, &keys(&["data"])).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("date"), Some(&Value::Null));
    assert_eq!(records[0].get("mw"), Some(&json!(7)));
}

#[test]
fn dataset_key_takes_priority_over_generic_data_key() {
    let raw = json!([
        {
            "date": "01-01-2024",
            "demandData": [{"mw": 1}],
            "data": [{"mw": 999}]
        }
    ]);
    let records = flatten(raw, &keys(&["demandData", "data"])).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("mw"), Some(&json!(1)));
}

#[test]
fn malformed_entries_are_tolerated() {
    let raw = json!([
        "not an object",
        {
            "date": "01-01-2024",
            "data": [{"mw": 1}, "junk", {"mw": 2}]
        }
    ]);
    let records = flatten(raw, &keys(&["data"])).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("mw"), Some(&json!(1)));
    assert_eq!(records[1].get("mw"), Some(&json!(2)));
}

#[test]
fn unknown_fields_pass_through_in_order() {
    let raw = json!([
        {
            "date": "01-01-2024",
            "data": [
                {"hour": "00:00", "solar": 5, "windTurbines": 3, "note": "ok"}
            ]
        }
    ]);
    let records = flatten(raw, &keys(&["data"])).unwrap();
    let names: Vec<&str> = records[0].fields().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["date", "hour", "solar", "windTurbines", "note"]);
}
