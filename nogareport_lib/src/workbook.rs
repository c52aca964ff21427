//! Workbook output with insertion-order column inference.
//!
//! Sheets carry no declared schema: the columns are whatever fields the
//! records happen to have, in first-seen order across the whole sequence.
//! Rows keep the record order the normalizer produced.

use std::path::Path;

use chrono::NaiveDate;
use rust_xlsxwriter::{Workbook, Worksheet};
use serde_json::Value;

use noga_api::types::FlatRecord;

use crate::error::ReportError;

/// Sheet holding the single most recent complete day.
pub const RECENT_SHEET: &str = "Most Recent Day";

/// Sheet name for the history slice, labeled by the earliest covered date,
/// e.g. `Since 2023-02-22`.
pub fn history_sheet_name(start: NaiveDate) -> String {
    format!("Since {}", start.format("%Y-%m-%d"))
}

/// Writes the recent and history slices as the two sheets of one workbook.
pub fn write_dataset_workbook(
    path: &Path,
    recent: &[FlatRecord],
    history: &[FlatRecord],
    history_start: NaiveDate,
) -> Result<(), ReportError> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name(RECENT_SHEET)?;
    write_records(sheet, recent)?;

    let sheet = workbook.add_worksheet();
    sheet.set_name(&history_sheet_name(history_start))?;
    write_records(sheet, history)?;

    workbook.save(path)?;
    Ok(())
}

/// Header row plus one row per record. Cells missing a column stay blank.
pub fn write_records(sheet: &mut Worksheet, records: &[FlatRecord]) -> Result<(), ReportError> {
    let columns = infer_columns(records);
    for (col, name) in columns.iter().enumerate() {
        sheet.write_string(0, col as u16, name)?;
    }
    for (row, record) in records.iter().enumerate() {
        let row = row as u32 + 1;
        for (col, name) in columns.iter().enumerate() {
            write_cell(sheet, row, col as u16, record.get(name))?;
        }
    }
    Ok(())
}

// First-seen field order across the record sequence. Records appearing
// later may introduce columns; they append after everything already seen.
fn infer_columns(records: &[FlatRecord]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for (name, _) in record.fields() {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.to_string());
            }
        }
    }
    columns
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<&Value>,
) -> Result<(), ReportError> {
    match value {
        None | Some(Value::Null) => {}
        Some(Value::String(s)) => {
            sheet.write_string(row, col, s)?;
        }
        Some(Value::Number(n)) => {
            if let Some(f) = n.as_f64() {
                sheet.write_number(row, col, f)?;
            }
        }
        Some(Value::Bool(b)) => {
            sheet.write_boolean(row, col, *b)?;
        }
        // Nested structures are not expected from the gateway; keep their
        // JSON text rather than dropping them.
        Some(other) => {
            sheet.write_string(row, col, other.to_string())?;
        }
    }
    Ok(())
}
