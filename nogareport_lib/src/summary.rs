//! Combined daily summary workbook, one tab per dataset.
//!
//! Reads the "Most Recent Day" sheet back out of each dataset workbook and
//! collects them into a single file suitable for one small attachment.

use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use chrono::NaiveDate;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::dataset::DatasetSpec;
use crate::error::ReportError;
use crate::workbook::RECENT_SHEET;

/// File name of the combined report for a given run date.
pub fn summary_file_name(today: NaiveDate) -> String {
    format!("noga_daily_report_{}.xlsx", today.format("%Y-%m-%d"))
}

/// Builds the combined workbook from whichever dataset workbooks exist in
/// `output_dir`. Unreadable or missing sources are skipped with a log line;
/// returns `None` when no source contributed a tab.
pub fn build_summary(
    output_dir: &Path,
    datasets: &[DatasetSpec],
    today: NaiveDate,
) -> Result<Option<PathBuf>, ReportError> {
    let mut workbook = Workbook::new();
    let mut tabs = 0;

    for spec in datasets {
        let source = output_dir.join(&spec.workbook_name);
        let range = match read_recent_sheet(&source) {
            Ok(range) => range,
            Err(err) => {
                tracing::warn!(dataset = %spec.key, source = %source.display(), error = %err,
                    "skipping dataset in daily summary");
                continue;
            }
        };
        let sheet = workbook.add_worksheet();
        sheet.set_name(&spec.title)?;
        copy_range(sheet, &range)?;
        tabs += 1;
        tracing::info!(dataset = %spec.key, rows = range.height(), "added summary tab");
    }

    if tabs == 0 {
        return Ok(None);
    }

    let path = output_dir.join(summary_file_name(today));
    workbook.save(&path)?;
    Ok(Some(path))
}

fn read_recent_sheet(path: &Path) -> Result<Range<Data>, ReportError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    Ok(workbook.worksheet_range(RECENT_SHEET)?)
}

fn copy_range(sheet: &mut Worksheet, range: &Range<Data>) -> Result<(), ReportError> {
    for (row_idx, row) in range.rows().enumerate() {
        let row_idx = row_idx as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let col_idx = col_idx as u16;
            match cell {
                Data::Empty => {}
                Data::String(s) => {
                    sheet.write_string(row_idx, col_idx, s)?;
                }
                Data::Float(f) => {
                    sheet.write_number(row_idx, col_idx, *f)?;
                }
                Data::Int(i) => {
                    sheet.write_number(row_idx, col_idx, *i as f64)?;
                }
                Data::Bool(b) => {
                    sheet.write_boolean(row_idx, col_idx, *b)?;
                }
                other => {
                    sheet.write_string(row_idx, col_idx, other.to_string())?;
                }
            }
        }
    }
    Ok(())
}
