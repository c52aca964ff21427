//! Sequential per-dataset fetch, normalize, and persist orchestration.
//!
//! Datasets run one at a time and share nothing; a failure in one is
//! logged and never stops the others. Within a dataset the recent slice
//! runs to completion before the history slice begins, and the workbook is
//! written only when both slices succeeded — a dataset either delivers a
//! complete two-sheet file or nothing at all.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use noga_api::types::FlatRecord;
use noga_api::{flatten, Client, DateRange};

use crate::dataset::{DatasetKey, DatasetSpec};
use crate::error::ReportError;
use crate::workbook;

/// What one dataset produced during a run.
#[derive(Debug)]
pub struct DatasetOutcome {
    pub key: DatasetKey,
    /// Rows in the recent slice, when that fetch succeeded.
    pub recent_rows: Option<usize>,
    /// Rows in the history slice, when that fetch succeeded.
    pub history_rows: Option<usize>,
    /// The written workbook, present only when both slices succeeded.
    pub workbook: Option<PathBuf>,
}

impl DatasetOutcome {
    pub fn succeeded(&self) -> bool {
        self.workbook.is_some()
    }
}

/// Runs every dataset in order. One dataset's failure never aborts the rest.
pub async fn run_all(
    specs: &[DatasetSpec],
    output_dir: &Path,
    today: NaiveDate,
) -> Result<Vec<DatasetOutcome>, ReportError> {
    std::fs::create_dir_all(output_dir)?;
    let mut outcomes = Vec::with_capacity(specs.len());
    for spec in specs {
        outcomes.push(run_dataset(spec, output_dir, today).await);
    }
    Ok(outcomes)
}

/// Runs one dataset: recent slice, then history slice, then the workbook.
pub async fn run_dataset(spec: &DatasetSpec, output_dir: &Path, today: NaiveDate) -> DatasetOutcome {
    let mut outcome = DatasetOutcome {
        key: spec.key,
        recent_rows: None,
        history_rows: None,
        workbook: None,
    };

    let client = match Client::new(spec.subscription_key.clone()) {
        Ok(client) => client,
        Err(err) => {
            tracing::error!(dataset = %spec.key, error = %err, "could not build client");
            return outcome;
        }
    };

    let recent_range = DateRange::recent(today);
    tracing::info!(dataset = %spec.key, day = %recent_range.from_param(),
        "fetching most recent day");
    let recent = match fetch_range(&client, spec, &recent_range).await {
        Ok(records) => records,
        Err(err) => {
            tracing::error!(dataset = %spec.key, error = %err, "recent fetch failed");
            return outcome;
        }
    };
    outcome.recent_rows = Some(recent.len());

    let history_range = match DateRange::history(spec.history_start, today) {
        Ok(range) => range,
        Err(err) => {
            tracing::error!(dataset = %spec.key, error = %err, "history range unavailable");
            return outcome;
        }
    };
    tracing::info!(dataset = %spec.key, from = %history_range.from_param(),
        to = %history_range.to_param(), "fetching full history");
    let history = match fetch_range(&client, spec, &history_range).await {
        Ok(records) => records,
        Err(err) => {
            tracing::error!(dataset = %spec.key, error = %err, "history fetch failed");
            return outcome;
        }
    };
    outcome.history_rows = Some(history.len());

    let path = output_dir.join(&spec.workbook_name);
    match workbook::write_dataset_workbook(&path, &recent, &history, spec.history_start) {
        Ok(()) => {
            tracing::info!(dataset = %spec.key, path = %path.display(),
                recent_rows = recent.len(), history_rows = history.len(), "workbook written");
            outcome.workbook = Some(path);
        }
        Err(err) => {
            tracing::error!(dataset = %spec.key, error = %err, "failed to write workbook");
        }
    }
    outcome
}

async fn fetch_range(
    client: &Client,
    spec: &DatasetSpec,
    range: &DateRange,
) -> Result<Vec<FlatRecord>, noga_api::Error> {
    let raw = client.fetch(&spec.endpoints, range).await?;
    flatten(raw, &spec.interval_keys)
}
