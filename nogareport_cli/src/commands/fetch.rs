//! The `fetch` subcommand: fetch datasets and write their workbooks.

use anyhow::{anyhow, bail, Result};
use chrono::Local;
use clap::Args;
use nogareport_lib::{runner, Config, DatasetKey};

/// Arguments for the `fetch` subcommand.
#[derive(Args)]
pub struct FetchArgs {
    /// Fetch a single dataset: production-mix, co2, demand, or smp
    #[arg(long)]
    pub dataset: Option<String>,
}

pub async fn run(args: &FetchArgs, config: &Config) -> Result<()> {
    let mut specs = config.resolved_datasets()?;
    if let Some(ref name) = args.dataset {
        let key: DatasetKey = name
            .parse()
            .map_err(|_| anyhow!("unknown dataset '{name}'"))?;
        specs.retain(|spec| spec.key == key);
    }

    let today = Local::now().date_naive();
    let outcomes = runner::run_all(&specs, &config.output.dir, today).await?;

    for outcome in &outcomes {
        match &outcome.workbook {
            Some(path) => eprintln!(
                "{}: {} recent rows, {} history rows -> {}",
                outcome.key,
                outcome.recent_rows.unwrap_or(0),
                outcome.history_rows.unwrap_or(0),
                path.display()
            ),
            None => eprintln!("{}: failed, no workbook written", outcome.key),
        }
    }

    if outcomes.iter().all(|outcome| !outcome.succeeded()) {
        bail!("no dataset produced a workbook");
    }
    Ok(())
}
