//! The `report` subcommand: the full daily fetch, summarize, and mail pipeline.

use std::path::Path;

use anyhow::{anyhow, bail, Result};
use chrono::{Local, NaiveDate};
use clap::Args;
use nogareport_lib::{runner, summary, Config, DatasetSpec, Mailer};
use tracing::{error, info, warn};

/// Arguments for the `report` subcommand.
#[derive(Args)]
pub struct ReportArgs {
    /// Also mail each dataset's full-history workbook in separate messages
    #[arg(long)]
    pub historical: bool,

    /// Reuse existing workbook files instead of fetching
    #[arg(long)]
    pub skip_fetch: bool,
}

pub async fn run(args: &ReportArgs, config: &Config) -> Result<()> {
    let email = config
        .email
        .clone()
        .ok_or_else(|| anyhow!("config has no [email] section, required for report"))?;
    let specs = config.resolved_datasets()?;
    let today = Local::now().date_naive();

    if args.skip_fetch {
        info!("skipping fetch, using existing workbook files");
    } else {
        let outcomes = runner::run_all(&specs, &config.output.dir, today).await?;
        let produced = outcomes.iter().filter(|o| o.succeeded()).count();
        info!(produced, total = outcomes.len(), "fetch stage finished");
    }

    let mailer = Mailer::new(email);
    let mut delivered = false;

    match summary::build_summary(&config.output.dir, &specs, today)? {
        Some(path) => {
            let subject = format!("Noga ISO Daily Report - {}", today.format("%Y-%m-%d"));
            let body = daily_body(today, &path);
            match mailer
                .deliver(&subject, &body, std::slice::from_ref(&path))
                .await
            {
                Ok(sent) => delivered |= sent,
                Err(err) => error!(error = %err, "daily summary delivery failed"),
            }
        }
        None => warn!("no summary workbook produced, skipping daily mail"),
    }

    if args.historical {
        let present: Vec<&DatasetSpec> = specs
            .iter()
            .filter(|spec| config.output.dir.join(&spec.workbook_name).exists())
            .collect();
        let total = present.len();
        for (index, spec) in present.iter().enumerate() {
            let path = config.output.dir.join(&spec.workbook_name);
            let subject = format!(
                "Noga ISO Historical - {} - {}",
                spec.title,
                today.format("%Y-%m-%d")
            );
            let body = historical_body(spec, index + 1, total);
            match mailer
                .deliver(&subject, &body, std::slice::from_ref(&path))
                .await
            {
                Ok(sent) => delivered |= sent,
                Err(err) => {
                    error!(dataset = %spec.key, error = %err, "historical delivery failed")
                }
            }
        }
    }

    if !delivered {
        bail!("nothing was delivered");
    }
    Ok(())
}

fn daily_body(today: NaiveDate, path: &Path) -> String {
    let size_mb = std::fs::metadata(path)
        .map(|m| m.len() as f64 / (1024.0 * 1024.0))
        .unwrap_or(0.0);
    format!(
        "Noga ISO Daily Data Report\n\n\
         Report date: {date}\n\n\
         This email contains yesterday's electricity market data from Israel's \
         Independent System Operator (Noga ISO) in a single workbook with one tab \
         per dataset:\n\n\
         - Production Mix: generation by source (5-minute intervals)\n\
         - CO2 Emissions: carbon dioxide emissions (5-minute intervals)\n\
         - Demand: electricity demand (30-minute intervals)\n\
         - SMP Pricing: system marginal price, constrained and unconstrained (30-minute intervals)\n\n\
         File size: {size_mb:.1} MB\n\
         Data source: Noga ISO APIs (https://apim-api.noga-iso.co.il/)\n",
        date = today.format("%Y-%m-%d"),
    )
}

fn historical_body(spec: &DatasetSpec, part: usize, total: usize) -> String {
    format!(
        "Noga ISO Historical Data - Part {part} of {total}\n\n\
         This email contains the full {title} history from {start} onward, \
         alongside the most recent complete day.\n\n\
         Data source: Noga ISO APIs (https://apim-api.noga-iso.co.il/)\n",
        title = spec.title,
        start = spec.history_start.format("%Y-%m-%d"),
    )
}
