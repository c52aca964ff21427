mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nogareport_lib::Config;

#[derive(Parser)]
#[command(name = "nogareport")]
#[command(about = "Fetch Noga ISO electricity-market data and mail daily reports")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "nogareport.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch datasets and write their workbooks
    Fetch(commands::fetch::FetchArgs),
    /// Run the full daily pipeline: fetch, summarize, mail
    Report(commands::report::ReportArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nogareport_cli=info".parse().unwrap())
                .add_directive("nogareport_lib=info".parse().unwrap())
                .add_directive("noga_api=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = Config::from_file(&cli.config)?;

    match &cli.command {
        Commands::Fetch(args) => commands::fetch::run(args, &config).await?,
        Commands::Report(args) => commands::report::run(args, &config).await?,
    }

    Ok(())
}
