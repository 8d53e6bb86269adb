mod cli;
mod config;
mod export;
mod facts;
mod ingest;

pub const USER_AGENT: &str = concat!("meowfacts/", env!("CARGO_PKG_VERSION"));

use std::time::Duration;

use clap::Parser;
use reqwest::Client;
use tracing::{error, info};

use cli::{Cli, Command};
use config::{ExportConfig, IngestConfig};
use facts::FactsClient;

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("meowfacts=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Ingest(args) => {
            let config = args
                .into_config()
                .inspect_err(|e| error!("invalid configuration: {e}"))?;
            run_ingest(config).await?;
        }
        Command::Export(args) => run_export(args.into_config())?,
        Command::Run { ingest: args, table } => {
            let config = args
                .into_config()
                .inspect_err(|e| error!("invalid configuration: {e}"))?;
            let dataset = config.output.clone();
            run_ingest(config).await?;
            run_export(table.into_config(dataset))?;
        }
    }
    Ok(())
}

async fn run_ingest(config: IngestConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        endpoint = %config.endpoint,
        languages = config.languages.len(),
        count = config.count,
        "starting ingestion"
    );
    let http = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;
    let client = FactsClient::from_config(http, &config);

    let report = ingest::run_ingestion(&client, &config)
        .await
        .inspect_err(|e| error!("ingestion failed: {e}"))?;
    println!("{}", report.summary());
    Ok(())
}

fn run_export(config: ExportConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(input = %config.input.display(), "starting export");
    let report = export::build_table(&config).inspect_err(|e| error!("export failed: {e}"))?;
    println!("{}", report.summary());
    Ok(())
}
