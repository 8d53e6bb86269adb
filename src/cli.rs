use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::{ConfigError, ExportConfig, IngestConfig, parse_endpoint};

#[derive(Parser, Debug)]
#[command(name = "meowfacts", version, about = "Collect Meowfacts across languages and export them as tables")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch facts for every language and write the JSON dataset
    Ingest(IngestArgs),
    /// Convert a JSON dataset into CSV and XLSX
    Export(ExportArgs),
    /// Ingest, then export the dataset just written
    Run {
        #[command(flatten)]
        ingest: IngestArgs,
        #[command(flatten)]
        table: TableArgs,
    },
}

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Fact API endpoint (default: $MEOWFACTS_URL or https://meowfacts.herokuapp.com/)
    #[arg(long)]
    pub url: Option<String>,
    /// Language codes to request, in order (comma-separated or repeated)
    #[arg(long = "lang", value_delimiter = ',')]
    pub languages: Vec<String>,
    /// Facts per language request (1-1000, default: 200)
    #[arg(long)]
    pub count: Option<u32>,
    /// Per-request timeout in seconds (default: 20)
    #[arg(long)]
    pub timeout_secs: Option<u64>,
    /// Dataset output path (default: requested_dataset.json)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl IngestArgs {
    pub fn into_config(self) -> Result<IngestConfig, ConfigError> {
        let mut config = IngestConfig::from_env()?;
        if let Some(url) = self.url {
            config.endpoint = parse_endpoint(&url)?;
        }
        if !self.languages.is_empty() {
            config.languages = self
                .languages
                .into_iter()
                .map(|l| l.trim().to_string())
                .collect();
        }
        if let Some(count) = self.count {
            config.count = count;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Args, Debug)]
pub struct TableArgs {
    /// CSV output path (default: table_dataset.csv)
    #[arg(long)]
    pub csv: Option<PathBuf>,
    /// XLSX output path (default: table_dataset.xlsx)
    #[arg(long)]
    pub xlsx: Option<PathBuf>,
}

impl TableArgs {
    pub fn into_config(self, input: PathBuf) -> ExportConfig {
        let defaults = ExportConfig::default();
        ExportConfig {
            input,
            csv: self.csv.unwrap_or(defaults.csv),
            xlsx: self.xlsx.unwrap_or(defaults.xlsx),
        }
    }
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Dataset to read (default: requested_dataset.json)
    #[arg(long)]
    pub input: Option<PathBuf>,
    #[command(flatten)]
    pub table: TableArgs,
}

impl ExportArgs {
    pub fn into_config(self) -> ExportConfig {
        let input = self.input.unwrap_or(ExportConfig::default().input);
        self.table.into_config(input)
    }
}
