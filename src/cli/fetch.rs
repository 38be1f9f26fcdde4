//! Fetch command implementation

use crate::downloader::StarAggregator;
use crate::fetcher::github_http::GitHubHttpClient;
use crate::output::csv::CsvStarsWriter;
use crate::output::json::JsonLinesStarsWriter;
use crate::output::{OutputWriter, StarsWriter};
use crate::repo_name::RepoName;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;

use super::commands::create_spinner;
use super::{Cli, CliError};

/// Output format for fetched star events
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FetchFormat {
    /// CSV file with one row per star
    Csv,
    /// JSON lines, on stdout unless `--output` is given
    Json,
}

/// Arguments for fetching one repository
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Repository as OWNER/NAME (e.g., minio/minio)
    #[arg(long)]
    pub repo: String,

    /// Output path (CSV default: <owner>_<name>_stars.csv; JSON default: stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "csv")]
    pub format: FetchFormat,
}

impl FetchArgs {
    /// CSV destination, derived from the repository when not given
    pub fn output_path(&self, name: &RepoName) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}_stars.csv", name.to_filesystem_safe())))
    }

    /// Execute the fetch command
    pub async fn execute(&self, cli: &Cli) -> Result<(), CliError> {
        let name = RepoName::parse(&self.repo)?;
        let config = cli.fetch_config();
        let client = GitHubHttpClient::new(config.clone());

        let spinner = create_spinner(format!("Fetching stargazers of {name}"));
        let fetched = async {
            let repo = client.repo_info(&name).await?;
            let events = StarAggregator::new(client, config).fetch_all(&repo).await?;
            Ok::<_, CliError>((repo, events))
        }
        .await;
        spinner.finish_and_clear();
        let (repo, events) = fetched?;

        match self.format {
            FetchFormat::Csv => {
                let path = self.output_path(&name);
                let mut writer = CsvStarsWriter::new(&path)?;
                writer.write_stars(&events)?;
                writer.close()?;

                println!("\nFetch completed successfully!");
                println!("Repository: {}", repo.full_name);
                println!("Output: {}", path.display());
                println!("Stars reported: {}", repo.stargazers_count);
                println!("Stars fetched: {}", events.len());
            }
            FetchFormat::Json => match &self.output {
                Some(path) => {
                    let mut writer = JsonLinesStarsWriter::create(path)?;
                    writer.write_stars(&events)?;
                    writer.close()?;
                    println!("Output: {}", path.display());
                }
                None => {
                    let stdout = std::io::stdout();
                    let mut writer = JsonLinesStarsWriter::new(stdout.lock());
                    writer.write_stars(&events)?;
                    writer.close()?;
                }
            },
        }

        info!(
            repository = %repo.full_name,
            stars = events.len(),
            "Fetch command finished"
        );
        Ok(())
    }
}
