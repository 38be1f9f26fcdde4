//! Compare command implementation

use crate::compare::{fetch_histories, format_info_table, load_repo_infos};
use crate::downloader::StarAggregator;
use crate::fetcher::github_http::GitHubHttpClient;
use crate::output::csv::CsvSeriesWriter;
use crate::output::{OutputWriter, SeriesWriter, StarSeries};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use super::commands::{create_spinner, parse_since, resolve_repos};
use super::{Cli, CliError};

/// Earliest star kept in the comparison series unless `--since` says otherwise
pub const DEFAULT_SINCE: &str = "2013-01-10T23:00:00Z";

/// Arguments for comparing repositories
#[derive(Parser, Debug)]
pub struct CompareArgs {
    /// Comma-separated OWNER/NAME list (default: a set of popular databases)
    #[arg(long)]
    pub repos: Option<String>,

    /// Output CSV path for the cumulative series
    #[arg(long, default_value = "stargazers.csv")]
    pub output: PathBuf,

    /// Only keep stars given after this date (YYYY-MM-DD or RFC3339)
    #[arg(long, default_value = DEFAULT_SINCE)]
    pub since: String,
}

impl CompareArgs {
    /// Execute the compare command
    pub async fn execute(&self, cli: &Cli) -> Result<(), CliError> {
        let names = resolve_repos(self.repos.as_deref())?;
        let since = Some(parse_since(&self.since)?);
        let config = cli.fetch_config();
        let client = GitHubHttpClient::new(config.clone());

        let infos = load_repo_infos(&client, &names).await?;
        print!("{}", format_info_table(&infos));

        let spinner = create_spinner(format!("Fetching {} repositories", infos.len()));
        let aggregator = StarAggregator::new(client, config);
        let histories = fetch_histories(&aggregator, &infos).await;
        spinner.finish_and_clear();

        let series: Vec<StarSeries> = histories
            .iter()
            .map(|history| StarSeries::from_events(&history.info.full_name, &history.events, since))
            .collect();

        let mut writer = CsvSeriesWriter::new(&self.output)?;
        writer.write_all_series(&series)?;
        writer.close()?;

        println!("\nCompare completed successfully!");
        println!("Output: {}", self.output.display());
        for s in &series {
            println!("{}: {} points", s.repository(), s.len());
        }

        info!(
            repositories = series.len(),
            output = %self.output.display(),
            "Compare command finished"
        );
        Ok(())
    }
}
