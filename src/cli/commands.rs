//! Top-level command line definition and shared helpers

use crate::compare::DEFAULT_PROJECTS;
use crate::downloader::FetchConfig;
use crate::repo_name::RepoName;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::net::SocketAddr;
use std::time::Duration;

use super::{CliError, CompareArgs, FetchArgs, InfoArgs};

/// Maximum allowed page concurrency to prevent self-inflicted rate limiting
const MAX_CONCURRENCY: usize = 32;

/// Parse and validate concurrency value
pub(crate) fn parse_concurrency(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if value == 0 {
        return Err("concurrency must be at least 1".to_string());
    }
    if value > MAX_CONCURRENCY {
        return Err(format!(
            "concurrency {value} exceeds maximum of {MAX_CONCURRENCY}"
        ));
    }
    Ok(value)
}

/// Parse a cutoff from YYYY-MM-DD or RFC3339 datetime format
///
/// Date-only input means start of that day, UTC. RFC3339 input without an
/// offset is taken as UTC.
pub(crate) fn parse_since(input: &str) -> Result<DateTime<Utc>, CliError> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(&format!("{input}Z")) {
        return Ok(dt.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|e| CliError::InvalidArgument(format!("Invalid date '{input}': {e}")))?;
    let datetime = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| CliError::InvalidArgument(format!("Invalid date '{input}'")))?;
    Ok(datetime.and_utc())
}

/// Parse `--repos`, falling back to the default project list
pub(crate) fn resolve_repos(repos: Option<&str>) -> Result<Vec<RepoName>, CliError> {
    let names = match repos {
        Some(list) => RepoName::parse_list(list)?,
        None => DEFAULT_PROJECTS
            .iter()
            .map(|project| RepoName::parse(project))
            .collect::<Result<Vec<_>, _>>()?,
    };

    if names.is_empty() {
        return Err(CliError::InvalidArgument(
            "at least one repository is required".to_string(),
        ));
    }
    Ok(names)
}

/// Spinner on stderr; hidden automatically when stderr is not a terminal
pub(crate) fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .expect("hardcoded template is valid"),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// GitHub stargazer history CLI
#[derive(Parser, Debug)]
#[command(name = "stargazers")]
#[command(about = "Fetch and compare the stargazer history of GitHub repositories", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Maximum concurrent page requests per repository (default: 10, max: 32)
    ///
    /// GitHub answers bursts with 403 responses, which are retried after a
    /// 10 second pause, so higher values rarely help.
    #[arg(long, global = true, default_value = "10", value_parser = parse_concurrency)]
    pub concurrency: usize,

    /// Stargazers per page (1-100); overrides GITHUB_PAGE_SIZE
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub page_size: Option<u32>,

    /// Serve Prometheus metrics on this address (e.g., 127.0.0.1:9000)
    #[arg(long, global = true)]
    pub metrics_addr: Option<SocketAddr>,
}

impl Cli {
    /// Fetch configuration from the environment, overridden by global flags
    pub fn fetch_config(&self) -> FetchConfig {
        let config = FetchConfig::from_env().with_max_concurrent_pages(self.concurrency);
        match self.page_size {
            Some(page_size) => config.with_page_size(page_size),
            None => config,
        }
    }

    /// Run the selected command
    pub async fn execute(&self) -> Result<(), CliError> {
        match &self.command {
            Commands::Info(args) => args.execute(self).await,
            Commands::Fetch(args) => args.execute(self).await,
            Commands::Compare(args) => args.execute(self).await,
        }
    }
}

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show star counts of repositories, most-starred first
    Info(InfoArgs),

    /// Fetch the full stargazer history of one repository
    Fetch(FetchArgs),

    /// Fetch several repositories and export their cumulative star series
    Compare(CompareArgs),
}
