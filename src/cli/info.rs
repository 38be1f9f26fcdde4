//! Info command implementation

use crate::compare::{format_info_table, load_repo_infos};
use crate::fetcher::github_http::GitHubHttpClient;
use clap::Parser;

use super::commands::resolve_repos;
use super::{Cli, CliError};

/// Arguments for the info command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Comma-separated OWNER/NAME list (default: a set of popular databases)
    #[arg(long)]
    pub repos: Option<String>,
}

impl InfoArgs {
    /// Execute the info command
    pub async fn execute(&self, cli: &Cli) -> Result<(), CliError> {
        let names = resolve_repos(self.repos.as_deref())?;
        let client = GitHubHttpClient::new(cli.fetch_config());

        let infos = load_repo_infos(&client, &names).await?;
        print!("{}", format_info_table(&infos));
        Ok(())
    }
}
