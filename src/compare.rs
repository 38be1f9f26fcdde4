//! Multi-repository lookups and comparisons
//!
//! Helpers behind the `info` and `compare` commands: look up several
//! repositories, rank them by star count, and fetch their histories side by
//! side.

use futures::future::join_all;
use std::fmt::Write as _;
use tracing::warn;

use crate::downloader::StarAggregator;
use crate::fetcher::github_http::GitHubHttpClient;
use crate::fetcher::FetcherResult;
use crate::repo_name::RepoName;
use crate::{RepoInfo, StarEvent};

/// Repositories compared by default
pub const DEFAULT_PROJECTS: &[&str] = &[
    "minio/minio",
    "mongodb/mongo",
    "kubernetes/kubernetes",
    "apache/cassandra",
    "apache/kafka",
    "cockroachdb/cockroach",
    "elastic/elasticsearch",
];

/// Star history of one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoHistory {
    /// Repository metadata the fetch was planned from
    pub info: RepoInfo,
    /// Star events ordered by time; empty if the fetch failed
    pub events: Vec<StarEvent>,
}

/// Look up every repository, most-starred first
///
/// Lookups run one after another; the first failure aborts.
pub async fn load_repo_infos(
    client: &GitHubHttpClient,
    names: &[RepoName],
) -> FetcherResult<Vec<RepoInfo>> {
    let mut infos = Vec::with_capacity(names.len());
    for name in names {
        infos.push(client.repo_info(name).await?);
    }
    rank_by_stars(&mut infos);
    Ok(infos)
}

/// Sort repositories by star count, descending (stable for equal counts)
pub fn rank_by_stars(infos: &mut [RepoInfo]) {
    infos.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
}

/// Render one `name : count` line per repository, names padded to align
pub fn format_info_table(infos: &[RepoInfo]) -> String {
    let width = infos.iter().map(|r| r.full_name.len()).max().unwrap_or(0);

    let mut table = String::new();
    for info in infos {
        let _ = writeln!(
            table,
            "{:<width$} : {}",
            info.full_name,
            info.stargazers_count,
            width = width
        );
    }
    table
}

/// Fetch the histories of all repositories concurrently
///
/// Results keep the order of `infos`. A repository whose fetch fails is
/// logged and reported with an empty history so the others still compare.
pub async fn fetch_histories(aggregator: &StarAggregator, infos: &[RepoInfo]) -> Vec<RepoHistory> {
    let fetches = infos.iter().map(|info| async move {
        let events = match aggregator.fetch_all(info).await {
            Ok(events) => events,
            Err(e) => {
                warn!(repository = %info.full_name, error = %e, "Skipping repository");
                Vec::new()
            }
        };
        RepoHistory {
            info: info.clone(),
            events,
        }
    });

    join_all(fetches).await
}
