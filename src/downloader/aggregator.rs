//! Concurrent stargazer aggregation
//!
//! One task per planned page, admitted through a counting semaphore so no
//! more than `max_concurrent_pages` requests are ever in flight. Tasks append
//! their records to a single shared vector; the vector is ordered only after
//! every task has finished, because pages complete in no particular order.

use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::config::FetchConfig;
use super::order::order_by_starred_at;
use super::planner::plan_pages;
use super::DownloadError;
use crate::fetcher::github_http::GitHubHttpClient;
use crate::fetcher::{PageOutcome, StargazerSource};
use crate::metrics;
use crate::{RepoInfo, StarEvent};

/// Fetches every page of a repository's stargazers and returns them ordered
#[derive(Clone)]
pub struct StarAggregator {
    source: Arc<dyn StargazerSource>,
    page_size: u32,
    max_concurrent_pages: usize,
}

impl std::fmt::Debug for StarAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StarAggregator")
            .field("page_size", &self.page_size)
            .field("max_concurrent_pages", &self.max_concurrent_pages)
            .finish_non_exhaustive()
    }
}

impl StarAggregator {
    /// Create an aggregator over any page source
    ///
    /// Only `page_size` and `max_concurrent_pages` are read from `config`; the
    /// source is expected to have been built from the same config.
    pub fn new<S>(source: S, config: FetchConfig) -> Self
    where
        S: StargazerSource + 'static,
    {
        Self::from_shared(Arc::new(source), config)
    }

    /// Create an aggregator over an already shared page source
    pub fn from_shared(source: Arc<dyn StargazerSource>, config: FetchConfig) -> Self {
        Self {
            source,
            page_size: config.page_size.max(1),
            max_concurrent_pages: config.max_concurrent_pages.max(1),
        }
    }

    /// Stargazers requested per page
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Upper bound on concurrent page requests
    pub fn max_concurrent_pages(&self) -> usize {
        self.max_concurrent_pages
    }

    /// Fetch all star events of `repo`, ordered by `starred_at` ascending
    ///
    /// # Errors
    /// Returns the first fatal page error observed (in completion order). Pages
    /// already in flight are left to finish, but nothing they collected is
    /// returned: the result is either complete or an error.
    pub async fn fetch_all(&self, repo: &RepoInfo) -> Result<Vec<StarEvent>, DownloadError> {
        let pages = plan_pages(repo.stargazers_count, self.page_size);
        info!(
            repository = %repo.full_name,
            stargazers = repo.stargazers_count,
            last_page = *pages.end(),
            "Fetching stargazers"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_pages));
        let collected: Arc<Mutex<Vec<StarEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let full_name: Arc<str> = Arc::from(repo.full_name.as_str());
        let mut tasks = JoinSet::new();

        for page in pages {
            // Admission gate: the next page is not launched until a slot frees
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| DownloadError::TaskFailed(format!("admission limiter closed: {e}")))?;

            let source = Arc::clone(&self.source);
            let collected = Arc::clone(&collected);
            let full_name = Arc::clone(&full_name);

            tasks.spawn(async move {
                let _permit = permit;
                match source.fetch_page(&full_name, page).await? {
                    PageOutcome::Records(records) => {
                        collected.lock().await.extend(records);
                    }
                    PageOutcome::EndOfData => {
                        debug!("Page {} of {} is empty, nothing to add", page, full_name);
                    }
                }
                Ok::<(), DownloadError>(())
            });
        }

        let mut first_error: Option<DownloadError> = None;
        while let Some(joined) = tasks.join_next().await {
            let result = joined.unwrap_or_else(|e| Err(DownloadError::TaskFailed(e.to_string())));
            if let Err(e) = result {
                if first_error.is_none() {
                    warn!(repository = %repo.full_name, error = %e, "Stargazer fetch failed");
                    first_error = Some(e);
                } else {
                    debug!(repository = %repo.full_name, error = %e, "Discarding later page error");
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        let mut events = std::mem::take(&mut *collected.lock().await);
        order_by_starred_at(&mut events);

        metrics::record_events(events.len());
        info!(
            repository = %repo.full_name,
            events = events.len(),
            "Stargazer fetch completed"
        );

        Ok(events)
    }
}

/// Fetch all star events of `repo` from GitHub using `config`
///
/// Convenience wrapper building a [`GitHubHttpClient`] and a [`StarAggregator`].
pub async fn fetch_all_star_events(
    repo: &RepoInfo,
    config: FetchConfig,
) -> Result<Vec<StarEvent>, DownloadError> {
    let client = GitHubHttpClient::new(config.clone());
    StarAggregator::new(client, config).fetch_all(repo).await
}
