//! Stargazer download orchestration
//!
//! Turns a repository's metadata into its complete, ordered star history.
//!
//! # Overview
//!
//! 1. **Planning**: [`planner::last_page`] derives the pages to request from
//!    the reported star count, one page past the exact boundary
//! 2. **Aggregation**: [`aggregator::StarAggregator`] fetches every page
//!    concurrently, at most [`config::MAX_CONCURRENT_PAGES`] at a time, and
//!    collects the records
//! 3. **Ordering**: [`order::order_by_starred_at`] stable-sorts the result
//!    once all pages are in
//!
//! # Quick Start
//!
//! ```no_run
//! use stargazers::downloader::{fetch_all_star_events, FetchConfig};
//! use stargazers::RepoInfo;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = RepoInfo::new("minio/minio", 250);
//! let events = fetch_all_star_events(&repo, FetchConfig::from_env()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Rate limits never surface here; they are retried inside the fetcher.
//! Any other page failure makes the whole fetch fail with no partial data.

pub mod aggregator;
pub mod config;
pub mod order;
pub mod planner;

pub use aggregator::{fetch_all_star_events, StarAggregator};
pub use config::FetchConfig;

use crate::fetcher::FetcherError;

/// Download errors
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// A page fetch failed
    #[error("fetcher error: {0}")]
    Fetcher(#[from] FetcherError),

    /// A page task panicked or the admission limiter was closed
    #[error("page task failed: {0}")]
    TaskFailed(String),
}
