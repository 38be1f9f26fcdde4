//! # Stargazers Library
//!
//! Fetches the complete stargazer history of GitHub repositories: every user
//! who starred a repository and the instant they did so, returned as a single
//! list ordered by time.
//!
//! ## Features
//!
//! - **Concurrent Pagination**: Every page of the stargazer collection is
//!   requested in parallel, with at most 10 requests in flight by default
//! - **Rate Limit Handling**: HTTP 403 responses are retried after a fixed
//!   backoff until the provider lets the request through
//! - **End-of-Data Tolerance**: The trailing page past the real end of the
//!   collection is absorbed silently
//! - **Deterministic Ordering**: Results are stable-sorted by star time once
//!   all pages have arrived
//! - **Export**: CSV writers for raw star events and cumulative star series
//!
//! ## Quick Start
//!
//! ```no_run
//! use stargazers::downloader::{FetchConfig, StarAggregator};
//! use stargazers::fetcher::github_http::GitHubHttpClient;
//! use stargazers::RepoName;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FetchConfig::from_env();
//! let client = GitHubHttpClient::new(config.clone());
//!
//! let repo = client.repo_info(&RepoName::parse("minio/minio")?).await?;
//! let events = StarAggregator::new(client, config).fetch_all(&repo).await?;
//!
//! println!("{} has {} stargazers", repo.full_name, events.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`repo_name`] - Repository name parsing and validation (OWNER/NAME)
//! - [`fetcher`] - Page fetching, response classification and rate-limit retry
//! - [`downloader`] - Page planning, concurrent aggregation and ordering
//! - [`compare`] - Multi-repository lookups and comparisons
//! - [`output`] - CSV writers and cumulative star series
//! - [`metrics`] - Prometheus metrics for page requests and retries

#![warn(missing_docs)]
#![warn(clippy::all)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// CLI command implementations
pub mod cli;

/// Multi-repository lookups and comparisons
pub mod compare;

/// Page planning, concurrent aggregation and ordering
pub mod downloader;

/// Page fetching from the GitHub API
pub mod fetcher;

/// Metrics collection and Prometheus export
pub mod metrics;

/// Data output writers
pub mod output;

/// Repository name parsing and validation
pub mod repo_name;

pub use downloader::{fetch_all_star_events, FetchConfig, StarAggregator};
pub use repo_name::RepoName;

/// Repository metadata needed to plan a stargazer fetch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoInfo {
    /// Full repository name (e.g., "minio/minio")
    pub full_name: String,
    /// Total number of stargazers reported by the API
    ///
    /// Only used to plan how many pages to request; the API treats it as a
    /// hint and it may lag behind the real collection.
    pub stargazers_count: u64,
    /// Repository creation time, when reported
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl RepoInfo {
    /// Create repository metadata without a creation time
    pub fn new(full_name: impl Into<String>, stargazers_count: u64) -> Self {
        Self {
            full_name: full_name.into(),
            stargazers_count,
            created_at: None,
        }
    }
}

/// The user behind a star
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct StarUser {
    /// Account login name
    pub login: String,
    /// Account type as reported by the API (e.g., "User", "Organization")
    #[serde(rename = "type")]
    pub account_type: String,
}

/// A single star on a repository at a given time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct StarEvent {
    /// Instant the star was recorded
    pub starred_at: DateTime<Utc>,
    /// User who starred the repository
    pub user: StarUser,
}

impl StarEvent {
    /// Create a star event for a regular user account
    pub fn new(starred_at: DateTime<Utc>, login: impl Into<String>) -> Self {
        Self {
            starred_at,
            user: StarUser {
                login: login.into(),
                account_type: "User".to_string(),
            },
        }
    }
}
