//! Stargazer page fetching
//!
//! One call fetches one page of a repository's stargazer collection and
//! classifies the response. Rate-limit responses never leave this module:
//! [`retry::RateLimitRetry`] turns them into a fixed wait and another attempt.

use crate::StarEvent;
use async_trait::async_trait;

pub mod github_config;
pub mod github_http;
pub mod github_parser;
pub mod retry;
pub mod shared_resources;

/// Fetcher errors
#[derive(Debug, thiserror::Error)]
pub enum FetcherError {
    /// Network or connection failure before a response was received
    #[error("transport error: {0}")]
    Transport(String),

    /// Provider rejected the request because the rate limit is exhausted
    #[error("rate limit exceeded")]
    RateLimited,

    /// Provider answered with a non-success status
    #[error("github api error (status {status}): {body}")]
    RemoteApi {
        /// HTTP status code
        status: u16,
        /// Response body, kept for diagnostics
        body: String,
    },

    /// Response body could not be decoded
    #[error("parse error: {0}")]
    Parse(String),
}

impl FetcherError {
    /// Whether this error is a rate-limit rejection that should be retried
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, FetcherError::RateLimited)
    }
}

/// Result type for fetcher operations
pub type FetcherResult<T> = Result<T, FetcherError>;

/// Outcome of a successful page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page held at least one star event
    Records(Vec<StarEvent>),
    /// The page is past the end of the collection
    ///
    /// Expected for the last planned page, since the planner requests one page
    /// beyond the reported star count.
    EndOfData,
}

impl PageOutcome {
    /// Classify decoded records: an empty page means end of data
    pub fn from_records(records: Vec<StarEvent>) -> Self {
        if records.is_empty() {
            PageOutcome::EndOfData
        } else {
            PageOutcome::Records(records)
        }
    }

    /// Number of star events carried by this outcome
    pub fn len(&self) -> usize {
        match self {
            PageOutcome::Records(records) => records.len(),
            PageOutcome::EndOfData => 0,
        }
    }

    /// Whether this outcome carries no star events
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Source of stargazer pages
///
/// Implementations must already have applied rate-limit retry: the only
/// errors they return are fatal to the whole fetch.
#[async_trait]
pub trait StargazerSource: Send + Sync {
    /// Fetch one page (1-based) of the stargazers of `full_name`
    async fn fetch_page(&self, full_name: &str, page: u32) -> FetcherResult<PageOutcome>;
}
