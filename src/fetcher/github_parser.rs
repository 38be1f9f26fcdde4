//! GitHub response parser
//!
//! Stateless functions turning response bodies into typed records. Unknown
//! fields are ignored, so the full user objects the API sends back decode
//! into the few fields we keep.

use crate::fetcher::{FetcherError, FetcherResult};
use crate::{RepoInfo, StarEvent};

/// Stateless parser for GitHub API responses
pub struct GitHubParser;

impl GitHubParser {
    /// Parse one stargazers page
    ///
    /// # Format
    /// A JSON array of `{"starred_at": "<RFC 3339>", "user": {"login": .., "type": ..}}`.
    /// An empty array is valid and yields no records.
    ///
    /// # Errors
    /// Returns FetcherError::Parse if the body is not such an array
    pub fn parse_stargazers(body: &str) -> FetcherResult<Vec<StarEvent>> {
        serde_json::from_str(body).map_err(|e| {
            FetcherError::Parse(format!(
                "Failed to decode stargazers page: {e} (body starts with {:?})",
                snippet(body)
            ))
        })
    }

    /// Parse a repository metadata response
    ///
    /// # Errors
    /// Returns FetcherError::Parse if `full_name` or `stargazers_count` is missing
    pub fn parse_repo_info(body: &str) -> FetcherResult<RepoInfo> {
        serde_json::from_str(body).map_err(|e| {
            FetcherError::Parse(format!(
                "Failed to decode repository info: {e} (body starts with {:?})",
                snippet(body)
            ))
        })
    }
}

fn snippet(body: &str) -> &str {
    const MAX: usize = 120;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
