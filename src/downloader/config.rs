//! Fetch configuration
//!
//! [`FetchConfig`] is an immutable value handed to the HTTP client and the
//! aggregator at construction. Nothing is read from ambient state during a
//! fetch, so several fetches with different settings can run side by side.

use std::time::Duration;

use crate::fetcher::github_config::{GITHUB_API_URL, MAX_PAGE_SIZE};
use crate::fetcher::retry::RATE_LIMIT_BACKOFF;

/// Default number of stargazers requested per page.
/// The API caps pages at 100; smaller pages only multiply request count.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Maximum number of page requests in flight for one repository.
/// Keeps load on the API bounded no matter how many pages a repository has.
pub const MAX_CONCURRENT_PAGES: usize = 10;

/// Environment variable holding the API token
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Environment variable overriding the page size
pub const PAGE_SIZE_ENV: &str = "GITHUB_PAGE_SIZE";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "GITHUB_API_URL";

/// Settings for one stargazer fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// API base URL without trailing slash
    pub api_base: String,
    /// Optional API token sent as `Authorization: token <value>`
    pub token: Option<String>,
    /// Stargazers per page (1..=100)
    pub page_size: u32,
    /// Upper bound on concurrent page requests
    pub max_concurrent_pages: usize,
    /// Wait between rate-limited attempts
    pub rate_limit_backoff: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            api_base: GITHUB_API_URL.to_string(),
            token: None,
            page_size: DEFAULT_PAGE_SIZE,
            max_concurrent_pages: MAX_CONCURRENT_PAGES,
            rate_limit_backoff: RATE_LIMIT_BACKOFF,
        }
    }
}

impl FetchConfig {
    /// Build a configuration from `GITHUB_TOKEN`, `GITHUB_PAGE_SIZE` and
    /// `GITHUB_API_URL`
    ///
    /// A missing or unparsable page size falls back to the default, and an
    /// empty token counts as no token.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            token: lookup(TOKEN_ENV).filter(|t| !t.trim().is_empty()),
            ..Self::default()
        };

        if let Some(size) = lookup(PAGE_SIZE_ENV).and_then(|v| v.trim().parse::<u32>().ok()) {
            config = config.with_page_size(size);
        }

        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            config = config.with_api_base(url);
        }

        config
    }

    /// Override the API base URL (trailing slashes are dropped)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the API token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the page size, clamped to 1..=100
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Set the concurrency bound (at least 1)
    pub fn with_max_concurrent_pages(mut self, max_concurrent_pages: usize) -> Self {
        self.max_concurrent_pages = max_concurrent_pages.max(1);
        self
    }

    /// Set the wait between rate-limited attempts
    pub fn with_rate_limit_backoff(mut self, backoff: Duration) -> Self {
        self.rate_limit_backoff = backoff;
        self
    }
}
