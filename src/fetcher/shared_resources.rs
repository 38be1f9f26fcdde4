//! Shared HTTP client for all fetcher instances
//!
//! Every page task and every repository lookup goes through the same
//! `reqwest::Client` so they share one connection pool. The client holds no
//! per-run state: token and page size travel in [`crate::downloader::FetchConfig`].

use once_cell::sync::Lazy;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use super::github_config::USER_AGENT;

/// HTTP connect timeout (seconds) - time to establish TCP connection
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
/// HTTP request timeout (seconds) - overall time for the entire request
const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Global HTTP client shared by all fetcher instances
///
/// Configured with explicit timeouts so a stalled connection surfaces as a
/// transport error instead of hanging a page task forever:
/// - Connect timeout: 10 seconds
/// - Request timeout: 30 seconds
pub static GLOBAL_HTTP_CLIENT: Lazy<Arc<Client>> = Lazy::new(|| {
    Arc::new(
        Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                panic!("FATAL: Failed to build HTTP client: {}. Check system TLS configuration.", e);
            }),
    )
});

/// Get the global HTTP client
///
/// Returns a clone of the Arc, which is cheap (just increments ref count)
pub fn global_http_client() -> Arc<Client> {
    GLOBAL_HTTP_CLIENT.clone()
}
