//! Fixed-delay retry for rate-limited requests
//!
//! GitHub answers 403 once the hourly quota is gone. Waiting a fixed interval
//! and sending the identical request again is enough in practice, so there is
//! no attempt cap and no exponential growth. Other errors pass straight
//! through. The wait goes through a [`Sleeper`] so tests can observe the
//! delays without spending them.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::fetcher::FetcherResult;
use crate::metrics;

/// Default wait between rate-limited attempts
pub const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(10);

/// Abstraction over sleeping so retry timing is injectable
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspend the current task for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Retries an operation for as long as it reports a rate limit
#[derive(Clone)]
pub struct RateLimitRetry {
    backoff: Duration,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for RateLimitRetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitRetry")
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}

impl Default for RateLimitRetry {
    fn default() -> Self {
        Self::new(RATE_LIMIT_BACKOFF)
    }
}

impl RateLimitRetry {
    /// Create a retry policy sleeping `backoff` between attempts
    pub fn new(backoff: Duration) -> Self {
        Self {
            backoff,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replace the sleeper (used by tests to record waits)
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Wait applied after each rate-limited attempt
    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Run `operation` until it returns anything other than a rate-limit error
    ///
    /// # Arguments
    /// * `context` - Short description of the request, used in log lines
    /// * `operation` - Produces a fresh attempt each time it is called
    pub async fn run<T, F, Fut>(&self, context: &str, mut operation: F) -> FetcherResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = FetcherResult<T>>,
    {
        let mut attempt: u32 = 1;

        loop {
            match operation().await {
                Err(e) if e.is_rate_limit() => {
                    warn!(
                        context = %context,
                        attempt = attempt,
                        backoff_secs = self.backoff.as_secs_f64(),
                        "Rate limit hit, waiting before trying again"
                    );
                    metrics::record_rate_limit_retry();
                    self.sleeper.sleep(self.backoff).await;
                    attempt += 1;
                }
                result => {
                    if attempt > 1 {
                        debug!(
                            context = %context,
                            attempts = attempt,
                            "Request got through after rate limiting"
                        );
                    }
                    return result;
                }
            }
        }
    }
}
