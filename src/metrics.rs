//! Observability metrics for stargazer fetching
//!
//! Counts page requests, rate-limit retries and collected events, and times
//! each HTTP request. Uses the `metrics` facade: every helper is a cheap
//! no-op until [`init_metrics`] installs the Prometheus exporter.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::Lazy;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Global metrics registry initialization flag
static METRICS_INITIALIZED: Lazy<Arc<RwLock<bool>>> = Lazy::new(|| Arc::new(RwLock::new(false)));

/// Initialize metrics system with Prometheus exporter
///
/// Idempotent: a second call returns `Ok(())` without reinstalling.
///
/// # Arguments
/// * `addr` - Socket address to bind the scrape endpoint (e.g., "0.0.0.0:9090")
pub async fn init_metrics(addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
    let mut initialized = METRICS_INITIALIZED.write().await;
    if *initialized {
        debug!("Metrics already initialized, skipping");
        return Ok(());
    }

    info!("Initializing metrics system on {}", addr);

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))?;

    describe_counter!(
        "stargazer_pages_total",
        Unit::Count,
        "Stargazer pages fetched, labelled by outcome"
    );

    describe_counter!(
        "rate_limit_retries_total",
        Unit::Count,
        "Requests retried after a rate-limit response"
    );

    describe_counter!(
        "stargazer_events_total",
        Unit::Count,
        "Star events collected across all repositories"
    );

    describe_counter!(
        "page_request_errors_total",
        Unit::Count,
        "Requests that failed before a response arrived"
    );

    describe_histogram!(
        "page_request_duration_seconds",
        Unit::Seconds,
        "HTTP request duration in seconds"
    );

    *initialized = true;
    info!("Metrics system initialized successfully on {}", addr);
    Ok(())
}

/// Check if the metrics exporter has been installed
pub async fn is_initialized() -> bool {
    *METRICS_INITIALIZED.read().await
}

/// Times one HTTP request
pub struct PageRequestTimer {
    start_time: Instant,
}

impl PageRequestTimer {
    /// Start timing a request
    pub fn start() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Time elapsed since the request started
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Record the response status and request duration
    pub fn record_complete(&self, status_code: u16) {
        let duration = self.elapsed();

        histogram!(
            "page_request_duration_seconds",
            "status" => status_code.to_string(),
        )
        .record(duration.as_secs_f64());

        debug!(
            status = status_code,
            duration_ms = duration.as_millis(),
            "HTTP request completed"
        );
    }

    /// Record a request that failed before any response arrived
    pub fn record_network_error(&self) {
        let duration = self.elapsed();

        counter!("page_request_errors_total", "kind" => "network").increment(1);
        histogram!(
            "page_request_duration_seconds",
            "status" => "network_error",
        )
        .record(duration.as_secs_f64());

        warn!(
            duration_ms = duration.as_millis(),
            "HTTP request failed without a response"
        );
    }
}

/// Record the outcome of one stargazers page ("records", "end_of_data", "error")
pub fn record_page_outcome(outcome: &'static str) {
    counter!("stargazer_pages_total", "outcome" => outcome).increment(1);
}

/// Record one rate-limit retry
pub fn record_rate_limit_retry() {
    counter!("rate_limit_retries_total").increment(1);
}

/// Record star events collected for a repository
pub fn record_events(count: usize) {
    counter!("stargazer_events_total").increment(count as u64);
}
