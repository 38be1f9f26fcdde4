//! Admission limit and completion-order behaviour of the aggregator

use async_trait::async_trait;
use chrono::Duration as ChronoDuration;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use stargazers::downloader::{DownloadError, FetchConfig, StarAggregator};
use stargazers::fetcher::retry::{RateLimitRetry, RATE_LIMIT_BACKOFF};
use stargazers::fetcher::{FetcherError, FetcherResult, PageOutcome, StargazerSource};
use stargazers::{RepoInfo, StarEvent};

use super::support::base_time;

/// Source that tracks how many fetches run at once
#[derive(Default)]
struct CountingSource {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

#[async_trait]
impl StargazerSource for CountingSource {
    async fn fetch_page(&self, _full_name: &str, page: u32) -> FetcherResult<PageOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(20)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        let at = base_time() + ChronoDuration::minutes(i64::from(page));
        Ok(PageOutcome::Records(vec![StarEvent::new(at, format!("p{page}"))]))
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_never_more_than_ten_pages_in_flight() {
    let source = Arc::new(CountingSource::default());
    let aggregator = StarAggregator::from_shared(source.clone(), FetchConfig::default());

    // floor(2400 / 100) + 1 = 25 pages
    let events = aggregator
        .fetch_all(&RepoInfo::new("kubernetes/kubernetes", 2400))
        .await
        .unwrap();

    assert_eq!(events.len(), 25);
    assert_eq!(source.calls.load(Ordering::SeqCst), 25);
    assert!(source.peak.load(Ordering::SeqCst) <= 10);
    assert!(source.peak.load(Ordering::SeqCst) > 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_lower_limit_is_respected() {
    let source = Arc::new(CountingSource::default());
    let config = FetchConfig::default().with_max_concurrent_pages(3);
    let aggregator = StarAggregator::from_shared(source.clone(), config);

    aggregator
        .fetch_all(&RepoInfo::new("kubernetes/kubernetes", 1200))
        .await
        .unwrap();

    assert!(source.peak.load(Ordering::SeqCst) <= 3);
}

/// Source whose pages finish after per-page delays, recording completion order
struct DelayedSource {
    delays_ms: HashMap<u32, u64>,
    minutes: HashMap<u32, i64>,
    completed: Mutex<Vec<u32>>,
}

#[async_trait]
impl StargazerSource for DelayedSource {
    async fn fetch_page(&self, _full_name: &str, page: u32) -> FetcherResult<PageOutcome> {
        let delay = self.delays_ms.get(&page).copied().unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        self.completed.lock().unwrap().push(page);

        let records = match self.minutes.get(&page) {
            Some(minute) => vec![StarEvent::new(
                base_time() + ChronoDuration::minutes(*minute),
                format!("t{minute}"),
            )],
            None => Vec::new(),
        };
        Ok(PageOutcome::from_records(records))
    }
}

#[tokio::test]
async fn test_out_of_order_completion_is_sorted() {
    // Page 1 holds T3 and finishes first; page 2 holds T1; page 3 holds T2
    let source = Arc::new(DelayedSource {
        delays_ms: HashMap::from([(1, 0), (2, 30), (3, 60)]),
        minutes: HashMap::from([(1, 3), (2, 1), (3, 2)]),
        completed: Mutex::new(Vec::new()),
    });
    let config = FetchConfig::default().with_page_size(1);
    let aggregator = StarAggregator::from_shared(source.clone(), config);

    // floor(2 / 1) + 1 = 3 pages
    let events = aggregator
        .fetch_all(&RepoInfo::new("a/b", 2))
        .await
        .unwrap();

    assert_eq!(*source.completed.lock().unwrap(), vec![1, 2, 3]);
    let logins: Vec<&str> = events.iter().map(|e| e.user.login.as_str()).collect();
    assert_eq!(logins, vec!["t1", "t2", "t3"]);
}

/// Source failing one page while its siblings keep going
struct FailingSource {
    failing_page: u32,
    finished: AtomicUsize,
}

#[async_trait]
impl StargazerSource for FailingSource {
    async fn fetch_page(&self, _full_name: &str, page: u32) -> FetcherResult<PageOutcome> {
        if page == self.failing_page {
            return Err(FetcherError::RemoteApi {
                status: 500,
                body: "internal".to_string(),
            });
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        self.finished.fetch_add(1, Ordering::SeqCst);
        Ok(PageOutcome::Records(vec![StarEvent::new(base_time(), "x")]))
    }
}

#[tokio::test]
async fn test_first_error_wins_and_siblings_finish() {
    let source = Arc::new(FailingSource {
        failing_page: 1,
        finished: AtomicUsize::new(0),
    });
    let aggregator = StarAggregator::from_shared(source.clone(), FetchConfig::default());

    let result = aggregator.fetch_all(&RepoInfo::new("a/b", 450)).await;

    assert!(matches!(
        result,
        Err(DownloadError::Fetcher(FetcherError::RemoteApi { status: 500, .. }))
    ));
    // Pages 2..=5 ran to completion even though page 1 had already failed
    assert_eq!(source.finished.load(Ordering::SeqCst), 4);
}

/// Source that is rate limited once on one page and retries with the real backoff
struct RateLimitedOnceSource {
    limited_page: u32,
    limited: AtomicBool,
    retry: RateLimitRetry,
    completed: Mutex<Vec<u32>>,
}

#[async_trait]
impl StargazerSource for RateLimitedOnceSource {
    async fn fetch_page(&self, _full_name: &str, page: u32) -> FetcherResult<PageOutcome> {
        let outcome = self
            .retry
            .run("stargazers page", || async move {
                if page == self.limited_page && !self.limited.swap(true, Ordering::SeqCst) {
                    return Err(FetcherError::RateLimited);
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
                let at = base_time() + ChronoDuration::minutes(i64::from(page));
                Ok(PageOutcome::Records(vec![StarEvent::new(at, format!("p{page}"))]))
            })
            .await?;
        self.completed.lock().unwrap().push(page);
        Ok(outcome)
    }
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_wait_only_delays_its_own_page() {
    let source = Arc::new(RateLimitedOnceSource {
        limited_page: 1,
        limited: AtomicBool::new(false),
        retry: RateLimitRetry::default(),
        completed: Mutex::new(Vec::new()),
    });
    let config = FetchConfig::default().with_page_size(1);
    let aggregator = StarAggregator::from_shared(source.clone(), config);

    let started = tokio::time::Instant::now();
    // floor(3 / 1) + 1 = 4 pages
    let events = aggregator
        .fetch_all(&RepoInfo::new("a/b", 3))
        .await
        .unwrap();
    let elapsed = started.elapsed();

    let completed = source.completed.lock().unwrap().clone();
    assert_eq!(completed.len(), 4);
    assert_eq!(completed.last(), Some(&1), "order: {completed:?}");
    let mut siblings = completed[..3].to_vec();
    siblings.sort_unstable();
    assert_eq!(siblings, vec![2, 3, 4]);

    assert!(elapsed >= RATE_LIMIT_BACKOFF, "elapsed: {elapsed:?}");
    // Siblings did not queue behind the wait
    assert!(elapsed < RATE_LIMIT_BACKOFF * 2, "elapsed: {elapsed:?}");

    let logins: Vec<&str> = events.iter().map(|e| e.user.login.as_str()).collect();
    assert_eq!(logins, vec!["p1", "p2", "p3", "p4"]);
}
