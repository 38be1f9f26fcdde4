//! GitHub HTTP client
//!
//! Issues the two requests the pipeline needs:
//! - one stargazers page (`/repos/{full_name}/stargazers`)
//! - repository metadata (`/repos/{full_name}`)
//!
//! Responses are classified the same way for both:
//! - transport failure -> [`FetcherError::Transport`], not retried
//! - 403 -> rate limited, retried through [`RateLimitRetry`] forever
//! - any other non-2xx -> [`FetcherError::RemoteApi`] with the body text
//! - 2xx -> body decoded by [`GitHubParser`]

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT as USER_AGENT_HEADER};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::sync::Arc;
use tracing::debug;

use super::github_config::{
    repo_path, stargazers_path, JSON_ACCEPT_HEADER, STAR_ACCEPT_HEADER, USER_AGENT,
};
use super::github_parser::GitHubParser;
use super::retry::{RateLimitRetry, Sleeper};
use super::shared_resources::global_http_client;
use super::{FetcherError, FetcherResult, PageOutcome, StargazerSource};
use crate::downloader::FetchConfig;
use crate::metrics::{self, PageRequestTimer};
use crate::repo_name::RepoName;
use crate::RepoInfo;

/// HTTP client for the GitHub REST API
#[derive(Debug, Clone)]
pub struct GitHubHttpClient {
    client: Arc<Client>,
    api_base: String,
    token: Option<String>,
    page_size: u32,
    retry: RateLimitRetry,
}

impl GitHubHttpClient {
    /// Create a client on the shared connection pool
    pub fn new(config: FetchConfig) -> Self {
        Self::with_client(global_http_client(), config)
    }

    /// Create a client on a caller-supplied `reqwest::Client`
    pub fn with_client(client: Arc<Client>, config: FetchConfig) -> Self {
        Self {
            client,
            api_base: config.api_base,
            token: config.token,
            page_size: config.page_size,
            retry: RateLimitRetry::new(config.rate_limit_backoff),
        }
    }

    /// Replace the sleeper used between rate-limited attempts
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.retry = self.retry.with_sleeper(sleeper);
        self
    }

    /// Base URL requests are sent to
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Stargazers requested per page
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Full URL of one stargazers page
    pub fn stargazers_url(&self, full_name: &str, page: u32) -> String {
        format!(
            "{}{}",
            self.api_base,
            stargazers_path(full_name, page, self.page_size)
        )
    }

    /// Look up repository metadata
    ///
    /// # Errors
    /// Returns FetcherError on transport failure, non-2xx status (other than
    /// 403, which is retried) or an undecodable body
    pub async fn repo_info(&self, name: &RepoName) -> FetcherResult<RepoInfo> {
        let full_name = name.to_string();
        let url = format!("{}{}", self.api_base, repo_path(&full_name));
        let url = url.as_str();

        self.retry
            .run(&full_name, || async move {
                let response = self.send(self.get(url, JSON_ACCEPT_HEADER), url).await?;
                let body = read_success_body(response).await?;
                GitHubParser::parse_repo_info(&body)
            })
            .await
    }

    /// Fetch one stargazers page, retrying while rate limited
    ///
    /// # Returns
    /// `Records` when the page holds stars, `EndOfData` when it is empty
    pub async fn stargazers_page(&self, full_name: &str, page: u32) -> FetcherResult<PageOutcome> {
        let context = format!("{full_name} page {page}");
        let url = self.stargazers_url(full_name, page);
        let url = url.as_str();

        let outcome = self
            .retry
            .run(&context, || async move {
                let response = self.send(self.get(url, STAR_ACCEPT_HEADER), url).await?;
                let body = read_success_body(response).await?;
                GitHubParser::parse_stargazers(&body).map(PageOutcome::from_records)
            })
            .await;

        match &outcome {
            Ok(PageOutcome::Records(records)) => {
                debug!("Received {} stargazers for {}", records.len(), context);
                metrics::record_page_outcome("records");
            }
            Ok(PageOutcome::EndOfData) => {
                debug!("No stargazers on {} - past the end of the collection", context);
                metrics::record_page_outcome("end_of_data");
            }
            Err(_) => metrics::record_page_outcome("error"),
        }

        outcome
    }

    fn get(&self, url: &str, accept: &str) -> RequestBuilder {
        let builder = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .header(USER_AGENT_HEADER, USER_AGENT);

        match &self.token {
            Some(token) => builder.header(AUTHORIZATION, format!("token {token}")),
            None => builder,
        }
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> FetcherResult<Response> {
        debug!("Making GET request to: {}", url);
        let timer = PageRequestTimer::start();

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                timer.record_network_error();
                return Err(FetcherError::Transport(e.to_string()));
            }
        };

        timer.record_complete(response.status().as_u16());
        Ok(response)
    }
}

#[async_trait]
impl StargazerSource for GitHubHttpClient {
    async fn fetch_page(&self, full_name: &str, page: u32) -> FetcherResult<PageOutcome> {
        self.stargazers_page(full_name, page).await
    }
}

/// Classify a response by status and return its body on success
async fn read_success_body(response: Response) -> FetcherResult<String> {
    let status = response.status();

    if status == StatusCode::FORBIDDEN {
        return Err(FetcherError::RateLimited);
    }

    let body = response
        .text()
        .await
        .map_err(|e| FetcherError::Transport(format!("Failed to read response body: {e}")))?;

    if !status.is_success() {
        return Err(FetcherError::RemoteApi {
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}
