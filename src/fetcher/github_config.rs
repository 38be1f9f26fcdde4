//! GitHub API constants
//!
//! Endpoint paths and headers for the stargazer and repository endpoints.
//! Everything that varies per run (token, page size, base URL) lives in
//! [`crate::downloader::FetchConfig`] instead.

/// Public GitHub REST API base URL
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Media type that makes the stargazers endpoint include `starred_at`
///
/// Without it the API returns bare user objects with no timestamp.
pub const STAR_ACCEPT_HEADER: &str = "application/vnd.github.v3.star+json";

/// Media type for regular JSON resources
pub const JSON_ACCEPT_HEADER: &str = "application/vnd.github.v3+json";

/// User agent sent with every request (the API rejects anonymous agents)
pub const USER_AGENT: &str = concat!("stargazers/", env!("CARGO_PKG_VERSION"));

/// Largest page size the stargazers endpoint honours
pub const MAX_PAGE_SIZE: u32 = 100;

/// Path of the repository metadata endpoint
pub fn repo_path(full_name: &str) -> String {
    format!("/repos/{full_name}")
}

/// Path and query of one stargazers page
pub fn stargazers_path(full_name: &str, page: u32, page_size: u32) -> String {
    format!("/repos/{full_name}/stargazers?page={page}&per_page={page_size}")
}
