//! CLI error types and conversions

use crate::downloader::DownloadError;
use crate::fetcher::FetcherError;
use crate::output::OutputError;
use crate::repo_name::RepoNameError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Repository name error
    #[error("repository name error: {0}")]
    RepoNameError(#[from] RepoNameError),

    /// Download error
    #[error("download error: {0}")]
    DownloadError(#[from] DownloadError),

    /// Fetcher error
    #[error("fetcher error: {0}")]
    FetcherError(#[from] FetcherError),

    /// Output error
    #[error("output error: {0}")]
    OutputError(#[from] OutputError),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
