//! Repository name parsing and validation
//!
//! Implements the `OWNER/NAME` format used in GitHub API paths.

use std::fmt;
use std::str::FromStr;

/// Repository name using format OWNER/NAME
///
/// Case is preserved: GitHub resolves names case-insensitively, but the
/// original spelling is what users expect to see in reports.
///
/// # Examples
///
/// ```
/// use stargazers::repo_name::RepoName;
///
/// let name = RepoName::parse("minio/minio").unwrap();
/// assert_eq!(name.owner(), "minio");
/// assert_eq!(name.name(), "minio");
/// assert_eq!(name.to_string(), "minio/minio");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoName {
    owner: String,
    name: String,
}

impl RepoName {
    /// Parse a repository name string
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly `OWNER/NAME`, if either part
    /// is empty, or if a part contains characters GitHub does not allow.
    pub fn parse(s: &str) -> Result<Self, RepoNameError> {
        let parts: Vec<&str> = s.trim().split('/').collect();
        if parts.len() != 2 {
            return Err(RepoNameError::InvalidFormat(format!(
                "invalid repository '{s}': expected OWNER/NAME"
            )));
        }

        let owner = parts[0].trim();
        let name = parts[1].trim();

        if owner.is_empty() {
            return Err(RepoNameError::InvalidFormat(
                "owner component cannot be empty".to_string(),
            ));
        }
        if name.is_empty() {
            return Err(RepoNameError::InvalidFormat(
                "name component cannot be empty".to_string(),
            ));
        }

        for part in [owner, name] {
            if let Some(c) = part.chars().find(|c| !is_allowed(*c)) {
                return Err(RepoNameError::InvalidCharacter {
                    component: part.to_string(),
                    character: c,
                });
            }
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Parse a comma-separated list of repository names
    ///
    /// Empty entries (e.g., from a trailing comma) are skipped.
    pub fn parse_list(s: &str) -> Result<Vec<Self>, RepoNameError> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Self::parse)
            .collect()
    }

    /// Get the owner (user or organization) component
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Get the repository name component
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Convert the name to a filesystem-safe stem
    ///
    /// ```
    /// use stargazers::repo_name::RepoName;
    ///
    /// let name = RepoName::parse("Kubernetes/kubernetes").unwrap();
    /// assert_eq!(name.to_filesystem_safe(), "kubernetes_kubernetes");
    /// ```
    pub fn to_filesystem_safe(&self) -> String {
        format!(
            "{}_{}",
            self.owner.to_lowercase(),
            self.name.to_lowercase()
        )
    }
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoName {
    type Err = RepoNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Errors that can occur during repository name parsing
#[derive(Debug, thiserror::Error)]
pub enum RepoNameError {
    /// Invalid overall format
    #[error("repository name error: {0}")]
    InvalidFormat(String),

    /// A component contains a character GitHub does not accept
    #[error("repository name error: '{component}' contains invalid character '{character}'")]
    InvalidCharacter {
        /// Offending component
        component: String,
        /// First invalid character found
        character: char,
    },
}
