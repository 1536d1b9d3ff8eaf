//! Repository locations as a base URL plus a relative path.

use crate::error::{Result, SvnError};
use serde::Serialize;
use std::fmt;

const SEPARATOR: char = '/';

/// A location inside a Subversion repository.
///
/// The relative part never starts with `/`. A trailing `/` marks a directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RepositoryPath {
    repository_url: String,
    relative_path: String,
}

impl RepositoryPath {
    /// Create a path relative to a repository URL.
    ///
    /// # Errors
    /// Returns [`SvnError::InvalidArgument`] if the repository URL is empty.
    pub fn new(repository_url: impl Into<String>, relative_path: &str) -> Result<Self> {
        let repository_url = repository_url.into();
        if repository_url.trim().is_empty() {
            return Err(SvnError::invalid_argument(
                "repository_url",
                "a repository path requires a base URL",
            ));
        }
        Ok(Self {
            repository_url,
            relative_path: relative_path.trim_start_matches(SEPARATOR).to_string(),
        })
    }

    /// The repository root itself.
    ///
    /// # Errors
    /// Returns [`SvnError::InvalidArgument`] if the repository URL is empty.
    pub fn root(repository_url: impl Into<String>) -> Result<Self> {
        Self::new(repository_url, "")
    }

    /// Extend this path with a child segment.
    ///
    /// Exactly one `/` separates the two parts however either side is slashed.
    #[must_use]
    pub fn join(&self, child: &str) -> Self {
        let base = self.relative_path.trim_end_matches(SEPARATOR);
        let child = child.trim_start_matches(SEPARATOR);
        let relative_path = if base.is_empty() {
            child.to_string()
        } else {
            format!("{base}{SEPARATOR}{child}")
        };
        Self {
            repository_url: self.repository_url.clone(),
            relative_path,
        }
    }

    /// Containing directory, or `None` at the repository root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.relative_path.trim_end_matches(SEPARATOR);
        if trimmed.is_empty() {
            return None;
        }
        let relative_path = match trimmed.rfind(SEPARATOR) {
            Some(idx) => trimmed[..=idx].to_string(),
            None => String::new(),
        };
        Some(Self {
            repository_url: self.repository_url.clone(),
            relative_path,
        })
    }

    /// Base repository URL as configured.
    #[must_use]
    pub fn repository_url(&self) -> &str {
        &self.repository_url
    }

    /// Path relative to the repository URL.
    #[must_use]
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Full URL handed to the client.
    #[must_use]
    pub fn absolute_path(&self) -> String {
        format!(
            "{}{SEPARATOR}{}",
            self.repository_url.trim_end_matches(SEPARATOR),
            self.relative_path
        )
    }

    /// Whether the relative path names a directory.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.relative_path.ends_with(SEPARATOR)
    }

    /// Last non-empty segment, or an empty string at the root.
    #[must_use]
    pub fn name(&self) -> &str {
        self.relative_path
            .trim_end_matches(SEPARATOR)
            .rsplit(SEPARATOR)
            .next()
            .unwrap_or_default()
    }
}

impl fmt::Display for RepositoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.absolute_path())
    }
}

/// Join two path fragments with exactly one `/`.
pub(crate) fn combine(base: &str, child: &str) -> String {
    format!(
        "{}{SEPARATOR}{}",
        base.trim_end_matches(SEPARATOR),
        child.trim_start_matches(SEPARATOR)
    )
}
