//! Result types shared across client operations.

use crate::error::{Result, SvnError};
use crate::path::RepositoryPath;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Captured outcome of one client invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Process exit code, `-1` when the platform reports none.
    pub exit_code: i32,
    /// Standard output, one entry per line.
    pub output_lines: Vec<String>,
    /// Standard error, one entry per line.
    pub error_lines: Vec<String>,
}

impl ExecutionResult {
    /// Create a result from its parts.
    #[must_use]
    pub const fn new(exit_code: i32, output_lines: Vec<String>, error_lines: Vec<String>) -> Self {
        Self {
            exit_code,
            output_lines,
            error_lines,
        }
    }

    /// Whether the client exited with code zero.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    /// Error-stream lines joined with newlines.
    #[must_use]
    pub fn error_text(&self) -> String {
        self.error_lines.join("\n")
    }

    /// Fail unless the client exited cleanly.
    ///
    /// # Errors
    /// Returns [`SvnError::ProcessFailure`] carrying `command` and the error text.
    pub fn ensure_success(self, command: &str) -> Result<Self> {
        if self.succeeded() {
            Ok(self)
        } else {
            Err(self.into_failure(command))
        }
    }

    pub(crate) fn into_failure(self, command: &str) -> SvnError {
        SvnError::ProcessFailure {
            command: command.to_string(),
            exit_code: self.exit_code,
            stderr: self.error_text(),
        }
    }
}

/// A branch line of development with its last commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchEntry {
    /// Location of the branch directory.
    pub path: RepositoryPath,
    /// Revision of the last commit on the branch.
    pub revision: String,
    /// Author of that commit; absent for anonymous commits.
    pub author: Option<String>,
    /// Time of that commit.
    pub date: DateTime<Utc>,
}

impl BranchEntry {
    /// Branch identifier such as `trunk` or `branches/feature`.
    #[must_use]
    pub fn branch_name(&self) -> &str {
        self.path.relative_path().trim_end_matches('/')
    }
}

/// Working copy metadata reported by `info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkingCopyInfo {
    /// URL the working copy was checked out from.
    pub url: String,
    /// Revision the working copy is at.
    pub revision: String,
}

/// An entry in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DirectoryEntry {
    /// A subdirectory.
    Directory {
        /// Entry name.
        name: String,
        /// Path as seen by the caller.
        path: String,
    },
    /// A file.
    File {
        /// Entry name.
        name: String,
        /// Path as seen by the caller.
        path: String,
    },
}

impl DirectoryEntry {
    /// Entry name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Directory { name, .. } | Self::File { name, .. } => name,
        }
    }

    /// Path as seen by the caller.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Directory { path, .. } | Self::File { path, .. } => path,
        }
    }

    /// Whether this is a directory.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }
}

/// Listing of one directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryListing {
    /// Name of the listed directory, empty at the root.
    pub name: String,
    /// Path of the listed directory as seen by the caller.
    pub path: String,
    /// Immediate children.
    pub entries: Vec<DirectoryEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_success_passes_clean_exit() {
        let result = ExecutionResult::new(0, vec!["ok".into()], vec![]);
        assert_eq!(result.clone().ensure_success("svn update").unwrap(), result);
    }

    #[test]
    fn ensure_success_reports_error_text() {
        let result = ExecutionResult::new(
            1,
            vec![],
            vec!["svn: E170000: first".into(), "svn: E170001: second".into()],
        );
        match result.ensure_success("svn ls").unwrap_err() {
            SvnError::ProcessFailure {
                command,
                exit_code,
                stderr,
            } => {
                assert_eq!(command, "svn ls");
                assert_eq!(exit_code, 1);
                assert_eq!(stderr, "svn: E170000: first\nsvn: E170001: second");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn branch_name_strips_trailing_slash() {
        let entry = BranchEntry {
            path: RepositoryPath::new("http://svn/repo", "branches/rel-1/").unwrap(),
            revision: "7".into(),
            author: None,
            date: DateTime::<Utc>::default(),
        };
        assert_eq!(entry.branch_name(), "branches/rel-1");
    }

    #[test]
    fn directory_entry_accessors() {
        let dir = DirectoryEntry::Directory {
            name: "src".into(),
            path: "trunk/src".into(),
        };
        assert!(dir.is_directory());
        assert_eq!(dir.name(), "src");
        assert_eq!(dir.path(), "trunk/src");
    }
}
