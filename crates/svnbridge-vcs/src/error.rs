//! Error types for Subversion client operations.

use std::path::PathBuf;
use thiserror::Error;

/// Error-stream fragments emitted by `svn` when a directory is not a working copy.
const NOT_WORKING_COPY_MARKERS: &[&str] = &["W155007", "E155007", "is not a working copy"];

/// Subversion client errors.
///
/// None of these are retried internally; the caller decides whether a
/// failure is worth another attempt.
#[derive(Error, Debug)]
pub enum SvnError {
    /// A required argument was absent or malformed. Raised before any process is spawned.
    #[error("invalid argument '{field}': {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        field: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Structurally invalid configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        /// Description of the problem.
        message: String,
    },

    /// The client executable could not be located or started.
    #[error("svn client not found at '{}': {reason}", path.display())]
    ClientNotFound {
        /// Executable path that was attempted.
        path: PathBuf,
        /// Underlying reason.
        reason: String,
    },

    /// The client exited with a non-zero code or reported errors.
    #[error("'{command}' failed (exit code {exit_code}): {stderr}")]
    ProcessFailure {
        /// Redacted command line.
        command: String,
        /// Process exit code.
        exit_code: i32,
        /// Error-stream lines joined with newlines.
        stderr: String,
    },

    /// Output did not have the expected structure.
    #[error("malformed output from '{command}': {reason}")]
    MalformedOutput {
        /// Client action whose output was being decoded.
        command: String,
        /// What was missing or unexpected.
        reason: String,
    },

    /// The caller cancelled the operation while the client was running.
    #[error("operation cancelled")]
    Cancelled,

    /// Local file-system error while managing a workspace.
    #[error("io error at {}: {message}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Error message.
        message: String,
    },
}

impl SvnError {
    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create a malformed output error.
    #[must_use]
    pub fn malformed(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedOutput {
            command: command.into(),
            reason: reason.into(),
        }
    }

    /// Create an IO error.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Check if this failure means the queried directory is not a working copy.
    ///
    /// The client reports this only through its error text, so the check is a
    /// pattern match on the captured error stream.
    #[must_use]
    pub fn is_not_working_copy(&self) -> bool {
        match self {
            Self::ProcessFailure { stderr, .. } => is_not_working_copy_text(stderr),
            _ => false,
        }
    }

    /// Check if this is a cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Check if this error was raised before the client was launched.
    #[must_use]
    pub const fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. } | Self::InvalidConfiguration { .. }
        )
    }
}

/// Check error-stream text for the "not a working copy" condition.
#[must_use]
pub fn is_not_working_copy_text(text: &str) -> bool {
    NOT_WORKING_COPY_MARKERS
        .iter()
        .any(|marker| text.contains(marker))
}

/// Result type for Subversion operations.
pub type Result<T> = std::result::Result<T, SvnError>;
