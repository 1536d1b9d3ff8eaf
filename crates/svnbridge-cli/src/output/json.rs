//! JSON output support for machine-readable CLI output.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use svnbridge_config::ConfigError;
use svnbridge_vcs::SvnError;

/// Global JSON output mode
static JSON_OUTPUT: AtomicBool = AtomicBool::new(false);

/// Enable JSON output mode.
pub fn enable() {
    JSON_OUTPUT.store(true, Ordering::Relaxed);
}

/// Check if JSON output is enabled.
pub fn is_enabled() -> bool {
    JSON_OUTPUT.load(Ordering::Relaxed)
}

/// JSON-serializable error structure.
#[derive(Debug, Serialize)]
pub struct JsonError {
    /// Stable error kind, e.g. `process-failure`.
    pub kind: &'static str,
    /// Detailed error message
    pub message: String,
    /// Client exit code, for process failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

/// JSON-serializable result structure.
#[derive(Debug, Serialize)]
pub struct JsonResult<T> {
    /// Whether the operation succeeded
    pub success: bool,
    /// The result data (if success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error information (if failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
}

impl JsonError {
    /// Create a `JsonError` from a client error.
    #[must_use]
    pub fn from_svn_error(err: &SvnError) -> Self {
        let (kind, exit_code) = match err {
            SvnError::InvalidArgument { .. } => ("invalid-argument", None),
            SvnError::InvalidConfiguration { .. } => ("invalid-configuration", None),
            SvnError::ClientNotFound { .. } => ("client-not-found", None),
            SvnError::ProcessFailure { exit_code, .. } => ("process-failure", Some(*exit_code)),
            SvnError::MalformedOutput { .. } => ("malformed-output", None),
            SvnError::Cancelled => ("cancelled", None),
            SvnError::Io { .. } => ("io", None),
        };
        Self {
            kind,
            message: err.to_string(),
            exit_code,
        }
    }

    /// Create a `JsonError` from an anyhow error.
    #[must_use]
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        if let Some(svn) = err.downcast_ref::<SvnError>() {
            return Self::from_svn_error(svn);
        }
        if let Some(config) = err.downcast_ref::<ConfigError>() {
            if let ConfigError::Client(svn) = config {
                return Self::from_svn_error(svn);
            }
            return Self {
                kind: "configuration",
                message: config.to_string(),
                exit_code: None,
            };
        }
        Self {
            kind: "error",
            message: format!("{err:#}"),
            exit_code: None,
        }
    }

    /// Print this error as JSON to stderr.
    pub fn print(self) {
        let result = JsonResult::<()> {
            success: false,
            data: None,
            error: Some(self),
        };
        if let Ok(json) = sonic_rs::to_string_pretty(&result) {
            eprintln!("{json}");
        }
    }
}

impl<T: Serialize> JsonResult<T> {
    /// Create a successful result.
    #[must_use]
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Print this result as JSON to stdout.
    pub fn print(&self) {
        if let Ok(json) = sonic_rs::to_string_pretty(self) {
            println!("{json}");
        }
    }
}

/// Print `data` as a JSON success document.
pub fn print_success<T: Serialize>(data: T) {
    JsonResult::success(data).print();
}

/// Print an error in JSON format if enabled, otherwise human-readable.
pub fn print_error(err: anyhow::Error) {
    if is_enabled() {
        JsonError::from_anyhow(&err).print();
        return;
    }
    match err.downcast::<ConfigError>() {
        Ok(ConfigError::Client(svn)) => super::error(&svn.to_string()),
        Ok(config) => eprintln!("{:?}", miette::Report::new(config)),
        Err(err) => super::error(&format!("{err:#}")),
    }
}
