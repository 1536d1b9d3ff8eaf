//! Scripted [`ProcessRunner`] for exercising client logic without `svn`.

use crate::error::{Result, SvnError};
use crate::process::{ProcessCommand, ProcessRunner};
use crate::types::ExecutionResult;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

type ArgsMatcher = Box<dyn Fn(&[String]) -> bool + Send + Sync>;

/// One invocation seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Executable requested.
    pub program: PathBuf,
    /// Unquoted arguments, secrets included.
    pub argv: Vec<String>,
    /// Redacted command line.
    pub redacted: String,
    /// Requested working directory.
    pub working_dir: Option<PathBuf>,
}

impl RecordedCall {
    /// Client action, the first argument.
    #[must_use]
    pub fn action(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }
}

enum Response {
    Output(ExecutionResult),
    ClientNotFound,
}

struct Expectation {
    action: Option<String>,
    args_matcher: Option<ArgsMatcher>,
    response: Response,
    remaining: Option<usize>,
}

impl Expectation {
    fn matches(&self, argv: &[String]) -> bool {
        if self.remaining == Some(0) {
            return false;
        }
        if let Some(action) = &self.action {
            if argv.first() != Some(action) {
                return false;
            }
        }
        self.args_matcher.as_ref().is_none_or(|m| m(argv))
    }
}

#[derive(Default)]
struct State {
    expectations: Vec<Expectation>,
    calls: Vec<RecordedCall>,
}

/// Runner answering from registered expectations and recording every call.
///
/// Expectations are tried in registration order; one limited with
/// [`MockCommandConfig::times`] stops matching once used up. A call nothing
/// matches panics, failing the test that made it.
#[derive(Clone, Default)]
pub struct MockProcessRunner {
    state: Arc<Mutex<State>>,
}

impl MockProcessRunner {
    /// Create a runner with no expectations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an expectation for calls whose first argument is `action`.
    #[must_use]
    pub fn expect(&self, action: &str) -> MockCommandConfig {
        self.config(Some(action.to_string()))
    }

    /// Start an expectation matching any call.
    #[must_use]
    pub fn expect_any(&self) -> MockCommandConfig {
        self.config(None)
    }

    fn config(&self, action: Option<String>) -> MockCommandConfig {
        MockCommandConfig {
            runner: self.clone(),
            expectation: Expectation {
                action,
                args_matcher: None,
                response: Response::Output(ExecutionResult::default()),
                remaining: None,
            },
        }
    }

    /// All calls made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    /// Number of calls made so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Actions of all calls made so far.
    #[must_use]
    pub fn actions(&self) -> Vec<String> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|c| c.action().map(str::to_string))
            .collect()
    }
}

impl fmt::Debug for MockProcessRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MockProcessRunner")
            .field("expectations", &state.expectations.len())
            .field("calls", &state.calls.len())
            .finish()
    }
}

#[async_trait]
impl ProcessRunner for MockProcessRunner {
    async fn run(
        &self,
        command: &ProcessCommand,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult> {
        let argv = command.arguments.to_argv();
        let mut state = self.state.lock();
        state.calls.push(RecordedCall {
            program: command.program.clone(),
            argv: argv.clone(),
            redacted: command.arguments.render_redacted(),
            working_dir: command.working_dir.clone(),
        });

        if cancel.is_cancelled() {
            return Err(SvnError::Cancelled);
        }

        let Some(expectation) = state.expectations.iter_mut().find(|e| e.matches(&argv)) else {
            panic!("no mock expectation for: {}", command.redacted());
        };
        if let Some(remaining) = expectation.remaining.as_mut() {
            *remaining -= 1;
        }
        match &expectation.response {
            Response::Output(result) => Ok(result.clone()),
            Response::ClientNotFound => Err(SvnError::ClientNotFound {
                path: command.program.clone(),
                reason: "No such file or directory (os error 2)".to_string(),
            }),
        }
    }
}

/// Builder for one expectation; call [`finish`](Self::finish) to register it.
pub struct MockCommandConfig {
    runner: MockProcessRunner,
    expectation: Expectation,
}

impl MockCommandConfig {
    /// Only match when `matcher` accepts the unquoted arguments.
    #[must_use]
    pub fn with_args<F>(mut self, matcher: F) -> Self
    where
        F: Fn(&[String]) -> bool + Send + Sync + 'static,
    {
        self.expectation.args_matcher = Some(Box::new(matcher));
        self
    }

    /// Standard output, split into lines.
    #[must_use]
    pub fn returns_stdout(mut self, stdout: &str) -> Self {
        if let Response::Output(result) = &mut self.expectation.response {
            result.output_lines = stdout.lines().map(str::to_string).collect();
        }
        self
    }

    /// Standard error, split into lines.
    #[must_use]
    pub fn returns_stderr(mut self, stderr: &str) -> Self {
        if let Response::Output(result) = &mut self.expectation.response {
            result.error_lines = stderr.lines().map(str::to_string).collect();
        }
        self
    }

    /// Exit code; defaults to zero.
    #[must_use]
    pub fn returns_exit_code(mut self, code: i32) -> Self {
        if let Response::Output(result) = &mut self.expectation.response {
            result.exit_code = code;
        }
        self
    }

    /// Behave as if the executable does not exist.
    #[must_use]
    pub fn fails_with_client_not_found(mut self) -> Self {
        self.expectation.response = Response::ClientNotFound;
        self
    }

    /// Match at most `n` calls.
    #[must_use]
    pub fn times(mut self, n: usize) -> Self {
        self.expectation.remaining = Some(n);
        self
    }

    /// Register the expectation.
    pub fn finish(self) {
        self.runner.state.lock().expectations.push(self.expectation);
    }
}

impl fmt::Debug for MockCommandConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockCommandConfig")
            .field("action", &self.expectation.action)
            .finish()
    }
}
