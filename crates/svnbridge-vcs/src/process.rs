//! Launching the client and capturing its output line by line.

use crate::args::ArgumentBuilder;
use crate::error::{Result, SvnError};
use crate::types::ExecutionResult;
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// A single client invocation.
#[derive(Debug, Clone)]
pub struct ProcessCommand {
    /// Executable to launch.
    pub program: PathBuf,
    /// Ordered arguments.
    pub arguments: ArgumentBuilder,
    /// Directory to run in; inherits the current one when absent.
    pub working_dir: Option<PathBuf>,
}

impl ProcessCommand {
    /// Create a command running `program` with `arguments`.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, arguments: ArgumentBuilder) -> Self {
        Self {
            program: program.into(),
            arguments,
            working_dir: None,
        }
    }

    /// Run in `dir`.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Command line safe for logs.
    #[must_use]
    pub fn redacted(&self) -> String {
        format!(
            "{} {}",
            self.program.display(),
            self.arguments.render_redacted()
        )
    }
}

/// Runs client commands.
///
/// The local implementation spawns a child process. Other implementations can
/// forward the rendered command line elsewhere or return canned output.
#[async_trait]
pub trait ProcessRunner: Send + Sync + fmt::Debug {
    /// Run `command` to completion, or until `cancel` fires.
    ///
    /// A non-zero exit code is not an error here; callers inspect the result.
    async fn run(
        &self,
        command: &ProcessCommand,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult>;
}

/// Spawns the client as a local child process without a shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    /// Create a runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(
        &self,
        command: &ProcessCommand,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult> {
        if cancel.is_cancelled() {
            return Err(SvnError::Cancelled);
        }

        let mut cmd = Command::new(&command.program);
        cmd.args(command.arguments.to_argv())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &command.working_dir {
            debug!(dir = %dir.display(), "working directory");
            ensure_directory(dir).await?;
            cmd.current_dir(dir);
        }

        debug!(command = %command.redacted(), "executing");

        let mut child = cmd.spawn().map_err(|e| SvnError::ClientNotFound {
            path: command.program.clone(),
            reason: e.to_string(),
        })?;

        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            result = wait_and_collect(&mut child) => Some(result),
        };

        let Some(result) = outcome else {
            debug!(command = %command.redacted(), "cancelled, terminating client");
            if let Err(e) = child.kill().await {
                warn!(error = %e, "failed to terminate client process");
            }
            return Err(SvnError::Cancelled);
        };

        let (status, output_lines, error_lines) =
            result.map_err(|e| SvnError::io(&command.program, e))?;

        Ok(ExecutionResult::new(
            status.code().unwrap_or(-1),
            output_lines,
            error_lines,
        ))
    }
}

async fn ensure_directory(dir: &Path) -> Result<()> {
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(SvnError::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
        )),
        Err(e) => Err(SvnError::io(dir, e)),
    }
}

async fn wait_and_collect(
    child: &mut Child,
) -> std::io::Result<(std::process::ExitStatus, Vec<String>, Vec<String>)> {
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| std::io::Error::other("stdout was not captured"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| std::io::Error::other("stderr was not captured"))?;

    // Both streams are drained concurrently so a full pipe cannot stall the child.
    let (output_lines, error_lines) =
        tokio::try_join!(read_lines(stdout, "stdout"), read_lines(stderr, "stderr"))?;
    let status = child.wait().await?;
    Ok((status, output_lines, error_lines))
}

async fn read_lines<R: AsyncRead + Unpin>(
    reader: R,
    stream: &'static str,
) -> std::io::Result<Vec<String>> {
    let mut reader = BufReader::new(reader);
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        while matches!(buf.last(), Some(b'\n' | b'\r')) {
            buf.pop();
        }
        let line = String::from_utf8_lossy(&buf).into_owned();
        trace!(stream, line = %line, "client output");
        lines.push(line);
    }
    Ok(lines)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::{Duration, Instant};

    fn sh(script: &str) -> ProcessCommand {
        let mut args = ArgumentBuilder::new();
        args.append("-c").append_quoted(script);
        ProcessCommand::new("/bin/sh", args)
    }

    #[tokio::test]
    async fn captures_streams_separately() {
        let cmd = sh("echo out1; echo err1 >&2; echo out2; exit 3");
        let result = TokioProcessRunner::new()
            .run(&cmd, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(result.exit_code, 3);
        assert_eq!(result.output_lines, vec!["out1", "out2"]);
        assert_eq!(result.error_lines, vec!["err1"]);
    }

    #[tokio::test]
    async fn crlf_is_stripped() {
        let cmd = sh("printf 'a\\r\\nb\\r\\n'");
        let result = TokioProcessRunner::new()
            .run(&cmd, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(result.output_lines, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn runs_in_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = sh("pwd").current_dir(dir.path());
        let result = TokioProcessRunner::new()
            .run(&cmd, &CancellationToken::new())
            .await
            .unwrap();
        let reported = std::fs::canonicalize(&result.output_lines[0]).unwrap();
        assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
    }

    #[tokio::test]
    async fn missing_working_directory_is_io_error() {
        let cmd = sh("true").current_dir("/definitely/not/here");
        let err = TokioProcessRunner::new()
            .run(&cmd, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SvnError::Io { .. }));
    }

    #[tokio::test]
    async fn missing_executable_is_client_not_found() {
        let cmd = ProcessCommand::new("/nonexistent/bin/svn", ArgumentBuilder::new());
        let err = TokioProcessRunner::new()
            .run(&cmd, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SvnError::ClientNotFound { .. }));
    }

    #[tokio::test]
    async fn cancellation_terminates_child() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let err = TokioProcessRunner::new()
            .run(&sh("sleep 10"), &cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn already_cancelled_token_skips_spawn() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let cmd = ProcessCommand::new("/nonexistent/bin/svn", ArgumentBuilder::new());
        let err = TokioProcessRunner::new().run(&cmd, &cancel).await.unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn redacted_command_hides_password() {
        let mut args = ArgumentBuilder::new();
        args.append("ls").append("--password").append_sensitive("pw123456");
        let cmd = ProcessCommand::new("svn", args);
        assert_eq!(cmd.redacted(), "svn ls --password (hidden)");
    }
}
