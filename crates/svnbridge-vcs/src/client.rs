//! High-level Subversion operations on top of a [`ProcessRunner`].

use crate::args::ArgumentBuilder;
use crate::credentials::Credentials;
use crate::error::{Result, SvnError, is_not_working_copy_text};
use crate::parse;
use crate::path::RepositoryPath;
use crate::process::{ProcessCommand, ProcessRunner, TokioProcessRunner};
use crate::types::{BranchEntry, ExecutionResult, WorkingCopyInfo};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Executable used when none is configured.
pub const DEFAULT_EXECUTABLE: &str = "svn";

/// Revision numbers, `{date}` specs and the client's revision keywords.
static REVISION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+|HEAD|BASE|COMMITTED|PREV|\{[^{}\s]+\})$")
        .expect("revision pattern is valid")
});

/// Client settings shared by every operation.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Path to the `svn` executable.
    pub executable: PathBuf,
    /// Credentials appended to every invocation.
    pub credentials: Option<Credentials>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            executable: PathBuf::from(DEFAULT_EXECUTABLE),
            credentials: None,
        }
    }
}

/// Subversion client.
///
/// Every invocation carries `--non-interactive --trust-server-cert` followed
/// by the configured credentials, so the client never waits for input.
/// Required arguments are checked before anything is spawned.
#[derive(Debug, Clone)]
pub struct SvnClient {
    runner: Arc<dyn ProcessRunner>,
    options: ClientOptions,
    cancel: CancellationToken,
}

impl SvnClient {
    /// Create a client that spawns the executable locally.
    #[must_use]
    pub fn new(options: ClientOptions) -> Self {
        Self::with_runner(options, Arc::new(TokioProcessRunner::new()))
    }

    /// Create a client using a custom runner.
    #[must_use]
    pub fn with_runner(options: ClientOptions, runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            runner,
            options,
            cancel: CancellationToken::new(),
        }
    }

    /// Abort in-flight invocations when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token observed by every invocation.
    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Client settings.
    #[must_use]
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Check out `source` into `destination`.
    pub async fn checkout(
        &self,
        source: &RepositoryPath,
        destination: &Path,
        extra: Option<&str>,
    ) -> Result<ExecutionResult> {
        require_path("destination", destination)?;
        debug!(url = %source, dest = %destination.display(), "svn checkout");

        let mut args = ArgumentBuilder::new();
        args.append("checkout")
            .append_quoted(source.absolute_path())
            .append_quoted(path_text(destination))
            .append_extra(extra)?;
        self.execute(args).await
    }

    /// Export `source` into `destination`, optionally at `revision`.
    pub async fn export(
        &self,
        source: &RepositoryPath,
        destination: &Path,
        revision: Option<&str>,
        extra: Option<&str>,
    ) -> Result<ExecutionResult> {
        require_path("destination", destination)?;
        debug!(url = %source, dest = %destination.display(), revision, "svn export");

        let mut args = ArgumentBuilder::new();
        args.append("export");
        append_revision(&mut args, revision)?;
        args.append_quoted(source.absolute_path())
            .append_quoted(path_text(destination))
            .append_extra(extra)?;
        self.execute(args).await
    }

    /// Export a local working copy into `destination`, overwriting existing files.
    pub async fn export_working_copy(
        &self,
        working_copy: &Path,
        destination: &Path,
    ) -> Result<ExecutionResult> {
        require_path("working_copy", working_copy)?;
        require_path("destination", destination)?;
        debug!(
            working_copy = %working_copy.display(),
            dest = %destination.display(),
            "svn export (working copy)"
        );

        let mut args = ArgumentBuilder::new();
        args.append("export")
            .append_quoted(path_text(working_copy))
            .append_quoted(path_text(destination))
            .append("--force");
        self.execute(args).await
    }

    /// Update a working copy to HEAD.
    pub async fn update(&self, working_copy: &Path, extra: Option<&str>) -> Result<ExecutionResult> {
        require_path("working_copy", working_copy)?;
        debug!(path = %working_copy.display(), "svn update");

        let mut args = ArgumentBuilder::new();
        args.append("update")
            .append_quoted(path_text(working_copy))
            .append_extra(extra)?;
        self.execute(args).await
    }

    /// Copy `source` to `destination` with a log message.
    pub async fn copy(
        &self,
        source: &RepositoryPath,
        destination: &RepositoryPath,
        message: &str,
        revision: Option<&str>,
        extra: Option<&str>,
    ) -> Result<ExecutionResult> {
        require_message(message)?;
        debug!(from = %source, to = %destination, revision, "svn copy");

        let mut args = ArgumentBuilder::new();
        args.append("copy");
        append_revision(&mut args, revision)?;
        args.append_quoted(source.absolute_path())
            .append_quoted(destination.absolute_path())
            .append("-m")
            .append_quoted(message)
            .append_extra(extra)?;
        self.execute(args).await
    }

    /// Delete `path` with a log message.
    pub async fn delete(
        &self,
        path: &RepositoryPath,
        message: &str,
        extra: Option<&str>,
    ) -> Result<ExecutionResult> {
        require_message(message)?;
        debug!(url = %path, "svn delete");

        let mut args = ArgumentBuilder::new();
        args.append("delete")
            .append_quoted(path.absolute_path())
            .append("-m")
            .append_quoted(message)
            .append_extra(extra)?;
        self.execute(args).await
    }

    /// Immediate children of `path`. Directory children end with `/`.
    pub async fn enumerate_children(&self, path: &RepositoryPath) -> Result<Vec<RepositoryPath>> {
        let mut args = ArgumentBuilder::new();
        args.append("ls").append_quoted(path.absolute_path());
        let command = args.render_redacted();
        let result = self.execute(args).await?;
        let children = parse::checked_lines(&result, &command)?;
        Ok(children.iter().map(|c| path.join(c)).collect())
    }

    /// Immediate child directories of `path`.
    pub async fn enumerate_directories(&self, path: &RepositoryPath) -> Result<Vec<RepositoryPath>> {
        let children = self.enumerate_children(path).await?;
        Ok(children.into_iter().filter(RepositoryPath::is_directory).collect())
    }

    /// Last-changed revision of `path`.
    pub async fn latest_revision(&self, path: &RepositoryPath) -> Result<String> {
        let mut args = ArgumentBuilder::new();
        args.append("info")
            .append("--xml")
            .append_quoted(path.absolute_path());
        let command = args.render_redacted();
        let result = self.execute(args).await?;
        parse::xml_revision(&result, &command)
    }

    /// Trunk and every branch under `root` with their last commits.
    pub async fn enumerate_branches(&self, root: &RepositoryPath) -> Result<Vec<BranchEntry>> {
        let mut args = ArgumentBuilder::new();
        args.append("ls")
            .append("--xml")
            .append_quoted(root.absolute_path())
            .append_quoted(root.join("branches/").absolute_path());
        let command = args.render_redacted();
        let result = self.execute(args).await?;
        parse::xml_branches(&result, root, &command)
    }

    /// URL and revision of the working copy at `dir`, or `None` if it is not one.
    pub async fn working_copy_info(&self, dir: &Path) -> Result<Option<WorkingCopyInfo>> {
        require_path("working_copy", dir)?;
        let mut args = ArgumentBuilder::new();
        args.append("info")
            .append("--xml")
            .append_quoted(path_text(dir));
        let command = args.render_redacted();
        let result = self.execute(args).await?;

        if is_not_working_copy_text(&result.error_text()) {
            debug!(dir = %dir.display(), "not a working copy");
            return Ok(None);
        }
        parse::xml_working_copy_info(&result, &command).map(Some)
    }

    /// Output of `svn help <command>`.
    pub async fn help(&self, command: &str) -> Result<Vec<String>> {
        let command = command.trim();
        if command.is_empty() || command.starts_with('-') || command.contains(char::is_whitespace)
        {
            return Err(SvnError::invalid_argument(
                "command",
                "expected a single client subcommand name",
            ));
        }
        let mut args = ArgumentBuilder::new();
        args.append("help").append(command);
        let rendered = args.render_redacted();
        let result = self.execute(args).await?;
        parse::checked_lines(&result, &rendered)
    }

    /// Run an arbitrary client subcommand with raw arguments.
    ///
    /// The result is returned as-is; a non-zero exit is not an error.
    pub async fn run_client_command(
        &self,
        name: &str,
        raw_args: Option<&str>,
    ) -> Result<ExecutionResult> {
        let name = name.trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(SvnError::invalid_argument(
                "command",
                "expected a single client subcommand name",
            ));
        }
        let mut args = ArgumentBuilder::new();
        args.append(name).append_extra(raw_args)?;
        self.execute(args).await
    }

    /// The trailing arguments every invocation carries, with secrets hidden.
    #[must_use]
    pub fn preview_command_line(&self) -> String {
        let mut args = ArgumentBuilder::new();
        self.append_trailers(&mut args);
        format!(
            "{} {}",
            self.options.executable.display(),
            args.render_redacted()
        )
    }

    fn append_trailers(&self, args: &mut ArgumentBuilder) {
        args.append("--non-interactive").append("--trust-server-cert");
        if let Some(creds) = &self.options.credentials {
            if !creds.username.is_empty() {
                args.append("--username").append_quoted(creds.username.as_str());
            }
            if let Some(password) = &creds.password {
                args.append("--password").append_sensitive(password.expose());
            }
        }
    }

    async fn execute(&self, mut args: ArgumentBuilder) -> Result<ExecutionResult> {
        self.append_trailers(&mut args);
        let command = ProcessCommand::new(&self.options.executable, args);
        let result = self.runner.run(&command, &self.cancel).await?;
        log_result(&command, &result);
        Ok(result)
    }
}

fn log_result(command: &ProcessCommand, result: &ExecutionResult) {
    for line in &result.output_lines {
        debug!(stream = "stdout", "{line}");
    }
    for line in &result.error_lines {
        if result.succeeded() {
            warn!(stream = "stderr", "{line}");
        } else {
            error!(stream = "stderr", "{line}");
        }
    }
    if result.succeeded() {
        info!(command = %command.redacted(), "svn command complete");
    } else {
        debug!(command = %command.redacted(), exit_code = result.exit_code, "svn command failed");
    }
}

fn append_revision(args: &mut ArgumentBuilder, revision: Option<&str>) -> Result<()> {
    let Some(revision) = revision.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(());
    };
    if !REVISION_PATTERN.is_match(revision) {
        return Err(SvnError::invalid_argument(
            "revision",
            format!("'{revision}' is not a revision number, keyword or {{date}}"),
        ));
    }
    args.append("-r").append(revision);
    Ok(())
}

fn require_message(message: &str) -> Result<()> {
    if message.trim().is_empty() {
        return Err(SvnError::invalid_argument(
            "message",
            "a log message is required",
        ));
    }
    Ok(())
}

fn require_path(field: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(SvnError::invalid_argument(field, "path must not be empty"));
    }
    Ok(())
}

fn path_text(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
