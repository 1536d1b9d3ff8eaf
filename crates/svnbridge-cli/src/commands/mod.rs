//! CLI commands for svnbridge.

// Client operations
pub mod branches;
pub mod checkout;
pub mod copy;
pub mod delete;
pub mod exec;
pub mod export;
pub mod ls;
pub mod revision;
pub mod update;

// Workspace and repository operations
pub mod config;
pub mod workspace;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// svnbridge - drive the Subversion command-line client from automation
///
/// Paths are given relative to the configured repository URL. With named
/// repositories configured, the first path segment selects the repository.
#[derive(Parser, Debug)]
#[command(name = "svnbridge")]
#[command(author = "svnbridge Contributors")]
#[command(version)]
#[command(about = "Drive the Subversion command-line client from automation", long_about = None)]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
#[command(styles = get_styles())]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Do not output any message
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Increase the verbosity of messages: -v for info, -vv for debug, -vvv for trace
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Use the specified directory as working directory
    #[arg(short = 'd', long = "working-dir", global = true, value_name = "DIR")]
    pub working_dir: Option<PathBuf>,

    /// Read project configuration from FILE instead of ./svnbridge.json
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Repository root URL
    #[arg(long, global = true, value_name = "URL")]
    pub repository_url: Option<String>,

    /// Account name passed to the client
    #[arg(short = 'u', long, global = true)]
    pub username: Option<String>,

    /// Path to the svn executable
    #[arg(long, global = true, value_name = "PATH")]
    pub svn_exe: Option<PathBuf>,

    /// Directory holding local working copies
    #[arg(long, global = true, value_name = "DIR")]
    pub workspace_root: Option<PathBuf>,

    /// Work on /branches/NAME of a standard layout
    #[arg(long, global = true, conflicts_with = "tag")]
    pub branch: Option<String>,

    /// Work on /tags/NAME of a standard layout
    #[arg(long, global = true)]
    pub tag: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check out a repository path into a local directory
    #[command(visible_alias = "co")]
    Checkout(checkout::CheckoutArgs),

    /// Export a repository path without working copy metadata
    Export(export::ExportArgs),

    /// Update a local working copy
    #[command(visible_alias = "up")]
    Update(update::UpdateArgs),

    /// Copy one repository path to another, e.g. to create a branch
    #[command(visible_alias = "cp")]
    Copy(copy::CopyArgs),

    /// Delete a repository path
    #[command(visible_alias = "rm")]
    Delete(delete::DeleteArgs),

    /// List the children of a repository path
    #[command(visible_alias = "list")]
    Ls(ls::LsArgs),

    /// Show the last-changed revision of a repository path
    Revision(revision::RevisionArgs),

    /// List trunk and branches with their last commits
    Branches(branches::BranchesArgs),

    /// Report branches with commits since a saved snapshot
    Changes(branches::ChangesArgs),

    /// Show help for an svn subcommand
    #[command(name = "svn-help")]
    SvnHelp(exec::SvnHelpArgs),

    /// Run an arbitrary svn subcommand with the configured credentials
    Exec(exec::ExecArgs),

    /// Check out or update the workspace of a path, then export it
    #[command(name = "get-latest")]
    GetLatest(workspace::GetLatestArgs),

    /// Check out or update the workspace of a path
    Sync(workspace::SyncArgs),

    /// Create a branch by copying one repository path to another
    Branch(workspace::BranchArgs),

    /// Remove the local workspace of a path
    #[command(name = "delete-workspace")]
    DeleteWorkspace(workspace::DeleteWorkspaceArgs),

    /// Check that the repository and every named repository are reachable
    #[command(name = "validate-connection")]
    ValidateConnection(workspace::ValidateConnectionArgs),

    /// Show or validate the effective configuration
    Config(config::ConfigArgs),
}

/// Output format for commands that support it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Get clap styles for colored help
const fn get_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Green.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Green.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default())
        .placeholder(clap::builder::styling::AnsiColor::Yellow.on_default())
}

/// Report a finished client invocation, failing on a non-zero exit.
pub(crate) fn finish(
    result: svnbridge_vcs::ExecutionResult,
    command: &str,
    done: &str,
) -> anyhow::Result<()> {
    let result = result.ensure_success(command)?;
    if crate::output::json::is_enabled() {
        crate::output::json::print_success(&result.output_lines);
    } else {
        for line in &result.output_lines {
            crate::output::dim(line);
        }
        crate::output::success(done);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "svnbridge",
            "ls",
            "trunk",
            "--repository-url",
            "https://svn.example.com/repo",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.global.verbose, 2);
        assert_eq!(
            cli.global.repository_url.as_deref(),
            Some("https://svn.example.com/repo")
        );
        assert!(matches!(cli.command, Commands::Ls(_)));
    }

    #[test]
    fn branch_and_tag_conflict() {
        let err = Cli::try_parse_from(["svnbridge", "--branch", "b", "--tag", "t", "revision"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
