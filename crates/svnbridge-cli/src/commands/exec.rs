//! Passthrough to arbitrary svn subcommands.

use crate::context::Context;
use crate::output::{self, json};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tracing::info;

/// Arguments for the svn-help command.
#[derive(Args, Debug, Clone)]
pub struct SvnHelpArgs {
    /// svn subcommand to describe
    #[arg(value_name = "COMMAND")]
    pub command: String,
}

/// Arguments for the exec command.
#[derive(Args, Debug, Clone)]
pub struct ExecArgs {
    /// svn subcommand to run
    #[arg(required = true, value_name = "COMMAND")]
    pub command: String,

    /// Arguments for the subcommand, split like a shell would
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<String>,

    /// Print the command line that would run, with secrets hidden, and exit
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
struct ExecReport<'a> {
    exit_code: i32,
    output: &'a [String],
    errors: &'a [String],
}

/// Run the svn-help command.
pub async fn run_help(args: SvnHelpArgs, ctx: &Context) -> Result<()> {
    info!(command = %args.command, "running svn-help command");

    let lines = ctx.client()?.help(&args.command).await?;
    if json::is_enabled() {
        json::print_success(&lines);
    } else {
        for line in &lines {
            output::line(line);
        }
    }
    Ok(())
}

/// Run the exec command. Returns the client's exit code.
pub async fn run(args: ExecArgs, ctx: &Context) -> Result<i32> {
    info!(command = %args.command, "running exec command");

    let client = ctx.client()?;
    // Re-quote so the adapter splits the arguments back identically.
    let raw = (!args.args.is_empty()).then(|| shell_words::join(&args.args));

    if args.dry_run {
        output::line(&format!(
            "{} {}{}",
            args.command,
            raw.as_deref().map(|r| format!("{r} ")).unwrap_or_default(),
            client.preview_command_line()
        ));
        return Ok(0);
    }

    let result = client
        .run_client_command(&args.command, raw.as_deref())
        .await?;

    if json::is_enabled() {
        json::print_success(ExecReport {
            exit_code: result.exit_code,
            output: &result.output_lines,
            errors: &result.error_lines,
        });
    } else {
        for line in &result.output_lines {
            output::line(line);
        }
        for line in &result.error_lines {
            eprintln!("{line}");
        }
    }
    Ok(result.exit_code)
}
