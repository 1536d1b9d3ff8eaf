//! svnbridge CLI - drive the Subversion command-line client from automation.
//!
//! Every command runs the `svn` executable with the configured credentials,
//! keeps passwords out of logs, and stops the client when Ctrl-C is pressed.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod commands;
mod context;
mod output;

use clap::Parser;
use commands::{Cli, Commands};
use context::Context;
use std::process::ExitCode;
use svnbridge_vcs::{CancellationToken, SvnError};
use tracing::{Level, debug};
use tracing_subscriber::EnvFilter;

/// Exit code reported when the user interrupts a command.
const EXIT_CANCELLED: u8 = 130;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.global.verbose {
        0 if cli.global.quiet => Level::ERROR,
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    output::init(cli.global.quiet);
    if matches!(cli.global.format, commands::OutputFormat::Json) {
        output::json::enable();
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            output::error(&format!("failed to create runtime: {e}"));
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    let ctx = match Context::new(&cli.global, cancel.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output::json::print_error(e);
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(async {
        let interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("interrupt received, cancelling");
                interrupt.cancel();
            }
        });
        run_command(cli.command, &ctx).await
    });

    match result {
        Ok(code) => code,
        Err(e) if is_cancelled(&e) => {
            output::error("interrupted");
            ExitCode::from(EXIT_CANCELLED)
        }
        Err(e) => {
            output::json::print_error(e);
            ExitCode::FAILURE
        }
    }
}

fn is_cancelled(err: &anyhow::Error) -> bool {
    err.downcast_ref::<SvnError>()
        .is_some_and(SvnError::is_cancelled)
}

async fn run_command(command: Commands, ctx: &Context) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Checkout(args) => commands::checkout::run(args, ctx).await?,
        Commands::Export(args) => commands::export::run(args, ctx).await?,
        Commands::Update(args) => commands::update::run(args, ctx).await?,
        Commands::Copy(args) => commands::copy::run(args, ctx).await?,
        Commands::Delete(args) => commands::delete::run(args, ctx).await?,
        Commands::Ls(args) => commands::ls::run(args, ctx).await?,
        Commands::Revision(args) => commands::revision::run(args, ctx).await?,
        Commands::Branches(args) => commands::branches::run(args, ctx).await?,
        Commands::Changes(args) => commands::branches::run_changes(args, ctx).await?,
        Commands::SvnHelp(args) => commands::exec::run_help(args, ctx).await?,
        Commands::Exec(args) => {
            let code = commands::exec::run(args, ctx).await?;
            return Ok(exit_code(code));
        }
        Commands::GetLatest(args) => commands::workspace::run_get_latest(args, ctx).await?,
        Commands::Sync(args) => commands::workspace::run_sync(args, ctx).await?,
        Commands::Branch(args) => commands::workspace::run_branch(args, ctx).await?,
        Commands::DeleteWorkspace(args) => {
            commands::workspace::run_delete_workspace(args, ctx).await?;
        }
        Commands::ValidateConnection(args) => {
            commands::workspace::run_validate_connection(args, ctx).await?;
        }
        Commands::Config(args) => commands::config::run(args, ctx).await?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Map a client exit code onto the process exit code.
fn exit_code(code: i32) -> ExitCode {
    match u8::try_from(code) {
        Ok(code) => ExitCode::from(code),
        Err(_) => ExitCode::FAILURE,
    }
}
