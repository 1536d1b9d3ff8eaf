//! Operations on the local workspaces behind repository paths.

use crate::context::Context;
use crate::output::{self, json};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Arguments for the get-latest command.
#[derive(Args, Debug, Clone)]
pub struct GetLatestArgs {
    /// Repository path to fetch
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Local directory to export the sources into
    #[arg(value_name = "DIR")]
    pub destination: PathBuf,
}

/// Arguments for the sync command.
#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// Repository path whose workspace to bring up to date
    #[arg(value_name = "PATH", default_value = "/")]
    pub path: String,
}

/// Arguments for the branch command.
#[derive(Args, Debug, Clone)]
pub struct BranchArgs {
    /// Repository path to branch from
    #[arg(value_name = "FROM")]
    pub from: String,

    /// Repository path of the new branch
    #[arg(value_name = "TO")]
    pub to: String,

    /// Log message for the commit
    #[arg(short = 'm', long)]
    pub message: String,
}

/// Arguments for the delete-workspace command.
#[derive(Args, Debug, Clone)]
pub struct DeleteWorkspaceArgs {
    /// Repository path whose workspace to remove
    #[arg(value_name = "PATH", default_value = "/")]
    pub path: String,
}

/// Arguments for the validate-connection command.
#[derive(Args, Debug, Clone)]
pub struct ValidateConnectionArgs {}

#[derive(Debug, Serialize)]
struct SyncReport {
    outcome: String,
    workspace: PathBuf,
}

/// Run the get-latest command.
pub async fn run_get_latest(args: GetLatestArgs, ctx: &Context) -> Result<()> {
    info!(path = %args.path, "running get-latest command");

    let provider = ctx.provider()?;
    let destination = ctx.local_path(&args.destination);
    let workspace = provider.resolve(&args.path).workspace_dir;
    let outcome = provider.get_latest(&args.path, &destination).await?;

    if json::is_enabled() {
        json::print_success(SyncReport {
            outcome: outcome.to_string(),
            workspace,
        });
    } else {
        output::success(&format!(
            "workspace {outcome}, exported to {}",
            destination.display()
        ));
    }
    Ok(())
}

/// Run the sync command.
pub async fn run_sync(args: SyncArgs, ctx: &Context) -> Result<()> {
    info!(path = %args.path, "running sync command");

    let provider = ctx.provider()?;
    let workspace = provider.resolve(&args.path).workspace_dir;
    let outcome = provider.update_workspace(&args.path).await?;

    if json::is_enabled() {
        json::print_success(SyncReport {
            outcome: outcome.to_string(),
            workspace,
        });
    } else {
        output::success(&format!("{} {outcome}", workspace.display()));
    }
    Ok(())
}

/// Run the branch command.
pub async fn run_branch(args: BranchArgs, ctx: &Context) -> Result<()> {
    info!(from = %args.from, to = %args.to, "running branch command");

    ctx.provider()?
        .branch(&args.from, &args.to, &args.message)
        .await?;
    if json::is_enabled() {
        json::print_success(&args.to);
    } else {
        output::success(&format!("created {} from {}", args.to, args.from));
    }
    Ok(())
}

/// Run the delete-workspace command.
pub async fn run_delete_workspace(args: DeleteWorkspaceArgs, ctx: &Context) -> Result<()> {
    info!(path = %args.path, "running delete-workspace command");

    let provider = ctx.provider()?;
    let workspace = provider.resolve(&args.path).workspace_dir;
    provider.delete_workspace(&args.path).await?;
    if json::is_enabled() {
        json::print_success(&workspace);
    } else {
        output::success(&format!("cleared {}", workspace.display()));
    }
    Ok(())
}

/// Run the validate-connection command.
pub async fn run_validate_connection(_args: ValidateConnectionArgs, ctx: &Context) -> Result<()> {
    info!("running validate-connection command");

    let start = std::time::Instant::now();
    ctx.provider()?.validate_connection().await?;
    if json::is_enabled() {
        json::print_success(true);
    } else {
        output::success(&format!(
            "connection ok ({})",
            output::format_duration(start.elapsed())
        ));
    }
    Ok(())
}
