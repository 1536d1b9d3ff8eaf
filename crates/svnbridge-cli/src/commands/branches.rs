//! Branch listing and commit polling.

use crate::context::Context;
use crate::output::{self, json, table::Table};
use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};
use svnbridge_vcs::{CommitMap, RepositoryMonitor, RepositoryPath, changed_branches};
use tracing::{debug, info};

/// Arguments for the branches command.
#[derive(Args, Debug, Clone)]
pub struct BranchesArgs {
    /// Repository path holding trunk/ and branches/, defaults to the root URL
    #[arg(value_name = "PATH")]
    pub path: Option<String>,
}

/// Arguments for the changes command.
#[derive(Args, Debug, Clone)]
pub struct ChangesArgs {
    /// Repository path holding trunk/ and branches/, defaults to the root URL
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// JSON file holding the previous snapshot; rewritten with the current one
    #[arg(long, value_name = "FILE")]
    pub snapshot: PathBuf,

    /// Report changes without rewriting the snapshot
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
struct ChangeReport<'a> {
    changed: &'a [String],
    commits: &'a CommitMap,
}

fn repository_root(ctx: &Context, path: Option<&str>) -> Result<RepositoryPath> {
    match path {
        Some(path) => ctx.target(path),
        None => Ok(RepositoryPath::root(ctx.settings()?.repository_url()?)?),
    }
}

/// Run the branches command.
pub async fn run(args: BranchesArgs, ctx: &Context) -> Result<()> {
    info!("running branches command");

    let root = repository_root(ctx, args.path.as_deref())?;
    let branches = ctx.client()?.enumerate_branches(&root).await?;

    if json::is_enabled() {
        json::print_success(&branches);
        return Ok(());
    }

    let mut table = Table::new();
    table.headers(["Branch", "Revision", "Author", "Date"]);
    for branch in &branches {
        table.styled_row(vec![
            table.accent_cell(branch.branch_name()),
            comfy_table::Cell::new(&branch.revision),
            comfy_table::Cell::new(branch.author.as_deref().unwrap_or("-")),
            table.dim_cell(branch.date.format("%Y-%m-%d %H:%M")),
        ]);
    }
    table.print();
    Ok(())
}

/// Run the changes command.
pub async fn run_changes(args: ChangesArgs, ctx: &Context) -> Result<()> {
    info!(snapshot = %args.snapshot.display(), "running changes command");

    let snapshot_path = ctx.local_path(&args.snapshot);
    let previous = read_snapshot(&snapshot_path)?;

    let root = repository_root(ctx, args.path.as_deref())?;
    let monitor = RepositoryMonitor::new(ctx.client()?, &root.absolute_path())?;
    let current = monitor.current_commits().await?;
    let changed = changed_branches(&previous, &current);
    debug!(changed = changed.len(), "compared snapshots");

    if !args.dry_run {
        write_snapshot(&snapshot_path, &current)?;
    }

    if json::is_enabled() {
        json::print_success(ChangeReport {
            changed: &changed,
            commits: &current,
        });
    } else if changed.is_empty() {
        output::info("no new commits");
    } else {
        for name in &changed {
            output::line(&format!("{name} r{}", current.get(name).map_or("?", String::as_str)));
        }
    }
    Ok(())
}

/// Load a snapshot, treating a missing file as empty.
fn read_snapshot(path: &Path) -> Result<CommitMap> {
    match std::fs::read_to_string(path) {
        Ok(content) => sonic_rs::from_str(&content)
            .with_context(|| format!("invalid snapshot {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CommitMap::new()),
        Err(e) => Err(e).with_context(|| format!("cannot read snapshot {}", path.display())),
    }
}

fn write_snapshot(path: &Path, commits: &CommitMap) -> Result<()> {
    let json = sonic_rs::to_string_pretty(commits)?;
    std::fs::write(path, json).with_context(|| format!("cannot write snapshot {}", path.display()))
}
