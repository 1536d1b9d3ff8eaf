//! List command implementation.

use crate::context::Context;
use crate::output::{self, json, table::Table};
use anyhow::Result;
use clap::Args;
use svnbridge_vcs::DirectoryEntry;
use tracing::info;

/// Arguments for the ls command.
#[derive(Args, Debug, Clone)]
pub struct LsArgs {
    /// Repository path to list
    #[arg(value_name = "PATH", default_value = "/")]
    pub path: String,

    /// Only list directories
    #[arg(long)]
    pub dirs_only: bool,
}

/// Run the ls command.
pub async fn run(args: LsArgs, ctx: &Context) -> Result<()> {
    info!(path = %args.path, "running ls command");

    let provider = ctx.provider()?;
    let mut listing = provider.list_directory(&args.path).await?;
    if args.dirs_only {
        listing.entries.retain(DirectoryEntry::is_directory);
    }

    if json::is_enabled() {
        json::print_success(&listing);
        return Ok(());
    }

    if listing.entries.is_empty() {
        output::info("(empty)");
        return Ok(());
    }

    let mut table = Table::new();
    for entry in &listing.entries {
        if entry.is_directory() {
            table.styled_row(vec![
                table.accent_cell(format!("{}/", entry.name())),
                table.dim_cell(entry.path()),
            ]);
        } else {
            table.row([entry.name(), entry.path()]);
        }
    }
    table.print();
    Ok(())
}
