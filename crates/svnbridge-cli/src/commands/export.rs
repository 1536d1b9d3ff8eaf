//! Export command implementation.

use crate::context::Context;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Arguments for the export command.
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Repository path to export
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Local directory to export into
    #[arg(value_name = "DIR")]
    pub destination: PathBuf,

    /// Revision to export: a number, HEAD, BASE, COMMITTED, PREV or {DATE}
    #[arg(short = 'r', long)]
    pub revision: Option<String>,

    /// Extra arguments passed to svn, replacing the configured ones
    #[arg(long, value_name = "ARGS", allow_hyphen_values = true)]
    pub svn_args: Option<String>,
}

/// Run the export command.
pub async fn run(args: ExportArgs, ctx: &Context) -> Result<()> {
    info!(path = %args.path, revision = ?args.revision, "running export command");

    let client = ctx.client()?;
    let source = ctx.target(&args.path)?;
    let destination = ctx.local_path(&args.destination);
    let extra = ctx.extra_arguments(args.svn_args.as_deref());

    let result = client
        .export(
            &source,
            &destination,
            args.revision.as_deref(),
            extra.as_deref(),
        )
        .await?;
    super::finish(
        result,
        "export",
        &format!("exported {source} to {}", destination.display()),
    )
}
