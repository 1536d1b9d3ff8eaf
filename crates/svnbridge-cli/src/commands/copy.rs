//! Copy command implementation.

use crate::context::Context;
use anyhow::Result;
use clap::Args;
use tracing::info;

/// Arguments for the copy command.
#[derive(Args, Debug, Clone)]
pub struct CopyArgs {
    /// Repository path to copy from
    #[arg(value_name = "FROM")]
    pub from: String,

    /// Repository path to copy to
    #[arg(value_name = "TO")]
    pub to: String,

    /// Log message for the commit
    #[arg(short = 'm', long)]
    pub message: String,

    /// Revision of FROM to copy
    #[arg(short = 'r', long)]
    pub revision: Option<String>,

    /// Extra arguments passed to svn, replacing the configured ones
    #[arg(long, value_name = "ARGS", allow_hyphen_values = true)]
    pub svn_args: Option<String>,
}

/// Run the copy command.
pub async fn run(args: CopyArgs, ctx: &Context) -> Result<()> {
    info!(from = %args.from, to = %args.to, "running copy command");

    let client = ctx.client()?;
    let source = ctx.target(&args.from)?;
    let destination = ctx.target(&args.to)?;
    let extra = ctx.extra_arguments(args.svn_args.as_deref());

    let result = client
        .copy(
            &source,
            &destination,
            &args.message,
            args.revision.as_deref(),
            extra.as_deref(),
        )
        .await?;
    super::finish(
        result,
        "copy",
        &format!("copied {source} to {destination}"),
    )
}
