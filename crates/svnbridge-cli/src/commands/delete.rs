//! Delete command implementation.

use crate::context::Context;
use anyhow::Result;
use clap::Args;
use tracing::info;

/// Arguments for the delete command.
#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// Repository path to delete
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Log message for the commit
    #[arg(short = 'm', long)]
    pub message: String,

    /// Extra arguments passed to svn, replacing the configured ones
    #[arg(long, value_name = "ARGS", allow_hyphen_values = true)]
    pub svn_args: Option<String>,
}

/// Run the delete command.
pub async fn run(args: DeleteArgs, ctx: &Context) -> Result<()> {
    info!(path = %args.path, "running delete command");

    let client = ctx.client()?;
    let target = ctx.target(&args.path)?;
    let extra = ctx.extra_arguments(args.svn_args.as_deref());

    let result = client
        .delete(&target, &args.message, extra.as_deref())
        .await?;
    super::finish(result, "delete", &format!("deleted {target}"))
}
