//! Update command implementation.

use crate::context::Context;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Arguments for the update command.
#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    /// Working copy to update
    #[arg(value_name = "DIR", default_value = ".")]
    pub working_copy: PathBuf,

    /// Extra arguments passed to svn, replacing the configured ones
    #[arg(long, value_name = "ARGS", allow_hyphen_values = true)]
    pub svn_args: Option<String>,
}

/// Run the update command.
pub async fn run(args: UpdateArgs, ctx: &Context) -> Result<()> {
    info!(dir = %args.working_copy.display(), "running update command");

    let client = ctx.client()?;
    let working_copy = ctx.local_path(&args.working_copy);
    let extra = ctx.extra_arguments(args.svn_args.as_deref());

    let result = client.update(&working_copy, extra.as_deref()).await?;
    super::finish(
        result,
        "update",
        &format!("updated {}", working_copy.display()),
    )
}
