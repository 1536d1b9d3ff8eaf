//! Revision command implementation.

use crate::context::Context;
use crate::output::{self, json};
use anyhow::Result;
use clap::Args;
use tracing::info;

/// Arguments for the revision command.
#[derive(Args, Debug, Clone)]
pub struct RevisionArgs {
    /// Repository path to inspect
    #[arg(value_name = "PATH", default_value = "/")]
    pub path: String,
}

/// Run the revision command.
pub async fn run(args: RevisionArgs, ctx: &Context) -> Result<()> {
    info!(path = %args.path, "running revision command");

    let revision = ctx.provider()?.current_revision(&args.path).await?;
    if json::is_enabled() {
        json::print_success(revision);
    } else {
        output::line(&revision.to_string());
    }
    Ok(())
}
