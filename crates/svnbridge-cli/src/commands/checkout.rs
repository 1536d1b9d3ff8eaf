//! Checkout command implementation.

use crate::context::Context;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Arguments for the checkout command.
#[derive(Args, Debug, Clone)]
pub struct CheckoutArgs {
    /// Repository path to check out
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Local directory to create the working copy in
    #[arg(value_name = "DIR")]
    pub destination: PathBuf,

    /// Extra arguments passed to svn, replacing the configured ones
    #[arg(long, value_name = "ARGS", allow_hyphen_values = true)]
    pub svn_args: Option<String>,
}

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    info!(path = %args.path, "running checkout command");

    let client = ctx.client()?;
    let source = ctx.target(&args.path)?;
    let destination = ctx.local_path(&args.destination);
    let extra = ctx.extra_arguments(args.svn_args.as_deref());

    let result = client
        .checkout(&source, &destination, extra.as_deref())
        .await?;
    super::finish(
        result,
        "checkout",
        &format!("checked out {source} to {}", destination.display()),
    )
}
