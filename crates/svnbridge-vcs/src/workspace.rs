//! Local working copies kept in step with a remote URL.

use crate::client::SvnClient;
use crate::error::{Result, SvnError};
use crate::path::RepositoryPath;
use crate::resolver::urls_match;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// What [`sync_workspace`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The directory held no working copy and was checked out fresh.
    CheckedOut,
    /// The working copy pointed elsewhere; it was wiped and checked out again.
    Recreated,
    /// The working copy was updated in place.
    Updated,
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CheckedOut => write!(f, "checked out"),
            Self::Recreated => write!(f, "recreated"),
            Self::Updated => write!(f, "updated"),
        }
    }
}

/// Bring the working copy at `workspace_dir` to the head of `target`.
pub async fn sync_workspace(
    client: &SvnClient,
    target: &RepositoryPath,
    workspace_dir: &Path,
) -> Result<SyncOutcome> {
    create_dir(workspace_dir).await?;

    let target_url = target.absolute_path();
    let outcome = match client.working_copy_info(workspace_dir).await? {
        None => {
            debug!(dir = %workspace_dir.display(), "no working copy, checking out");
            checkout(client, target, workspace_dir).await?;
            SyncOutcome::CheckedOut
        }
        Some(info) if !urls_match(&info.url, &target_url) => {
            info!(
                dir = %workspace_dir.display(),
                current = %info.url,
                target = %target_url,
                "working copy points elsewhere, recreating"
            );
            clear_workspace(workspace_dir).await?;
            checkout(client, target, workspace_dir).await?;
            SyncOutcome::Recreated
        }
        Some(info) => {
            debug!(dir = %workspace_dir.display(), revision = %info.revision, "updating working copy");
            let command = format!("update {}", workspace_dir.display());
            client
                .update(workspace_dir, None)
                .await?
                .ensure_success(&command)?;
            SyncOutcome::Updated
        }
    };
    Ok(outcome)
}

/// Remove everything inside `dir`, leaving an empty directory.
pub async fn clear_workspace(dir: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(SvnError::io(dir, e)),
    }
    create_dir(dir).await
}

async fn checkout(client: &SvnClient, target: &RepositoryPath, dir: &Path) -> Result<()> {
    let command = format!("checkout {target}");
    client
        .checkout(target, dir, None)
        .await?
        .ensure_success(&command)?;
    Ok(())
}

async fn create_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| SvnError::io(dir, e))
}
