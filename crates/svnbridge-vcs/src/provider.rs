//! Source-control operations addressed by user paths.
//!
//! [`SourceProvider`] glues a [`RepositoryResolver`] to an [`SvnClient`]:
//! every user path is resolved first, then the matching client operation
//! runs against the resolved URL or workspace.

use crate::client::SvnClient;
use crate::error::{Result, SvnError};
use crate::path::combine;
use crate::resolver::{RepositoryResolver, ResolvedTarget};
use crate::types::{DirectoryEntry, DirectoryListing};
use crate::workspace::{self, SyncOutcome};
use futures::future::try_join_all;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Operations on repository content addressed by user paths.
#[derive(Debug, Clone)]
pub struct SourceProvider {
    client: SvnClient,
    resolver: Arc<dyn RepositoryResolver>,
}

impl SourceProvider {
    /// Create a provider.
    #[must_use]
    pub fn new(client: SvnClient, resolver: Arc<dyn RepositoryResolver>) -> Self {
        Self { client, resolver }
    }

    /// Underlying client.
    #[must_use]
    pub fn client(&self) -> &SvnClient {
        &self.client
    }

    /// Resolve a user path without running anything.
    #[must_use]
    pub fn resolve(&self, user_path: &str) -> ResolvedTarget {
        self.resolver.resolve(user_path)
    }

    /// List the immediate children of `user_path`.
    ///
    /// At the root of a multi-repository configuration the repository names
    /// are listed as directories without contacting the server.
    pub async fn list_directory(&self, user_path: &str) -> Result<DirectoryListing> {
        let display_path = user_path.trim_matches('/');
        let name = display_path.rsplit('/').next().unwrap_or_default().to_string();

        if let Some(names) = self.resolver.synthetic_listing(user_path) {
            debug!(count = names.len(), "listing configured repositories");
            let entries = names
                .into_iter()
                .map(|name| DirectoryEntry::Directory {
                    path: name.clone(),
                    name,
                })
                .collect();
            return Ok(DirectoryListing {
                name,
                path: display_path.to_string(),
                entries,
            });
        }

        let target = self.resolver.resolve(user_path);
        let children = self.client.enumerate_children(&target.target).await?;
        let entries = children
            .iter()
            .map(|child| {
                let name = child.name().to_string();
                let path = if display_path.is_empty() {
                    name.clone()
                } else {
                    combine(display_path, &name)
                };
                if child.is_directory() {
                    DirectoryEntry::Directory { name, path }
                } else {
                    DirectoryEntry::File { name, path }
                }
            })
            .collect();

        Ok(DirectoryListing {
            name,
            path: display_path.to_string(),
            entries,
        })
    }

    /// Sync the workspace for `user_path` and export it to `destination`.
    pub async fn get_latest(&self, user_path: &str, destination: &Path) -> Result<SyncOutcome> {
        let target = self.resolver.resolve(user_path);
        let outcome =
            workspace::sync_workspace(&self.client, &target.target, &target.workspace_dir).await?;

        let command = format!("export {}", target.workspace_dir.display());
        self.client
            .export_working_copy(&target.workspace_dir, destination)
            .await?
            .ensure_success(&command)?;

        info!(
            path = user_path,
            dest = %destination.display(),
            %outcome,
            "exported latest source"
        );
        Ok(outcome)
    }

    /// Sync the workspace for `user_path` without exporting.
    pub async fn update_workspace(&self, user_path: &str) -> Result<SyncOutcome> {
        let target = self.resolver.resolve(user_path);
        workspace::sync_workspace(&self.client, &target.target, &target.workspace_dir).await
    }

    /// Copy `from` to `to` on the server.
    pub async fn branch(&self, from: &str, to: &str, message: &str) -> Result<()> {
        let source = self.resolver.resolve(from);
        let destination = self.resolver.resolve(to);
        let command = format!("copy {} {}", source.target, destination.target);
        self.client
            .copy(&source.target, &destination.target, message, None, None)
            .await?
            .ensure_success(&command)?;
        Ok(())
    }

    /// Last-changed revision of `user_path` as a number.
    pub async fn current_revision(&self, user_path: &str) -> Result<u64> {
        let target = self.resolver.resolve(user_path);
        let revision = self.client.latest_revision(&target.target).await?;
        revision.parse().map_err(|_| {
            SvnError::malformed("info", format!("revision '{revision}' is not a number"))
        })
    }

    /// Check that the root, or every configured repository, is reachable.
    pub async fn validate_connection(&self) -> Result<()> {
        let names = self.resolver.repository_names();
        if names.is_empty() {
            self.current_revision("/").await?;
            return Ok(());
        }
        try_join_all(names.iter().map(|name| self.current_revision(name))).await?;
        Ok(())
    }

    /// Empty the local workspace used for `user_path`.
    pub async fn delete_workspace(&self, user_path: &str) -> Result<()> {
        let target = self.resolver.resolve(user_path);
        debug!(dir = %target.workspace_dir.display(), "clearing workspace");
        workspace::clear_workspace(&target.workspace_dir).await
    }
}
