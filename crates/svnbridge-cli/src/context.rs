//! Per-invocation state shared by every command.

use crate::commands::GlobalArgs;
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use svnbridge_config::{
    ConfigLoader, LayoutConfig, ResolvedSettings, SvnConfig, default_workspace_root,
};
use svnbridge_vcs::{CancellationToken, RepositoryPath, SourceProvider, SvnClient};

/// Merged configuration plus the cancellation token wired to Ctrl-C.
#[derive(Debug)]
pub struct Context {
    loader: ConfigLoader,
    config: SvnConfig,
    working_dir: Option<PathBuf>,
    cancel: CancellationToken,
}

impl Context {
    /// Load configuration for `args`.
    pub fn new(args: &GlobalArgs, cancel: CancellationToken) -> Result<Self> {
        let project_dir = match &args.working_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("cannot determine current directory")?,
        };

        let mut loader = ConfigLoader::new(project_dir).with_cli_overrides(cli_overrides(args));
        if let Some(file) = &args.config {
            loader = loader.with_config_file(file.clone());
        }
        let config = loader.load()?;

        Ok(Self {
            loader,
            config,
            working_dir: args.working_dir.clone(),
            cancel,
        })
    }

    /// The merged configuration layers.
    pub const fn config(&self) -> &SvnConfig {
        &self.config
    }

    /// The loader that produced [`Self::config`].
    pub const fn loader(&self) -> &ConfigLoader {
        &self.loader
    }

    /// Resolve the merged layers into client settings.
    pub fn settings(&self) -> Result<ResolvedSettings> {
        Ok(self.config.resolve(&default_workspace_root())?)
    }

    /// Client bound to this invocation's cancellation token.
    pub fn client(&self) -> Result<SvnClient> {
        Ok(self
            .settings()?
            .client()
            .with_cancellation(self.cancel.clone()))
    }

    /// Provider for user-path operations.
    pub fn provider(&self) -> Result<SourceProvider> {
        let settings = self.settings()?;
        let client = settings.client().with_cancellation(self.cancel.clone());
        Ok(settings.provider(client)?)
    }

    /// Resolve a user path to a repository location.
    pub fn target(&self, user_path: &str) -> Result<RepositoryPath> {
        Ok(self.settings()?.resolver()?.resolve(user_path).target)
    }

    /// Resolve a local path against the `--working-dir` option.
    pub fn local_path(&self, path: &Path) -> PathBuf {
        match &self.working_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Extra client arguments from configuration, overridden by `local`.
    pub fn extra_arguments(&self, local: Option<&str>) -> Option<String> {
        local
            .map(str::to_string)
            .or_else(|| self.config.additional_arguments.clone())
            .filter(|a| !a.trim().is_empty())
    }
}

fn cli_overrides(args: &GlobalArgs) -> SvnConfig {
    let layout = (args.branch.is_some() || args.tag.is_some()).then(|| LayoutConfig {
        branch: args.branch.clone(),
        tag: args.tag.clone(),
    });
    SvnConfig {
        repository_url: args.repository_url.clone(),
        username: args.username.clone(),
        password: None,
        svn_exe_path: args.svn_exe.clone(),
        workspace_root: args.workspace_root.clone(),
        additional_arguments: None,
        credential: None,
        repositories: None,
        layout,
    }
}
