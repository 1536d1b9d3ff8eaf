//! Configuration loader with hierarchical merging.

use crate::env::env_overrides_from;
use crate::error::{ConfigError, Result};
use crate::types::{ResolvedSettings, SvnConfig, default_workspace_root};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project configuration file name.
pub const PROJECT_CONFIG_FILE: &str = "svnbridge.json";

/// Configuration source in hierarchy order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigSource {
    /// Built-in defaults.
    Defaults = 0,
    /// User global configuration.
    Global = 1,
    /// Project-local configuration.
    Project = 2,
    /// Environment variables.
    Environment = 3,
    /// CLI arguments.
    Cli = 4,
}

impl ConfigSource {
    /// Get description for display.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Defaults => "built-in defaults",
            Self::Global => "global configuration",
            Self::Project => "project configuration",
            Self::Environment => "environment variables",
            Self::Cli => "command-line arguments",
        }
    }
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Loads and merges configuration layers.
///
/// Layers apply in [`ConfigSource`] order, later layers overriding earlier
/// ones field by field. Missing files are skipped; malformed files are errors.
pub struct ConfigLoader {
    project_dir: PathBuf,
    global_path: Option<PathBuf>,
    config_file: Option<PathBuf>,
    env_lookup: EnvLookup,
    cli: SvnConfig,
}

impl std::fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("project_dir", &self.project_dir)
            .field("global_path", &self.global_path)
            .field("config_file", &self.config_file)
            .finish()
    }
}

impl ConfigLoader {
    /// Create a loader rooted at `project_dir`.
    #[must_use]
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            global_path: default_global_path(),
            config_file: None,
            env_lookup: Box::new(|name| std::env::var(name).ok()),
            cli: SvnConfig::default(),
        }
    }

    /// Use `path` as the global configuration file, or none.
    #[must_use]
    pub fn with_global_path(mut self, path: Option<PathBuf>) -> Self {
        self.global_path = path;
        self
    }

    /// Read the project layer from `path` instead of `svnbridge.json`.
    ///
    /// An explicitly named file must exist.
    #[must_use]
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Read environment variables through `lookup`.
    #[must_use]
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env_lookup = Box::new(lookup);
        self
    }

    /// Values from the command line, applied last.
    #[must_use]
    pub fn with_cli_overrides(mut self, cli: SvnConfig) -> Self {
        self.cli = cli;
        self
    }

    /// Global configuration file path, if one applies.
    #[must_use]
    pub fn global_config_path(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Project configuration file path.
    #[must_use]
    pub fn project_config_path(&self) -> PathBuf {
        self.config_file
            .clone()
            .unwrap_or_else(|| self.project_dir.join(PROJECT_CONFIG_FILE))
    }

    /// Merge every layer.
    ///
    /// # Errors
    /// Returns an error if a present file is unreadable or malformed, or if
    /// an environment variable is malformed.
    pub fn load(&self) -> Result<SvnConfig> {
        let mut config = SvnConfig::default();

        if let Some(path) = &self.global_path {
            if let Some(global) = load_optional(path)? {
                debug!(path = %path.display(), "applying {}", ConfigSource::Global.description());
                config.merge(&global);
            }
        }

        let project_path = self.project_config_path();
        let project = if self.config_file.is_some() {
            Some(load_file(&project_path)?)
        } else {
            load_optional(&project_path)?
        };
        if let Some(project) = project {
            debug!(path = %project_path.display(), "applying {}", ConfigSource::Project.description());
            config.merge(&project);
        }

        let env = env_overrides_from(&self.env_lookup)?;
        config.merge(&env);
        config.merge(&self.cli);
        Ok(config)
    }

    /// Merge every layer and resolve the result.
    ///
    /// # Errors
    /// Returns an error if loading or resolution fails.
    pub fn resolve(&self) -> Result<ResolvedSettings> {
        self.load()?.resolve(&default_workspace_root())
    }
}

fn default_global_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "svnbridge")
        .map(|dirs| dirs.config_dir().join("config.json"))
}

/// Load a configuration file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_file(path: &Path) -> Result<SvnConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    sonic_rs::from_str(&content).map_err(|e| ConfigError::json(path, &e))
}

fn load_optional(path: &Path) -> Result<Option<SvnConfig>> {
    match load_file(path) {
        Ok(config) => Ok(Some(config)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn loader(dir: &TempDir) -> ConfigLoader {
        ConfigLoader::new(dir.path())
            .with_global_path(None)
            .with_env_lookup(|_| None)
    }

    #[test]
    fn missing_files_yield_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(loader(&dir).load().unwrap(), SvnConfig::default());
    }

    #[test]
    fn layers_apply_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.json");
        std::fs::write(
            &global,
            r#"{"repository-url": "https://global", "username": "g", "svn-exe-path": "/g/svn"}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join(PROJECT_CONFIG_FILE),
            r#"{"repository-url": "https://project", "username": "p"}"#,
        )
        .unwrap();

        let config = ConfigLoader::new(dir.path())
            .with_global_path(Some(global))
            .with_env_lookup(|name| {
                (name == "SVNBRIDGE_USERNAME").then(|| "from-env".to_string())
            })
            .with_cli_overrides(SvnConfig {
                repository_url: Some("https://cli".into()),
                ..Default::default()
            })
            .load()
            .unwrap();

        assert_eq!(config.repository_url.as_deref(), Some("https://cli"));
        assert_eq!(config.username.as_deref(), Some("from-env"));
        assert_eq!(config.svn_exe_path, Some(PathBuf::from("/g/svn")));
    }

    #[test]
    fn malformed_project_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PROJECT_CONFIG_FILE), "{ not json").unwrap();
        let err = loader(&dir).load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidJson { .. }));
    }

    #[test]
    fn explicit_config_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = loader(&dir)
            .with_config_file(dir.path().join("missing.json"))
            .load()
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn source_order() {
        assert!(ConfigSource::Defaults < ConfigSource::Global);
        assert!(ConfigSource::Environment < ConfigSource::Cli);
        assert_eq!(ConfigSource::Cli.description(), "command-line arguments");
    }
}
