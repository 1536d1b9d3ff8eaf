//! Environment variable configuration support.

use crate::error::{ConfigError, Result};
use crate::types::{LayoutConfig, RepositoryConfig, SvnConfig};
use std::path::PathBuf;

/// Environment variables read by svnbridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SvnEnvVar {
    /// `SVNBRIDGE_REPOSITORY_URL` - root repository URL.
    RepositoryUrl,
    /// `SVNBRIDGE_USERNAME` - account name.
    Username,
    /// `SVNBRIDGE_PASSWORD` - password.
    Password,
    /// `SVNBRIDGE_SVN_EXE` - path to the `svn` executable.
    SvnExe,
    /// `SVNBRIDGE_WORKSPACE_ROOT` - local working copy directory.
    WorkspaceRoot,
    /// `SVNBRIDGE_ADDITIONAL_ARGUMENTS` - raw extra client arguments.
    AdditionalArguments,
    /// `SVNBRIDGE_REPOSITORIES` - `name=remote-path` pairs separated by `;`.
    Repositories,
    /// `SVNBRIDGE_BRANCH` - standard layout branch.
    Branch,
    /// `SVNBRIDGE_TAG` - standard layout tag.
    Tag,
}

impl SvnEnvVar {
    /// Every variable, in documentation order.
    pub const ALL: [Self; 9] = [
        Self::RepositoryUrl,
        Self::Username,
        Self::Password,
        Self::SvnExe,
        Self::WorkspaceRoot,
        Self::AdditionalArguments,
        Self::Repositories,
        Self::Branch,
        Self::Tag,
    ];

    /// Get the environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RepositoryUrl => "SVNBRIDGE_REPOSITORY_URL",
            Self::Username => "SVNBRIDGE_USERNAME",
            Self::Password => "SVNBRIDGE_PASSWORD",
            Self::SvnExe => "SVNBRIDGE_SVN_EXE",
            Self::WorkspaceRoot => "SVNBRIDGE_WORKSPACE_ROOT",
            Self::AdditionalArguments => "SVNBRIDGE_ADDITIONAL_ARGUMENTS",
            Self::Repositories => "SVNBRIDGE_REPOSITORIES",
            Self::Branch => "SVNBRIDGE_BRANCH",
            Self::Tag => "SVNBRIDGE_TAG",
        }
    }

    /// Whether the value must never be printed.
    #[must_use]
    pub const fn is_secret(self) -> bool {
        matches!(self, Self::Password)
    }
}

/// Read the configuration layer supplied by the process environment.
///
/// # Errors
/// Returns [`ConfigError::EnvError`] if a structured variable is malformed.
pub fn env_overrides() -> Result<SvnConfig> {
    env_overrides_from(|name| std::env::var(name).ok())
}

/// Read the environment layer through `lookup`. Empty values count as unset.
///
/// # Errors
/// Returns [`ConfigError::EnvError`] if a structured variable is malformed.
pub fn env_overrides_from<F>(lookup: F) -> Result<SvnConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: SvnEnvVar| lookup(var.as_str()).filter(|v| !v.trim().is_empty());

    let branch = get(SvnEnvVar::Branch);
    let tag = get(SvnEnvVar::Tag);
    let layout = (branch.is_some() || tag.is_some()).then_some(LayoutConfig { branch, tag });

    let repositories = get(SvnEnvVar::Repositories)
        .map(|raw| parse_repositories(&raw))
        .transpose()?;

    Ok(SvnConfig {
        repository_url: get(SvnEnvVar::RepositoryUrl),
        username: get(SvnEnvVar::Username),
        password: get(SvnEnvVar::Password),
        svn_exe_path: get(SvnEnvVar::SvnExe).map(PathBuf::from),
        workspace_root: get(SvnEnvVar::WorkspaceRoot).map(PathBuf::from),
        additional_arguments: get(SvnEnvVar::AdditionalArguments),
        credential: None,
        repositories,
        layout,
    })
}

/// Parse `name=remote-path` pairs separated by `;`.
fn parse_repositories(raw: &str) -> Result<Vec<RepositoryConfig>> {
    raw.split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, remote_path) =
                pair.split_once('=')
                    .ok_or_else(|| ConfigError::EnvError {
                        var: SvnEnvVar::Repositories.as_str().to_string(),
                        message: format!("expected name=remote-path, got '{pair}'"),
                    })?;
            Ok(RepositoryConfig {
                name: name.trim().to_string(),
                remote_path: remote_path.trim().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn reads_plain_values() {
        let config = env_overrides_from(lookup(&[
            ("SVNBRIDGE_REPOSITORY_URL", "https://svn.example.com/repo"),
            ("SVNBRIDGE_USERNAME", "ci"),
            ("SVNBRIDGE_SVN_EXE", "/usr/local/bin/svn"),
        ]))
        .unwrap();
        assert_eq!(
            config.repository_url.as_deref(),
            Some("https://svn.example.com/repo")
        );
        assert_eq!(config.username.as_deref(), Some("ci"));
        assert_eq!(config.svn_exe_path, Some(PathBuf::from("/usr/local/bin/svn")));
        assert_eq!(config.layout, None);
    }

    #[test]
    fn empty_values_are_unset() {
        let config = env_overrides_from(lookup(&[("SVNBRIDGE_USERNAME", "  ")])).unwrap();
        assert_eq!(config, SvnConfig::default());
    }

    #[test]
    fn parses_repository_pairs() {
        let config = env_overrides_from(lookup(&[(
            "SVNBRIDGE_REPOSITORIES",
            "tools=/repos/tools; web = /repos/web ;",
        )]))
        .unwrap();
        let repos = config.repositories.unwrap();
        assert_eq!(repos.len(), 2);
        assert_eq!(repos[1].name, "web");
        assert_eq!(repos[1].remote_path, "/repos/web");
    }

    #[test]
    fn malformed_repository_pair_rejected() {
        let err =
            env_overrides_from(lookup(&[("SVNBRIDGE_REPOSITORIES", "tools")])).unwrap_err();
        assert!(matches!(err, ConfigError::EnvError { ref var, .. } if var == "SVNBRIDGE_REPOSITORIES"));
    }

    #[test]
    fn branch_sets_layout() {
        let config = env_overrides_from(lookup(&[("SVNBRIDGE_BRANCH", "rel-2")])).unwrap();
        assert_eq!(
            config.layout,
            Some(LayoutConfig {
                branch: Some("rel-2".into()),
                tag: None
            })
        );
    }

    #[test]
    fn names_are_prefixed() {
        assert!(SvnEnvVar::ALL.iter().all(|v| v.as_str().starts_with("SVNBRIDGE_")));
        assert!(SvnEnvVar::Password.is_secret());
    }
}
