//! Configuration schema and its resolution into client objects.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use svnbridge_vcs::{
    ClientOptions, Connection, ConnectionOverrides, CredentialSource, DEFAULT_EXECUTABLE,
    LayoutSelection, MultiRepositoryResolver, RepositoryDescriptor, RepositoryResolver, Secret,
    SourceProvider, StandardLayoutResolver, SvnClient, UsernamePassword, resolve_connection,
};

/// One configuration layer. Every field is optional so layers can be merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SvnConfig {
    /// Root repository URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,

    /// Account name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Password. Never serialized back out.
    #[serde(skip_serializing)]
    pub password: Option<String>,

    /// Path to the `svn` executable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svn_exe_path: Option<PathBuf>,

    /// Directory holding local working copies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    /// Raw arguments appended to commands that accept them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_arguments: Option<String>,

    /// Host-provided credential record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<CredentialConfig>,

    /// Named sub-paths of the repository URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repositories: Option<Vec<RepositoryConfig>>,

    /// Standard layout selection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutConfig>,
}

/// Credential record in one of the shapes a host may store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "kebab-case")]
pub enum CredentialConfig {
    /// URL, username and password in one record.
    Legacy {
        /// Repository URL.
        #[serde(default)]
        repository_url: Option<String>,
        /// Account name.
        #[serde(default)]
        username: Option<String>,
        /// Password.
        #[serde(default, skip_serializing)]
        password: Option<String>,
    },
    /// Repository resource with separately stored username and password.
    Resource {
        /// Repository URL.
        #[serde(default)]
        repository_url: Option<String>,
        /// Account name.
        #[serde(default)]
        username: Option<String>,
        /// Password.
        #[serde(default, skip_serializing)]
        password: Option<String>,
    },
}

impl CredentialConfig {
    fn to_source(&self) -> CredentialSource {
        match self {
            Self::Legacy {
                repository_url,
                username,
                password,
            } => CredentialSource::Legacy {
                repository_url: repository_url.clone(),
                username: username.clone(),
                password: password.as_deref().map(Secret::new),
            },
            Self::Resource {
                repository_url,
                username,
                password,
            } => CredentialSource::Resource {
                repository_url: repository_url.clone(),
                credentials: (username.is_some() || password.is_some()).then(|| {
                    UsernamePassword {
                        username: username.clone(),
                        password: password.as_deref().map(Secret::new),
                    }
                }),
            },
        }
    }
}

/// A named repository below the root URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RepositoryConfig {
    /// Name matched against the first path segment.
    pub name: String,
    /// Path below the root URL.
    #[serde(default)]
    pub remote_path: String,
}

/// Branch or tag to work on in a standard layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LayoutConfig {
    /// Branch name below `/branches`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Tag name below `/tags`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl SvnConfig {
    /// Overlay `other` onto `self`; values set in `other` win.
    pub fn merge(&mut self, other: &Self) {
        fn take<T: Clone>(slot: &mut Option<T>, value: Option<&T>) {
            if let Some(v) = value {
                *slot = Some(v.clone());
            }
        }
        take(&mut self.repository_url, other.repository_url.as_ref());
        take(&mut self.username, other.username.as_ref());
        take(&mut self.password, other.password.as_ref());
        take(&mut self.svn_exe_path, other.svn_exe_path.as_ref());
        take(&mut self.workspace_root, other.workspace_root.as_ref());
        take(
            &mut self.additional_arguments,
            other.additional_arguments.as_ref(),
        );
        take(&mut self.credential, other.credential.as_ref());
        take(&mut self.repositories, other.repositories.as_ref());
        take(&mut self.layout, other.layout.as_ref());
    }

    /// Turn the merged layers into ready-to-use settings.
    ///
    /// # Errors
    /// Returns an error for structurally invalid repositories or layout.
    pub fn resolve(&self, default_workspace_root: &Path) -> Result<ResolvedSettings> {
        let overrides = ConnectionOverrides {
            repository_url: self.repository_url.clone(),
            username: self.username.clone(),
            password: self.password.as_deref().map(Secret::new),
        };
        let source = self.credential.as_ref().map(CredentialConfig::to_source);
        let connection = resolve_connection(&overrides, source.as_ref());

        let repositories = self
            .repositories
            .iter()
            .flatten()
            .map(|r| RepositoryDescriptor::new(r.name.as_str(), r.remote_path.as_str()))
            .collect::<svnbridge_vcs::Result<Vec<_>>>()?;

        let layout = match &self.layout {
            Some(l) => Some(LayoutSelection::from_options(
                l.branch.as_deref(),
                l.tag.as_deref(),
            )?),
            None => None,
        };
        if layout.is_some() && !repositories.is_empty() {
            return Err(ConfigError::invalid_value(
                "layout",
                "a branch or tag layout cannot be combined with named repositories",
                "remove either 'layout' or 'repositories'",
            ));
        }

        let client_options = ClientOptions {
            executable: self
                .svn_exe_path
                .clone()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXECUTABLE)),
            credentials: connection.credentials.clone(),
        };

        Ok(ResolvedSettings {
            connection,
            client_options,
            workspace_root: self
                .workspace_root
                .clone()
                .unwrap_or_else(|| default_workspace_root.to_path_buf()),
            additional_arguments: self
                .additional_arguments
                .clone()
                .filter(|a| !a.trim().is_empty()),
            repositories,
            layout,
        })
    }
}

/// Effective settings after merging and resolution.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    /// Repository URL and credentials.
    pub connection: Connection,
    /// Executable and credentials for the client.
    pub client_options: ClientOptions,
    /// Directory holding local working copies.
    pub workspace_root: PathBuf,
    /// Raw arguments appended to commands that accept them.
    pub additional_arguments: Option<String>,
    /// Named repositories.
    pub repositories: Vec<RepositoryDescriptor>,
    /// Standard layout selection, if configured.
    pub layout: Option<LayoutSelection>,
}

impl ResolvedSettings {
    /// The repository URL, required by every remote operation.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingField`] if no layer supplied one.
    pub fn repository_url(&self) -> Result<&str> {
        self.connection
            .repository_url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField {
                field: "repository-url".to_string(),
            })
    }

    /// Client for these settings.
    #[must_use]
    pub fn client(&self) -> SvnClient {
        SvnClient::new(self.client_options.clone())
    }

    /// Path resolver for these settings.
    ///
    /// # Errors
    /// Returns an error if the repository URL is missing.
    pub fn resolver(&self) -> Result<Arc<dyn RepositoryResolver>> {
        let url = self.repository_url()?;
        let resolver: Arc<dyn RepositoryResolver> = match &self.layout {
            Some(selection) => Arc::new(StandardLayoutResolver::new(
                url,
                selection.clone(),
                &self.workspace_root,
            )?),
            None => Arc::new(MultiRepositoryResolver::new(
                url,
                self.repositories.clone(),
                &self.workspace_root,
            )?),
        };
        Ok(resolver)
    }

    /// Provider wiring `client` to the resolver for these settings.
    ///
    /// # Errors
    /// Returns an error if the repository URL is missing.
    pub fn provider(&self, client: SvnClient) -> Result<SourceProvider> {
        Ok(SourceProvider::new(client, self.resolver()?))
    }
}

/// Workspace root used when none is configured.
#[must_use]
pub fn default_workspace_root() -> PathBuf {
    directories::ProjectDirs::from("", "", "svnbridge").map_or_else(
        || std::env::temp_dir().join("svnbridge").join("workspaces"),
        |dirs| dirs.cache_dir().join("workspaces"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(json: &str) -> SvnConfig {
        sonic_rs::from_str(json).unwrap()
    }

    #[test]
    fn parses_kebab_case_keys() {
        let config = parse(
            r#"{
                "repository-url": "https://svn.example.com/root",
                "username": "builder",
                "svn-exe-path": "/opt/svn/bin/svn",
                "additional-arguments": "--config-option servers:global:http-timeout=60",
                "repositories": [{"name": "tools", "remote-path": "/repos/tools"}]
            }"#,
        );
        assert_eq!(
            config.repository_url.as_deref(),
            Some("https://svn.example.com/root")
        );
        assert_eq!(config.svn_exe_path, Some(PathBuf::from("/opt/svn/bin/svn")));
        assert_eq!(
            config.repositories.unwrap()[0].remote_path,
            "/repos/tools".to_string()
        );
    }

    #[test]
    fn parses_tagged_credentials() {
        let config = parse(
            r#"{"credential": {"type": "resource", "repository-url": "https://svn/x", "username": "svc"}}"#,
        );
        assert_eq!(
            config.credential,
            Some(CredentialConfig::Resource {
                repository_url: Some("https://svn/x".into()),
                username: Some("svc".into()),
                password: None,
            })
        );
    }

    #[test]
    fn password_is_not_serialized() {
        let config = SvnConfig {
            username: Some("alice".into()),
            password: Some("hunter22".into()),
            ..Default::default()
        };
        let json = sonic_rs::to_string(&config).unwrap();
        assert!(json.contains("alice"));
        assert!(!json.contains("hunter22"));
    }

    #[test]
    fn merge_prefers_later_layer() {
        let mut base = SvnConfig {
            repository_url: Some("https://a".into()),
            username: Some("one".into()),
            ..Default::default()
        };
        base.merge(&SvnConfig {
            username: Some("two".into()),
            ..Default::default()
        });
        assert_eq!(base.repository_url.as_deref(), Some("https://a"));
        assert_eq!(base.username.as_deref(), Some("two"));
    }

    #[test]
    fn resolve_applies_credentials_and_defaults() {
        let config = SvnConfig {
            credential: Some(CredentialConfig::Legacy {
                repository_url: Some("https://svn.example.com/legacy".into()),
                username: Some("ci".into()),
                password: Some("pw".into()),
            }),
            ..Default::default()
        };
        let resolved = config.resolve(Path::new("/var/ws")).unwrap();
        assert_eq!(
            resolved.repository_url().unwrap(),
            "https://svn.example.com/legacy"
        );
        assert_eq!(
            resolved.client_options.executable,
            PathBuf::from(DEFAULT_EXECUTABLE)
        );
        assert_eq!(
            resolved.client_options.credentials.unwrap().username,
            "ci"
        );
        assert_eq!(resolved.workspace_root, PathBuf::from("/var/ws"));
    }

    #[test]
    fn resolve_rejects_bad_repository_name() {
        let config = SvnConfig {
            repositories: Some(vec![RepositoryConfig {
                name: "a/b".into(),
                remote_path: "/x".into(),
            }]),
            ..Default::default()
        };
        assert!(matches!(
            config.resolve(Path::new("/ws")).unwrap_err(),
            ConfigError::Client(_)
        ));
    }

    #[test]
    fn resolve_rejects_layout_with_repositories() {
        let config = SvnConfig {
            repository_url: Some("https://svn/x".into()),
            repositories: Some(vec![RepositoryConfig {
                name: "a".into(),
                remote_path: "/a".into(),
            }]),
            layout: Some(LayoutConfig {
                branch: Some("b".into()),
                tag: None,
            }),
            ..Default::default()
        };
        assert!(matches!(
            config.resolve(Path::new("/ws")).unwrap_err(),
            ConfigError::InvalidValue { .. }
        ));
    }

    #[test]
    fn missing_url_blocks_resolver() {
        let resolved = SvnConfig::default().resolve(Path::new("/ws")).unwrap();
        assert!(matches!(
            resolved.resolver().unwrap_err(),
            ConfigError::MissingField { .. }
        ));
    }

    #[test]
    fn layout_resolver_targets_branch() {
        let config = SvnConfig {
            repository_url: Some("https://svn/x".into()),
            layout: Some(LayoutConfig {
                branch: Some("rel".into()),
                tag: None,
            }),
            ..Default::default()
        };
        let resolver = config.resolve(Path::new("/ws")).unwrap().resolver().unwrap();
        assert_eq!(
            resolver.resolve("src").target_url(),
            "https://svn/x/branches/rel/src"
        );
    }
}
