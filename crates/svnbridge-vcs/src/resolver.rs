//! Mapping user-facing paths onto repository URLs and local workspaces.

use crate::error::{Result, SvnError};
use crate::path::{RepositoryPath, combine};
use std::fmt;
use std::path::PathBuf;

const SEPARATOR: char = '/';

/// Workspace subdirectory used when no named repository matches.
pub const DEFAULT_WORKSPACE: &str = "default";

/// Workspace subdirectory holding one directory per named repository.
pub const REPOSITORIES_WORKSPACE: &str = "repositories";

/// A named sub-path of the configured root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryDescriptor {
    name: String,
    remote_path: String,
}

impl RepositoryDescriptor {
    /// Create a descriptor.
    ///
    /// # Errors
    /// Returns [`SvnError::InvalidConfiguration`] if the name is empty or
    /// contains `/`; such a name could never be matched as a first segment.
    pub fn new(name: impl Into<String>, remote_path: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SvnError::invalid_configuration(
                "repository name must not be empty",
            ));
        }
        if name.contains(SEPARATOR) {
            return Err(SvnError::invalid_configuration(format!(
                "repository name '{name}' must not contain '{SEPARATOR}'"
            )));
        }
        Ok(Self {
            name,
            remote_path: remote_path.into(),
        })
    }

    /// Name matched against the first path segment.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path below the configured root.
    #[must_use]
    pub fn remote_path(&self) -> &str {
        &self.remote_path
    }
}

/// Where a user path lives remotely and locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Remote location; its relative part is the repository-relative path.
    pub target: RepositoryPath,
    /// Local working copy directory for this target.
    pub workspace_dir: PathBuf,
    /// Name of the matched repository, if any.
    pub repository: Option<String>,
}

impl ResolvedTarget {
    /// Full URL handed to the client.
    #[must_use]
    pub fn target_url(&self) -> String {
        self.target.absolute_path()
    }

    /// Path below the configured root.
    #[must_use]
    pub fn repository_relative_path(&self) -> &str {
        self.target.relative_path()
    }
}

/// Compare two URLs ignoring case and surrounding slashes.
#[must_use]
pub fn urls_match(a: &str, b: &str) -> bool {
    a.trim_matches(SEPARATOR)
        .eq_ignore_ascii_case(b.trim_matches(SEPARATOR))
}

/// Strategy turning a user path into a [`ResolvedTarget`].
pub trait RepositoryResolver: Send + Sync + fmt::Debug {
    /// Configured root URL.
    fn root(&self) -> &RepositoryPath;

    /// Resolve a user path.
    fn resolve(&self, user_path: &str) -> ResolvedTarget;

    /// Names exposed as top-level directories, empty if none are configured.
    fn repository_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Listing to return without contacting the server, if any.
    fn synthetic_listing(&self, _user_path: &str) -> Option<Vec<String>> {
        None
    }
}

/// Routes the first path segment to a named repository.
///
/// The first segment is compared case-insensitively with the configured
/// names. On a match the remainder is placed below that repository's remote
/// path and its own workspace; otherwise the whole path is placed below the
/// root and the default workspace is used.
#[derive(Debug, Clone)]
pub struct MultiRepositoryResolver {
    root: RepositoryPath,
    repositories: Vec<RepositoryDescriptor>,
    workspace_root: PathBuf,
}

impl MultiRepositoryResolver {
    /// Create a resolver.
    ///
    /// # Errors
    /// Returns [`SvnError::InvalidArgument`] if the root URL is empty.
    pub fn new(
        root_url: &str,
        repositories: Vec<RepositoryDescriptor>,
        workspace_root: impl Into<PathBuf>,
    ) -> Result<Self> {
        Ok(Self {
            root: RepositoryPath::root(root_url)?,
            repositories,
            workspace_root: workspace_root.into(),
        })
    }

    fn split_first_segment(user_path: &str) -> (&str, &str) {
        let trimmed = user_path.trim_start_matches(SEPARATOR);
        match trimmed.find(SEPARATOR) {
            Some(idx) => (&trimmed[..idx], &trimmed[idx..]),
            None => (trimmed, ""),
        }
    }

    fn find(&self, segment: &str) -> Option<&RepositoryDescriptor> {
        if segment.is_empty() {
            return None;
        }
        let wanted = segment.to_lowercase();
        self.repositories
            .iter()
            .find(|r| r.name.to_lowercase() == wanted)
    }

    fn is_root(user_path: &str) -> bool {
        user_path.trim_matches(SEPARATOR).is_empty()
    }
}

impl RepositoryResolver for MultiRepositoryResolver {
    fn root(&self) -> &RepositoryPath {
        &self.root
    }

    fn resolve(&self, user_path: &str) -> ResolvedTarget {
        let (first, remainder) = Self::split_first_segment(user_path);
        match self.find(first) {
            Some(repo) => ResolvedTarget {
                target: self.root.join(&combine(&repo.remote_path, remainder)),
                workspace_dir: self
                    .workspace_root
                    .join(REPOSITORIES_WORKSPACE)
                    .join(&repo.name),
                repository: Some(repo.name.clone()),
            },
            None => ResolvedTarget {
                target: self.root.join(user_path),
                workspace_dir: self.workspace_root.join(DEFAULT_WORKSPACE),
                repository: None,
            },
        }
    }

    fn repository_names(&self) -> Vec<String> {
        self.repositories.iter().map(|r| r.name.clone()).collect()
    }

    fn synthetic_listing(&self, user_path: &str) -> Option<Vec<String>> {
        if self.repositories.is_empty() || !Self::is_root(user_path) {
            return None;
        }
        Some(self.repository_names())
    }
}

/// Which line of development a [`StandardLayoutResolver`] works on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LayoutSelection {
    /// `/trunk`.
    #[default]
    Trunk,
    /// `/branches/<name>`.
    Branch(String),
    /// `/tags/<name>`.
    Tag(String),
}

impl LayoutSelection {
    /// Pick the line from optional branch and tag settings.
    ///
    /// # Errors
    /// Returns [`SvnError::InvalidConfiguration`] if both are set.
    pub fn from_options(branch: Option<&str>, tag: Option<&str>) -> Result<Self> {
        let branch = branch.map(str::trim).filter(|b| !b.is_empty());
        let tag = tag.map(str::trim).filter(|t| !t.is_empty());
        match (branch, tag) {
            (Some(b), Some(t)) => Err(SvnError::invalid_configuration(format!(
                "branch '{b}' and tag '{t}' are mutually exclusive"
            ))),
            (Some(b), None) => Ok(Self::Branch(b.to_string())),
            (None, Some(t)) => Ok(Self::Tag(t.to_string())),
            (None, None) => Ok(Self::Trunk),
        }
    }

    /// Path of the line below the repository root.
    #[must_use]
    pub fn base_path(&self) -> String {
        match self {
            Self::Trunk => "trunk".to_string(),
            Self::Branch(name) => format!("branches/{}", name.trim_matches(SEPARATOR)),
            Self::Tag(name) => format!("tags/{}", name.trim_matches(SEPARATOR)),
        }
    }
}

/// Places every user path below `/trunk`, `/branches/<name>` or `/tags/<name>`.
#[derive(Debug, Clone)]
pub struct StandardLayoutResolver {
    root: RepositoryPath,
    selection: LayoutSelection,
    workspace_root: PathBuf,
}

impl StandardLayoutResolver {
    /// Create a resolver.
    ///
    /// # Errors
    /// Returns [`SvnError::InvalidArgument`] if the root URL is empty.
    pub fn new(
        root_url: &str,
        selection: LayoutSelection,
        workspace_root: impl Into<PathBuf>,
    ) -> Result<Self> {
        Ok(Self {
            root: RepositoryPath::root(root_url)?,
            selection,
            workspace_root: workspace_root.into(),
        })
    }

    /// Selected line.
    #[must_use]
    pub fn selection(&self) -> &LayoutSelection {
        &self.selection
    }

    fn workspace_dir(&self) -> PathBuf {
        self.selection
            .base_path()
            .split(SEPARATOR)
            .filter(|s| !s.is_empty())
            .fold(self.workspace_root.clone(), |dir, part| dir.join(part))
    }
}

impl RepositoryResolver for StandardLayoutResolver {
    fn root(&self) -> &RepositoryPath {
        &self.root
    }

    fn resolve(&self, user_path: &str) -> ResolvedTarget {
        ResolvedTarget {
            target: self.root.join(&combine(&self.selection.base_path(), user_path)),
            workspace_dir: self.workspace_dir(),
            repository: None,
        }
    }
}
