//! Subversion credentials and their resolution from host-provided sources.

use std::fmt;
use zeroize::Zeroizing;

/// A password held in memory that is wiped on drop and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Zeroizing<String>);

impl Secret {
    /// Wrap a secret value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Borrow the plain value. Only the argument builder should need this.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(crate::args::REDACTED)
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Username with an optional password, passed to every client call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account name; never empty.
    pub username: String,
    /// Password, if the account has one.
    pub password: Option<Secret>,
}

impl Credentials {
    /// Credentials without a password.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: None,
        }
    }

    /// Attach a password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<Secret>) -> Self {
        self.password = Some(password.into());
        self
    }
}

/// Username and password stored apart from a repository resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsernamePassword {
    /// Account name.
    pub username: Option<String>,
    /// Password.
    pub password: Option<Secret>,
}

/// Credential shapes a host can supply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Single record carrying URL, username and password together.
    Legacy {
        /// Repository URL.
        repository_url: Option<String>,
        /// Account name.
        username: Option<String>,
        /// Password.
        password: Option<Secret>,
    },
    /// Repository resource with separately stored credentials.
    Resource {
        /// Repository URL.
        repository_url: Option<String>,
        /// Attached credentials, if any.
        credentials: Option<UsernamePassword>,
    },
}

impl CredentialSource {
    fn repository_url(&self) -> Option<&str> {
        match self {
            Self::Legacy { repository_url, .. } | Self::Resource { repository_url, .. } => {
                repository_url.as_deref()
            }
        }
    }

    fn username(&self) -> Option<&str> {
        match self {
            Self::Legacy { username, .. } => username.as_deref(),
            Self::Resource { credentials, .. } => {
                credentials.as_ref().and_then(|c| c.username.as_deref())
            }
        }
    }

    fn password(&self) -> Option<&Secret> {
        match self {
            Self::Legacy { password, .. } => password.as_ref(),
            Self::Resource { credentials, .. } => {
                credentials.as_ref().and_then(|c| c.password.as_ref())
            }
        }
    }
}

/// Values set directly on an operation, taking precedence over any source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionOverrides {
    /// Repository URL.
    pub repository_url: Option<String>,
    /// Account name.
    pub username: Option<String>,
    /// Password.
    pub password: Option<Secret>,
}

/// Effective connection settings after resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connection {
    /// Repository URL, if any layer supplied one.
    pub repository_url: Option<String>,
    /// Credentials; absent when no username was supplied.
    pub credentials: Option<Credentials>,
}

/// Resolve the effective connection once per operation.
///
/// Each value is taken from the overrides when non-empty and from the source
/// otherwise. Credentials exist only when the effective username is non-empty.
#[must_use]
pub fn resolve_connection(
    overrides: &ConnectionOverrides,
    source: Option<&CredentialSource>,
) -> Connection {
    let repository_url = coalesce(
        overrides.repository_url.as_deref(),
        source.and_then(CredentialSource::repository_url),
    );
    let username = coalesce(
        overrides.username.as_deref(),
        source.and_then(CredentialSource::username),
    );
    let password = overrides
        .password
        .clone()
        .or_else(|| source.and_then(CredentialSource::password).cloned());

    Connection {
        repository_url,
        credentials: username.map(|username| Credentials { username, password }),
    }
}

fn coalesce(first: Option<&str>, second: Option<&str>) -> Option<String> {
    first
        .filter(|v| !v.is_empty())
        .or_else(|| second.filter(|v| !v.is_empty()))
        .map(str::to_string)
}
