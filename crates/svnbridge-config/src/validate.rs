//! Configuration validation with descriptive errors.

use crate::error::{ConfigError, Result};
use crate::types::{CredentialConfig, LayoutConfig, RepositoryConfig, SvnConfig};
use std::collections::HashSet;

/// Validation severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational message.
    Info,
    /// Warning (may indicate issues).
    Warning,
    /// Error (must be fixed).
    Error,
}

/// Validation issue.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity level.
    pub severity: Severity,
    /// Issue code for programmatic handling.
    pub code: &'static str,
    /// Field path (dot-notation).
    pub field: String,
    /// Human-readable message.
    pub message: String,
    /// Suggested fix.
    pub hint: Option<String>,
}

impl ValidationIssue {
    fn with_severity(
        severity: Severity,
        code: &'static str,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            code,
            field: field.into(),
            message: message.into(),
            hint: None,
        }
    }

    /// Create a new error.
    #[must_use]
    pub fn error(code: &'static str, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Error, code, field, message)
    }

    /// Create a new warning.
    #[must_use]
    pub fn warning(
        code: &'static str,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::with_severity(Severity::Warning, code, field, message)
    }

    /// Create a new info message.
    #[must_use]
    pub fn info(code: &'static str, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Info, code, field, message)
    }

    /// Add a hint to the issue.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Validation result containing all issues.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// All validation issues.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Create a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an issue.
    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Check if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    /// Check if there are any warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Warning)
    }

    /// Get error count.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Get warning count.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Convert to result, failing if there are errors.
    ///
    /// # Errors
    /// Returns error if validation has errors.
    pub fn into_result(self) -> Result<()> {
        if !self.has_errors() {
            return Ok(());
        }
        let errors: Vec<String> = self
            .issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .map(|i| format!("{}: {}", i.field, i.message))
            .collect();
        Err(ConfigError::ValidationFailed {
            count: errors.len(),
            errors,
        })
    }
}

/// Configuration validator.
#[derive(Debug, Default)]
pub struct Validator {
    /// Strict mode (treat warnings as errors).
    strict: bool,
}

impl Validator {
    /// Create a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable strict mode.
    #[must_use]
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Validate merged settings.
    #[must_use]
    pub fn validate(&self, config: &SvnConfig) -> ValidationResult {
        let mut result = ValidationResult::new();

        let url = config.repository_url.as_deref().or_else(|| match &config.credential {
            Some(
                CredentialConfig::Legacy { repository_url, .. }
                | CredentialConfig::Resource { repository_url, .. },
            ) => repository_url.as_deref(),
            None => None,
        });
        match url {
            Some(url) => validate_url(url, "repository-url", config.password.is_some(), &mut result),
            None => result.add(
                ValidationIssue::error(
                    "repository_url.missing",
                    "repository-url",
                    "no repository URL is configured",
                )
                .with_hint("set 'repository-url' or SVNBRIDGE_REPOSITORY_URL"),
            ),
        }

        if config.password.is_some() && config.username.is_none() {
            result.add(
                ValidationIssue::warning(
                    "credentials.password_without_username",
                    "password",
                    "a password without a username is ignored",
                )
                .with_hint("set 'username' as well"),
            );
        }

        if let Some(exe) = &config.svn_exe_path
            && exe.as_os_str().is_empty()
        {
            result.add(ValidationIssue::info(
                "svn_exe_path.empty",
                "svn-exe-path",
                "empty executable path falls back to 'svn' on PATH",
            ));
        }

        if let Some(repos) = &config.repositories {
            validate_repositories(repos, &mut result);
        }
        if let Some(layout) = &config.layout {
            let has_repositories = config.repositories.as_ref().is_some_and(|r| !r.is_empty());
            validate_layout(layout, has_repositories, &mut result);
        }

        if let Some(extra) = &config.additional_arguments
            && shell_words::split(extra).is_err()
        {
            result.add(
                ValidationIssue::error(
                    "additional_arguments.quotes",
                    "additional-arguments",
                    "unbalanced quotes",
                )
                .with_hint("close every quoted argument"),
            );
        }

        if self.strict {
            for issue in &mut result.issues {
                if issue.severity == Severity::Warning {
                    issue.severity = Severity::Error;
                }
            }
        }
        result
    }
}

fn validate_url(url: &str, field: &str, has_password: bool, result: &mut ValidationResult) {
    match url::Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if !matches!(scheme, "http" | "https" | "svn" | "svn+ssh" | "file") {
                result.add(
                    ValidationIssue::warning(
                        "url.scheme",
                        field,
                        format!("'{scheme}' is not a scheme the svn client is known to accept"),
                    )
                    .with_hint("use https://, svn://, svn+ssh:// or file://"),
                );
            }
            if has_password && matches!(scheme, "http" | "svn") {
                result.add(
                    ValidationIssue::warning(
                        "url.insecure",
                        field,
                        "password is sent over an unencrypted connection",
                    )
                    .with_hint("use HTTPS or svn+ssh for secure connections"),
                );
            }
        }
        Err(_) => result.add(
            ValidationIssue::error("url.invalid", field, format!("invalid URL '{url}'"))
                .with_hint("provide an absolute URL such as https://svn.example.com/repo"),
        ),
    }
}

fn validate_repositories(repos: &[RepositoryConfig], result: &mut ValidationResult) {
    let mut seen = HashSet::new();
    for (i, repo) in repos.iter().enumerate() {
        let field = format!("repositories[{i}].name");
        if repo.name.trim().is_empty() {
            result.add(ValidationIssue::error(
                "repository.name.empty",
                field,
                "repository name cannot be empty",
            ));
            continue;
        }
        if repo.name.contains('/') {
            result.add(
                ValidationIssue::error(
                    "repository.name.slash",
                    field.clone(),
                    "repository name cannot contain '/'",
                )
                .with_hint("put nested paths in 'remote-path'"),
            );
        }
        if !seen.insert(repo.name.to_lowercase()) {
            result.add(ValidationIssue::warning(
                "repository.name.duplicate",
                field,
                format!("'{}' is listed more than once; the first entry wins", repo.name),
            ));
        }
    }
}

fn validate_layout(layout: &LayoutConfig, has_repositories: bool, result: &mut ValidationResult) {
    if layout.branch.is_some() && layout.tag.is_some() {
        result.add(
            ValidationIssue::error(
                "layout.both",
                "layout",
                "a branch and a tag cannot both be selected",
            )
            .with_hint("keep either 'branch' or 'tag'"),
        );
    }
    if has_repositories {
        result.add(ValidationIssue::error(
            "layout.with_repositories",
            "layout",
            "a branch or tag layout cannot be combined with named repositories",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config(url: &str) -> SvnConfig {
        SvnConfig {
            repository_url: Some(url.to_string()),
            ..Default::default()
        }
    }

    fn codes(result: &ValidationResult) -> Vec<&'static str> {
        result.issues.iter().map(|i| i.code).collect()
    }

    #[test]
    fn valid_configuration() {
        let result = Validator::new().validate(&config("https://svn.example.com/repo"));
        assert!(!result.has_errors());
        assert!(!result.has_warnings());
        assert!(result.into_result().is_ok());
    }

    #[rstest::rstest]
    #[case("https://svn.example.com/repo", false)]
    #[case("http://svn.example.com/repo", false)]
    #[case("svn://svn.example.com/repo", false)]
    #[case("svn+ssh://svn.example.com/repo", false)]
    #[case("file:///srv/svn/repo", false)]
    #[case("ftp://svn.example.com/repo", true)]
    fn url_schemes(#[case] url: &str, #[case] warns: bool) {
        let result = Validator::new().validate(&config(url));
        assert_eq!(codes(&result).contains(&"url.scheme"), warns);
        assert!(!result.has_errors());
    }

    #[test]
    fn missing_url_is_error() {
        let result = Validator::new().validate(&SvnConfig::default());
        assert_eq!(codes(&result), vec!["repository_url.missing"]);
        assert!(matches!(
            result.into_result().unwrap_err(),
            ConfigError::ValidationFailed { count: 1, .. }
        ));
    }

    #[test]
    fn credential_url_satisfies_requirement() {
        let cfg = SvnConfig {
            credential: Some(CredentialConfig::Resource {
                repository_url: Some("svn://host/repo".into()),
                username: None,
                password: None,
            }),
            ..Default::default()
        };
        assert!(!Validator::new().validate(&cfg).has_errors());
    }

    #[test]
    fn unparseable_url_is_error() {
        let result = Validator::new().validate(&config("not a url"));
        assert_eq!(codes(&result), vec!["url.invalid"]);
    }

    #[test]
    fn password_over_plain_http_warns() {
        let mut cfg = config("http://svn.example.com/repo");
        cfg.username = Some("u".into());
        cfg.password = Some("p".into());
        let result = Validator::new().validate(&cfg);
        assert_eq!(codes(&result), vec!["url.insecure"]);
        assert!(!result.has_errors());
    }

    #[test]
    fn password_without_username_warns() {
        let mut cfg = config("https://svn.example.com/repo");
        cfg.password = Some("p".into());
        let result = Validator::new().validate(&cfg);
        assert_eq!(codes(&result), vec!["credentials.password_without_username"]);
    }

    #[test]
    fn repository_names_checked() {
        let mut cfg = config("https://svn.example.com");
        cfg.repositories = Some(vec![
            RepositoryConfig {
                name: "Tools".into(),
                remote_path: "/a".into(),
            },
            RepositoryConfig {
                name: "tools".into(),
                remote_path: "/b".into(),
            },
            RepositoryConfig {
                name: "a/b".into(),
                remote_path: "/c".into(),
            },
            RepositoryConfig {
                name: " ".into(),
                remote_path: "/d".into(),
            },
        ]);
        let result = Validator::new().validate(&cfg);
        assert_eq!(
            codes(&result),
            vec![
                "repository.name.duplicate",
                "repository.name.slash",
                "repository.name.empty"
            ]
        );
        assert_eq!(result.error_count(), 2);
        assert_eq!(result.warning_count(), 1);
    }

    #[test]
    fn layout_conflicts() {
        let mut cfg = config("https://svn.example.com");
        cfg.layout = Some(LayoutConfig {
            branch: Some("b".into()),
            tag: Some("t".into()),
        });
        cfg.repositories = Some(vec![RepositoryConfig {
            name: "tools".into(),
            remote_path: "/tools".into(),
        }]);
        let result = Validator::new().validate(&cfg);
        assert_eq!(codes(&result), vec!["layout.both", "layout.with_repositories"]);
    }

    #[test]
    fn unbalanced_extra_arguments() {
        let mut cfg = config("https://svn.example.com");
        cfg.additional_arguments = Some("--config-option 'servers:global".into());
        assert_eq!(
            codes(&Validator::new().validate(&cfg)),
            vec!["additional_arguments.quotes"]
        );

        cfg.additional_arguments = Some(r#"--message "it's fine""#.into());
        assert!(!Validator::new().validate(&cfg).has_errors());
    }

    #[test]
    fn strict_promotes_warnings() {
        let cfg = config("ftp://svn.example.com");
        assert!(!Validator::new().validate(&cfg).has_errors());
        assert!(Validator::new().strict(true).validate(&cfg).has_errors());
    }
}
