//! Layered configuration for svnbridge.
//!
//! Settings are merged from, lowest to highest precedence:
//!
//! 1. Built-in defaults
//! 2. Global file (`<config dir>/svnbridge/config.json`)
//! 3. Project file (`./svnbridge.json`)
//! 4. `SVNBRIDGE_*` environment variables
//! 5. Command-line values
//!
//! ```no_run
//! use svnbridge_config::ConfigLoader;
//!
//! # fn run() -> svnbridge_config::Result<()> {
//! let settings = ConfigLoader::new(".").resolve()?;
//! let provider = settings.provider(settings.client())?;
//! # let _ = provider;
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod env;
pub mod error;
pub mod loader;
pub mod types;
pub mod validate;

pub use env::{SvnEnvVar, env_overrides, env_overrides_from};
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, ConfigSource, PROJECT_CONFIG_FILE, load_file};
pub use types::{
    CredentialConfig, LayoutConfig, RepositoryConfig, ResolvedSettings, SvnConfig,
    default_workspace_root,
};
pub use validate::{Severity, ValidationIssue, ValidationResult, Validator};
