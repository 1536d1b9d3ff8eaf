//! Subversion command-line client adapter for svnbridge.
//!
//! This crate drives the `svn` executable and turns its output into typed
//! values:
//!
//! - **Arguments**: ordered, quoted, with secrets redacted from every log line
//! - **Paths**: repository URL plus relative path with strict `/` joining
//! - **Resolution**: user paths routed to named repositories or a standard
//!   `trunk`/`branches`/`tags` layout, each with its own local workspace
//! - **Execution**: child processes with separately captured streams and
//!   cooperative cancellation
//! - **Parsing**: plain listings and fail-closed XML decoding
//!
//! # Quick Start
//!
//! ```no_run
//! use svnbridge_vcs::{ClientOptions, Credentials, RepositoryPath, SvnClient};
//!
//! # async fn run() -> svnbridge_vcs::Result<()> {
//! let client = SvnClient::new(ClientOptions {
//!     credentials: Some(Credentials::new("builder").with_password("secret")),
//!     ..ClientOptions::default()
//! });
//!
//! let trunk = RepositoryPath::new("https://svn.example.com/repo", "trunk/")?;
//! for child in client.enumerate_children(&trunk).await? {
//!     println!("{}", child.relative_path());
//! }
//!
//! println!("at r{}", client.latest_revision(&trunk).await?);
//! # Ok(())
//! # }
//! ```
//!
//! # Multiple Repositories
//!
//! ```no_run
//! use std::sync::Arc;
//! use svnbridge_vcs::{
//!     ClientOptions, MultiRepositoryResolver, RepositoryDescriptor, SourceProvider, SvnClient,
//! };
//!
//! # async fn run() -> svnbridge_vcs::Result<()> {
//! let resolver = MultiRepositoryResolver::new(
//!     "https://svn.example.com",
//!     vec![RepositoryDescriptor::new("tools", "/repos/tools")?],
//!     "/var/lib/svnbridge",
//! )?;
//! let provider = SourceProvider::new(SvnClient::new(ClientOptions::default()), Arc::new(resolver));
//!
//! // Checks out or updates /var/lib/svnbridge/repositories/tools, then exports it.
//! provider
//!     .get_latest("tools/trunk", std::path::Path::new("/tmp/tools"))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Structure
//!
//! - [`error`]: Error taxonomy
//! - [`args`]: Argument assembly and redaction
//! - [`path`]: Repository paths
//! - [`credentials`]: Credentials and their resolution
//! - [`resolver`]: User path to URL and workspace mapping
//! - [`process`]: Process execution
//! - [`mock`]: Scripted runner for tests
//! - [`parse`]: Output decoding
//! - [`client`]: Client operations
//! - [`workspace`]: Working copy synchronisation
//! - [`provider`]: Operations addressed by user paths
//! - [`monitor`]: Branch commit polling

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod args;
pub mod client;
pub mod credentials;
pub mod error;
pub mod mock;
pub mod monitor;
pub mod parse;
pub mod path;
pub mod process;
pub mod provider;
pub mod resolver;
pub mod types;
pub mod workspace;

// Re-export main types at crate root
pub use args::ArgumentBuilder;
pub use client::{ClientOptions, DEFAULT_EXECUTABLE, SvnClient};
pub use credentials::{
    Connection, ConnectionOverrides, CredentialSource, Credentials, Secret, UsernamePassword,
    resolve_connection,
};
pub use error::{Result, SvnError};
pub use monitor::{CommitMap, RepositoryMonitor, changed_branches};
pub use path::RepositoryPath;
pub use process::{ProcessCommand, ProcessRunner, TokioProcessRunner};
pub use provider::SourceProvider;
pub use resolver::{
    LayoutSelection, MultiRepositoryResolver, RepositoryDescriptor, RepositoryResolver,
    ResolvedTarget, StandardLayoutResolver,
};
pub use types::{BranchEntry, DirectoryEntry, DirectoryListing, ExecutionResult, WorkingCopyInfo};
pub use workspace::SyncOutcome;

pub use tokio_util::sync::CancellationToken;
