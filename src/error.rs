//! Error types for fsdeploy
//!
//! Uses `thiserror` for library errors. Per-file failures are contained by
//! the orchestrator and never surface here; only operation-level failures do.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::ports::{EnumerateError, TransportError};
use crate::domain::services::ResolveError;

/// Result type alias for fsdeploy operations
pub type FsDeployResult<T> = Result<T, DeployError>;

/// Main error type for deploy operations
#[derive(Error, Debug)]
pub enum DeployError {
    /// Workspace deploy found no rule whose source covers the workspace
    #[error("couldn't find matching deploy rule for workspace '{}'", workspace.display())]
    NoMatchingRule { workspace: PathBuf },

    /// Configuration could not be loaded or validated
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Destination path could not be computed
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Transport-level failure
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// File enumeration failed for a rule root
    #[error(transparent)]
    Enumerate(#[from] EnumerateError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The background deploy thread panicked
    #[error("deploy task panicked")]
    TaskPanicked,
}
