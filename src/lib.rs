//! fsdeploy - rule-based file deployment
//!
//! fsdeploy watches a workspace and copies (or uploads over SSH) files that
//! match declarative source/target rules, either when a single file is saved
//! or when a whole-workspace deploy is requested.
//!
//! ## Layers
//!
//! - `domain` - rules, operations, matching and path resolution, ports
//! - `application` - the deploy orchestrator
//! - `infrastructure` - local/remote transports, file enumeration, TOML rule source
//! - `config` - configuration schema and loading
//! - `watcher` - the "file saved" trigger source

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod watcher;

// Re-exports for convenience
pub use application::deploy::{DeployOrchestrator, DeploySummary, DeployTask};
pub use config::{Config, ConfigError};
pub use domain::entities::{DeployRule, DeployScope, OperationState, RemoteTarget};
pub use domain::ports::{DeployEvent, DeployEventSink, NoopEventSink};
pub use domain::value_objects::{CancellationToken, GlobFilter};
pub use error::{DeployError, FsDeployResult};
pub use watcher::{watch, WatchEvent, WatchOptions};
