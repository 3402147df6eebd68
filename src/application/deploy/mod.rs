//! Deploy Module
//!
//! Orchestrates single-file and workspace deploys.
//!
//! ## Structure
//!
//! - `result` - Summary types (`DeploySummary`, `RuleReport`, `FileFailure`)
//! - `task` - Background workspace deploy handle (`DeployTask`)
//! - `use_case` - Core orchestration (`DeployOrchestrator`)
//!
//! ## Usage
//!
//! ```ignore
//! use fsdeploy::application::deploy::DeployOrchestrator;
//!
//! let orchestrator = DeployOrchestrator::new(root, rule_source, enumerator, connector);
//! let summary = orchestrator.deploy_file(Path::new("src/app.js"), &NoopEventSink)?;
//! ```

mod result;
mod task;
mod use_case;

pub use result::{DeploySummary, FileFailure, RuleReport};
pub use task::DeployTask;
pub use use_case::DeployOrchestrator;
