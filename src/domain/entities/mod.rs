//! Domain Entities
//!
//! - `DeployRule` - one configured source/target mapping
//! - `ResolvedRule` - a rule with its paths made absolute for one workspace
//! - `DeployOperation` - the transient context of one triggered deploy

mod operation;
mod rule;

pub use operation::{DeployOperation, DeployScope, OperationState, Progress};
pub use rule::{DeployRule, RemoteTarget, ResolvedRule, RuleError, TargetRoot, DEFAULT_SSH_PORT};
