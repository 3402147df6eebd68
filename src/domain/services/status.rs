//! Deploy status
//!
//! Summarises whether the workspace and a given file have a deployment
//! target, the way an editor status indicator would show it.

use std::fmt;

use serde::Serialize;

use crate::domain::entities::ResolvedRule;

/// Deployability of the workspace and the current file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStatus {
    /// Workspace has a deployment target and the file is in scope
    Both,
    /// Workspace has no deployment target but the file is in scope
    FileOnly,
    /// Workspace has a deployment target but the file isn't in scope
    WorkspaceOnly,
    /// Workspace has no deployment target
    None,
}

impl DeployStatus {
    pub fn classify(workspace_rules: usize, file_rules: usize) -> Self {
        match (workspace_rules > 0, file_rules > 0) {
            (true, true) => DeployStatus::Both,
            (false, true) => DeployStatus::FileOnly,
            (true, false) => DeployStatus::WorkspaceOnly,
            (false, false) => DeployStatus::None,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DeployStatus::Both => "Workspace has a deployment target",
            DeployStatus::FileOnly => {
                "Workspace doesn't have a deployment target but file is in scope"
            }
            DeployStatus::WorkspaceOnly => {
                "Workspace has a deployment target but file isn't in scope"
            }
            DeployStatus::None => "Workspace doesn't have a deployment target",
        }
    }
}

impl fmt::Display for DeployStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// `'<source>' to '<target>'`
pub fn describe_rule(rule: &ResolvedRule) -> String {
    format!("'{}' to '{}'", rule.source().display(), rule.target())
}
