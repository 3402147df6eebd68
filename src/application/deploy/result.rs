//! Deploy Result
//!
//! Summary types returned by every deploy operation, whatever the number
//! of contained failures.

use std::path::PathBuf;

use serde::Serialize;

use crate::domain::entities::{DeployScope, OperationState, Progress};

/// Outcome of one rule within an operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleReport {
    /// Declaration index of the rule (0-based)
    pub index: usize,
    pub source: PathBuf,
    pub target: String,
    pub files_planned: usize,
    pub files_completed: usize,
    pub files_failed: usize,
    /// Target tree was removed before the deploy
    pub purged: bool,
}

/// A contained per-file failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub rule: usize,
    pub reason: String,
}

/// Result of a deploy operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploySummary {
    pub scope: DeployScope,
    pub state: OperationState,
    pub files_planned: usize,
    pub files_completed: usize,
    pub files_failed: usize,
    pub cancelled: bool,
    pub rules: Vec<RuleReport>,
    pub failures: Vec<FileFailure>,
}

impl DeploySummary {
    pub fn new(scope: DeployScope) -> Self {
        Self {
            scope,
            state: OperationState::Idle,
            files_planned: 0,
            files_completed: 0,
            files_failed: 0,
            cancelled: false,
            rules: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub(crate) fn record_progress(&mut self, progress: Progress) {
        self.files_planned = progress.files_planned;
        self.files_completed = progress.files_completed;
        self.files_failed = progress.files_failed;
    }

    /// Nothing was in scope
    pub fn is_noop(&self) -> bool {
        self.files_planned == 0 && self.failures.is_empty()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }

    /// One-line summary for notifications
    pub fn message(&self) -> String {
        let mut message = format!(
            "Deployed {} of {} file(s)",
            self.files_completed, self.files_planned
        );
        if self.files_failed > 0 {
            message.push_str(&format!(", {} failed", self.files_failed));
        }
        if self.cancelled {
            message.push_str(" (cancelled)");
        }
        message
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_mentions_failures_and_cancellation() {
        let mut summary = DeploySummary::new(DeployScope::Workspace);
        summary.files_planned = 4;
        summary.files_completed = 2;
        summary.files_failed = 1;
        summary.cancelled = true;

        assert_eq!(summary.message(), "Deployed 2 of 4 file(s), 1 failed (cancelled)");
        assert!(!summary.is_success());
    }

    #[test]
    fn empty_summary_is_noop() {
        let summary = DeploySummary::new(DeployScope::SingleFile("/ws/a.txt".into()));
        assert!(summary.is_noop());
        assert!(summary.is_success());
        assert_eq!(summary.message(), "Deployed 0 of 0 file(s)");
    }

    #[test]
    fn summary_json_shape() {
        let mut summary = DeploySummary::new(DeployScope::Workspace);
        summary.state = OperationState::Completed;
        summary.files_planned = 1;
        summary.files_completed = 1;

        insta::assert_snapshot!(
            summary.to_json(),
            @r#"{"scope":{"kind":"workspace"},"state":"completed","files_planned":1,"files_completed":1,"files_failed":0,"cancelled":false,"rules":[],"failures":[]}"#
        );
    }
}
