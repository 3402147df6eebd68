//! Deploy operation entity
//!
//! One `DeployOperation` exists per triggered deploy. It is passed down the
//! call chain as an explicit context and discarded when the deploy ends;
//! nothing is persisted.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::domain::entities::ResolvedRule;
use crate::domain::value_objects::CancellationToken;

/// What a deploy covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum DeployScope {
    /// A single saved file
    SingleFile(PathBuf),
    /// Every file of every rule that covers the workspace
    Workspace,
}

impl fmt::Display for DeployScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployScope::SingleFile(path) => write!(f, "file '{}'", path.display()),
            DeployScope::Workspace => write!(f, "workspace"),
        }
    }
}

/// Lifecycle state of an operation
///
/// `Idle -> Planning -> Running -> {Completed | Cancelled | Failed}`;
/// Planning may also end directly in `Completed` (nothing to do) or
/// `Failed` (no matching rule).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationState {
    Idle,
    Planning,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl OperationState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OperationState::Completed | OperationState::Cancelled | OperationState::Failed
        )
    }

    pub fn can_transition_to(self, next: OperationState) -> bool {
        use OperationState::*;
        matches!(
            (self, next),
            (Idle, Planning)
                | (Planning, Running)
                | (Planning, Completed)
                | (Planning, Failed)
                | (Running, Completed)
                | (Running, Cancelled)
                | (Running, Failed)
        )
    }
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationState::Idle => "idle",
            OperationState::Planning => "planning",
            OperationState::Running => "running",
            OperationState::Completed => "completed",
            OperationState::Cancelled => "cancelled",
            OperationState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// File counters of an operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub files_planned: usize,
    pub files_completed: usize,
    pub files_failed: usize,
}

impl Progress {
    /// Files that have finished, successfully or not
    pub fn processed(&self) -> usize {
        self.files_completed + self.files_failed
    }
}

/// Transient context of one deploy
#[derive(Debug)]
pub struct DeployOperation {
    scope: DeployScope,
    matched_rules: Vec<ResolvedRule>,
    progress: Progress,
    state: OperationState,
    cancellation: CancellationToken,
}

impl DeployOperation {
    pub fn new(scope: DeployScope, cancellation: CancellationToken) -> Self {
        Self {
            scope,
            matched_rules: Vec::new(),
            progress: Progress::default(),
            state: OperationState::Idle,
            cancellation,
        }
    }

    pub fn scope(&self) -> &DeployScope {
        &self.scope
    }

    pub fn state(&self) -> OperationState {
        self.state
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn matched_rules(&self) -> &[ResolvedRule] {
        &self.matched_rules
    }

    pub fn set_matched_rules(&mut self, rules: Vec<ResolvedRule>) {
        self.matched_rules = rules;
    }

    pub fn cancellation_requested(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Move to `next`, returning the previous state.
    pub fn transition(&mut self, next: OperationState) -> OperationState {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid transition {} -> {}",
            self.state,
            next
        );
        std::mem::replace(&mut self.state, next)
    }

    pub fn plan_files(&mut self, count: usize) {
        self.progress.files_planned += count;
    }

    pub fn record_completed(&mut self) {
        self.progress.files_completed += 1;
    }

    pub fn record_failed(&mut self) {
        self.progress.files_failed += 1;
    }
}
