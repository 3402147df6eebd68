//! Deploy Event Port
//!
//! Observable interface for deploy operations. The presentation layer
//! subscribes through a sink instead of the core writing into shared UI
//! state. Enables progress reporting, NDJSON event streams, and debugging.

use std::path::PathBuf;
use std::sync::Mutex;

use serde::Serialize;

use crate::domain::entities::{DeployScope, OperationState};
use crate::domain::value_objects::Destination;

/// Event emitted during deploy operations
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DeployEvent {
    /// Operation moved to a new lifecycle state
    StateChanged { state: OperationState },

    /// Planning finished with `rules` applicable rules
    OperationStarted { scope: DeployScope, rules: usize },

    /// A rule's deploy began
    RuleStarted {
        index: usize,
        source: PathBuf,
        target: String,
    },

    /// Target tree was removed before a workspace deploy
    TargetPurged { target: String },

    /// Target tree removal failed; the deploy goes on
    TargetPurgeFailed { target: String, error: String },

    /// File was written to a destination
    FileDeployed {
        source: PathBuf,
        destination: Destination,
    },

    /// File failed for one rule
    FileFailed { source: PathBuf, error: String },

    /// Enumerated entry was not deployed
    FileSkipped { source: PathBuf, reason: String },

    /// Workspace deploy progress after each file
    Progress {
        completed: usize,
        planned: usize,
        increment_percent: f64,
        message: String,
    },

    /// Operation ended
    Completed {
        planned: usize,
        completed: usize,
        failed: usize,
        cancelled: bool,
    },
}

impl DeployEvent {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Trait for receiving deploy events
///
/// Implementations can be:
/// - console sink: progress display in terminal
/// - NDJSON sink: event stream for CI
/// - `NoopEventSink`: silent operation
pub trait DeployEventSink: Send + Sync {
    /// Handle a deploy event
    fn on_event(&self, event: DeployEvent);

    /// Check if this sink wants per-file events
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}

/// Sink that keeps every event, for assertions
#[derive(Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<DeployEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DeployEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// States seen through `StateChanged`, in order
    pub fn states(&self) -> Vec<OperationState> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                DeployEvent::StateChanged { state } => Some(state),
                _ => None,
            })
            .collect()
    }
}

impl DeployEventSink for RecordingEventSink {
    fn on_event(&self, event: DeployEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}
