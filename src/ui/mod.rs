//! Terminal presentation: progress sinks and watch event rendering.

pub mod console;
pub mod context;
pub mod json;

use std::sync::Arc;

use fsdeploy::DeployEventSink;

use console::ConsoleEventSink;
use context::UiContext;
use json::JsonEventSink;

/// Pick the deploy event sink for this invocation.
pub fn event_sink(ui: &UiContext) -> Arc<dyn DeployEventSink> {
    if ui.json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(ConsoleEventSink::stderr(ui))
    }
}
