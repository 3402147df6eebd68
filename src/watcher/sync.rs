//! Save-triggered deploys

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::event::{AccessKind, AccessMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::debug;

use crate::application::DeployOrchestrator;
use crate::domain::ports::DeployEventSink;
use crate::domain::services::{is_inside_any, local_target_roots};
use crate::error::{DeployError, FsDeployResult};

use super::event::{WatchEvent, WatchOptions, WatcherState};

const STARTUP_COOLDOWN: Duration = Duration::from_millis(500);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Whether a notify event means file content may have been written
pub(crate) fn is_write_event(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_)
            | EventKind::Modify(_)
            | EventKind::Access(AccessKind::Close(AccessMode::Write))
    )
}

/// Local target roots of the current rules; changes under them are our own writes
fn current_target_roots(orchestrator: &DeployOrchestrator) -> Vec<PathBuf> {
    orchestrator
        .resolved_rules()
        .map(|rules| local_target_roots(&rules))
        .unwrap_or_default()
}

/// Watch `options.root` and deploy every saved file until `running` clears.
pub fn watch(
    options: WatchOptions,
    orchestrator: &DeployOrchestrator,
    running: Arc<AtomicBool>,
    sink: &dyn DeployEventSink,
    event_callback: impl Fn(WatchEvent),
) -> FsDeployResult<()> {
    let (tx, rx) = channel();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                if !is_write_event(&event.kind) {
                    return;
                }
                for path in event.paths {
                    let _ = tx.send(path);
                }
            }
        },
        notify::Config::default(),
    )
    .map_err(|e| DeployError::Io(std::io::Error::other(e.to_string())))?;

    watcher
        .watch(&options.root, RecursiveMode::Recursive)
        .map_err(|e| DeployError::Io(std::io::Error::other(e.to_string())))?;

    event_callback(WatchEvent::WatchStarted {
        root: options.root.display().to_string(),
    });

    // notify sometimes reports existing files right after registration
    let cooldown_end = Instant::now() + STARTUP_COOLDOWN;
    while Instant::now() < cooldown_end {
        let _ = rx.recv_timeout(POLL_INTERVAL);
    }

    let mut state = WatcherState::new(options.debounce);

    while running.load(Ordering::SeqCst) {
        if let Ok(path) = rx.recv_timeout(POLL_INTERVAL) {
            state.add_change(path);
        }

        if state.should_sync() {
            let changes = state.take_changes();
            let targets = current_target_roots(orchestrator);
            for path in changes {
                deploy_saved(orchestrator, &path, &targets, sink, &event_callback);
            }
        }
    }

    event_callback(WatchEvent::Shutdown);
    Ok(())
}

fn deploy_saved(
    orchestrator: &DeployOrchestrator,
    path: &Path,
    targets: &[PathBuf],
    sink: &dyn DeployEventSink,
    callback: &impl Fn(WatchEvent),
) {
    // Directories and deleted paths
    if !path.is_file() {
        return;
    }
    if is_inside_any(path, targets) {
        debug!(path = %path.display(), "ignoring change inside a deploy target");
        return;
    }

    let display = path.display().to_string();
    callback(WatchEvent::FileChanged {
        path: display.clone(),
    });

    match orchestrator.deploy_file(path, sink) {
        Ok(summary) if summary.is_noop() => callback(WatchEvent::OutOfScope { path: display }),
        Ok(summary) => callback(WatchEvent::Deployed {
            path: display,
            completed: summary.files_completed,
            failed: summary.files_failed,
        }),
        Err(e) => callback(WatchEvent::Error {
            message: e.to_string(),
        }),
    }
}
