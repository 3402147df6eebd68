//! Human-readable progress output.
//!
//! Per-file lines go to the writer only with `-v`; failures always do.
//! On a terminal the progress percentage redraws in place.

use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use fsdeploy::{DeployEvent, DeployEventSink, DeploySummary, WatchEvent};

use super::context::UiContext;

struct ConsoleState {
    writer: Box<dyn Write + Send>,
    percent: f64,
    /// A progress line is drawn and must be cleared before the next line
    dirty: bool,
}

pub struct ConsoleEventSink {
    state: Mutex<ConsoleState>,
    verbose: bool,
    live: bool,
}

impl ConsoleEventSink {
    pub fn stderr(ui: &UiContext) -> Self {
        Self::with_writer(io::stderr(), ui.verbose > 0, ui.live)
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W, verbose: bool, live: bool) -> Self {
        Self {
            state: Mutex::new(ConsoleState {
                writer: Box::new(writer),
                percent: 0.0,
                dirty: false,
            }),
            verbose,
            live,
        }
    }

    fn line(&self, text: &str) {
        let mut state = self.lock();
        if state.dirty {
            let _ = write!(state.writer, "\r\x1b[2K");
            state.dirty = false;
        }
        let _ = writeln!(state.writer, "{}", text);
        let _ = state.writer.flush();
    }

    fn progress(&self, increment: f64, message: &str) {
        let mut state = self.lock();
        state.percent = (state.percent + increment).min(100.0);
        if !self.live {
            return;
        }
        let percent = state.percent;
        let _ = write!(state.writer, "\r\x1b[2K[{:>3.0}%] {}", percent, message);
        let _ = state.writer.flush();
        state.dirty = true;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ConsoleState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DeployEventSink for ConsoleEventSink {
    fn on_event(&self, event: DeployEvent) {
        match event {
            DeployEvent::StateChanged { .. } => {}
            DeployEvent::OperationStarted { scope, rules } => {
                self.lock().percent = 0.0;
                if self.verbose {
                    self.line(&format!("Deploying {} ({} rule(s))", scope, rules));
                }
            }
            DeployEvent::RuleStarted { source, target, .. } => {
                if self.verbose {
                    self.line(&format!("'{}' to '{}'", source.display(), target));
                }
            }
            DeployEvent::TargetPurged { target } => {
                self.line(&format!("  purged {}", target));
            }
            DeployEvent::TargetPurgeFailed { target, error } => {
                self.line(&format!("  ! could not purge {}: {}", target, error));
            }
            DeployEvent::FileDeployed {
                source,
                destination,
            } => {
                if self.verbose {
                    self.line(&format!("  ✓ {} -> {}", source.display(), destination));
                }
            }
            DeployEvent::FileFailed { source, error } => {
                self.line(&format!("  ✗ {}: {}", source.display(), error));
            }
            DeployEvent::FileSkipped { source, reason } => {
                if self.verbose {
                    self.line(&format!("  - {} ({})", source.display(), reason));
                }
            }
            DeployEvent::Progress {
                increment_percent,
                message,
                ..
            } => self.progress(increment_percent, &message),
            DeployEvent::Completed { .. } => {
                let mut state = self.lock();
                if state.dirty {
                    let _ = write!(state.writer, "\r\x1b[2K");
                    let _ = state.writer.flush();
                    state.dirty = false;
                }
            }
        }
    }
}

/// Final lines printed after a deploy returns.
pub fn render_summary(summary: &DeploySummary) -> String {
    let mark = if summary.is_success() { "✓" } else { "✗" };
    let mut out = format!("{} {}\n", mark, summary.message());
    for failure in &summary.failures {
        out.push_str(&format!(
            "  rule #{}: {}: {}\n",
            failure.rule + 1,
            failure.path.display(),
            failure.reason
        ));
    }
    out
}

/// `HH:MM:SS` (UTC) for watch output.
pub fn timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| clock(d.as_secs()))
        .unwrap_or_else(|_| "00:00:00".to_string())
}

fn clock(epoch_secs: u64) -> String {
    let secs = epoch_secs % 86_400;
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

pub fn render_watch_event(timestamp: &str, event: &WatchEvent) -> String {
    match event {
        WatchEvent::WatchStarted { root } => {
            format!("[{}] Watching {} (Ctrl+C to stop)\n", timestamp, root)
        }
        WatchEvent::FileChanged { path } => format!("[{}] Saved {}\n", timestamp, path),
        WatchEvent::Deployed {
            path,
            completed,
            failed,
        } => {
            if *failed == 0 {
                format!("[{}] ✓ {} ({} target(s))\n", timestamp, path, completed)
            } else {
                format!(
                    "[{}] ✗ {} ({} deployed, {} failed)\n",
                    timestamp, path, completed, failed
                )
            }
        }
        WatchEvent::OutOfScope { path } => {
            format!("[{}] - {} is not covered by any rule\n", timestamp, path)
        }
        WatchEvent::Error { message } => format!("[{}] Error: {}\n", timestamp, message),
        WatchEvent::Shutdown => format!("[{}] Stopped watching\n", timestamp),
    }
}
