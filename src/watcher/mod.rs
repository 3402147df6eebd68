//! File watcher for save-triggered deploys
//!
//! Implements the `watch` command with:
//! - Debouncing (100ms by default)
//! - Single-file deploy per settled path
//! - Graceful Ctrl+C shutdown
//! - NDJSON output for CI

mod event;
mod sync;

pub use event::{WatchEvent, WatchOptions, DEBOUNCE_MS};
pub use sync::watch;
