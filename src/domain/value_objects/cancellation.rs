//! Cooperative cancellation flag
//!
//! Shared between the orchestrator (which polls it between files) and the
//! caller (which sets it asynchronously, e.g. from a Ctrl+C handler).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable handle to a shared cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing flag where `true` means "cancel requested".
    pub fn from_flag(flag: Arc<AtomicBool>) -> Self {
        Self { flag }
    }

    /// Request cancellation. Takes effect at the next file boundary.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_starts_uncancelled() {
        assert!(!CancellationToken::new().is_cancelled());
    }

    #[test]
    fn clones_share_the_flag() {
        let token = CancellationToken::new();
        let other = token.clone();
        other.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn from_flag_observes_external_store() {
        let flag = Arc::new(AtomicBool::new(false));
        let token = CancellationToken::from_flag(flag.clone());
        flag.store(true, Ordering::SeqCst);
        assert!(token.is_cancelled());
    }
}
