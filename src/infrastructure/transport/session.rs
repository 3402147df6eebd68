//! Remote session abstraction
//!
//! A `SessionConnector` opens one `RemoteSession` per remote operation.
//! `SessionGuard` ties the session's lifetime to a scope and disconnects
//! when dropped, whether the operation succeeded or not.

use std::ops::{Deref, DerefMut};

use crate::domain::entities::RemoteTarget;
use crate::domain::ports::TransportError;

/// An open connection to a remote host
pub trait RemoteSession: Send {
    /// Create `dir` and any missing ancestors.
    fn mkdir_all(&mut self, dir: &str) -> Result<(), TransportError>;

    /// Upload `bytes` to `path`, replacing it.
    fn put(&mut self, path: &str, bytes: &[u8]) -> Result<(), TransportError>;

    /// Recursively remove `path`.
    fn remove_tree(&mut self, path: &str) -> Result<(), TransportError>;

    /// Close the connection. Must be safe to call more than once.
    fn disconnect(&mut self);
}

/// Opens sessions to a remote target
pub trait SessionConnector: Send + Sync {
    fn connect(&self, remote: &RemoteTarget) -> Result<Box<dyn RemoteSession>, TransportError>;
}

/// Scoped session that disconnects on drop
pub struct SessionGuard {
    session: Box<dyn RemoteSession>,
}

impl SessionGuard {
    pub fn open(
        connector: &dyn SessionConnector,
        remote: &RemoteTarget,
    ) -> Result<Self, TransportError> {
        let session = connector.connect(remote)?;
        Ok(Self { session })
    }
}

impl Deref for SessionGuard {
    type Target = dyn RemoteSession;

    fn deref(&self) -> &Self::Target {
        self.session.as_ref()
    }
}

impl DerefMut for SessionGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.session.as_mut()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.session.disconnect();
    }
}
