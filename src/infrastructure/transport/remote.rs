//! Remote Upload Transport
//!
//! Every remote operation runs in its own session: connect, do the work,
//! disconnect. Nothing is pooled across files, so a failed upload can be
//! retried on its own.

use std::sync::Arc;

use tracing::debug;

use super::session::{SessionConnector, SessionGuard};
use crate::domain::entities::RemoteTarget;
use crate::domain::ports::{Transport, TransportError};
use crate::domain::value_objects::Destination;

/// Upload transport for one rule's remote target
pub struct RemoteUpload {
    remote: RemoteTarget,
    connector: Arc<dyn SessionConnector>,
}

impl RemoteUpload {
    pub fn new(remote: RemoteTarget, connector: Arc<dyn SessionConnector>) -> Self {
        Self { remote, connector }
    }

    fn open(&self) -> Result<SessionGuard, TransportError> {
        debug!(host = %self.remote.host, port = self.remote.port, "opening remote session");
        SessionGuard::open(self.connector.as_ref(), &self.remote)
    }

    fn remote_path<'a>(dest: &'a Destination) -> Result<&'a str, String> {
        match dest {
            Destination::Remote(path) => Ok(path),
            Destination::Local(path) => Err(format!(
                "local destination '{}' cannot be uploaded",
                path.display()
            )),
        }
    }
}

impl Transport for RemoteUpload {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn ensure_destination(&mut self, dir: &Destination) -> Result<(), TransportError> {
        let path = Self::remote_path(dir).map_err(|message| TransportError::DirectoryCreate {
            path: dir.to_string(),
            message,
        })?;
        let mut session = self.open()?;
        session.mkdir_all(path)
    }

    fn write(&mut self, dest: &Destination, bytes: &[u8]) -> Result<(), TransportError> {
        let path = Self::remote_path(dest).map_err(|message| TransportError::Upload {
            path: dest.to_string(),
            message,
        })?;
        let mut session = self.open()?;
        session.put(path, bytes)
    }

    fn purge(&mut self, root: &Destination) -> Result<(), TransportError> {
        let delete_error = |message: String| TransportError::TargetDelete {
            path: root.to_string(),
            message,
        };
        let path = Self::remote_path(root).map_err(delete_error)?;
        if path == "/" || path == "." {
            return Err(delete_error("refusing to delete a remote root".to_string()));
        }
        let mut session = self.open()?;
        session.remove_tree(path)
    }

    /// One session covers the directory creation and the upload.
    fn deliver(&mut self, dest: &Destination, bytes: &[u8]) -> Result<(), TransportError> {
        let path = Self::remote_path(dest).map_err(|message| TransportError::Upload {
            path: dest.to_string(),
            message,
        })?;
        let mut session = self.open()?;
        if let Some(Destination::Remote(dir)) = dest.parent() {
            session.mkdir_all(&dir)?;
        }
        session.put(path, bytes)
    }
}
