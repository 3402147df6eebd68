//! Transport implementations
//!
//! - `local` - `LocalCopy`, writes into the local filesystem
//! - `remote` - `RemoteUpload`, one session per remote operation
//! - `session` - session traits and the disconnect-on-drop guard
//! - `ssh` - OpenSSH control-master sessions

pub mod local;
pub mod remote;
pub mod session;
pub mod ssh;

use std::sync::Arc;

use crate::domain::entities::TargetRoot;
use crate::domain::ports::Transport;

pub use local::LocalCopy;
pub use remote::RemoteUpload;
pub use session::{RemoteSession, SessionConnector, SessionGuard};
pub use ssh::{OpenSshConnector, OpenSshSession};

/// Pick the transport for a rule's target root.
pub fn transport_for(target: &TargetRoot, connector: &Arc<dyn SessionConnector>) -> Box<dyn Transport> {
    match target {
        TargetRoot::Local(_) => Box::new(LocalCopy::new()),
        TargetRoot::Remote { remote, .. } => {
            Box::new(RemoteUpload::new(remote.clone(), Arc::clone(connector)))
        }
    }
}
