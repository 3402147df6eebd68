//! Background workspace deploy

use std::thread::JoinHandle;

use crate::domain::value_objects::CancellationToken;
use crate::error::{DeployError, FsDeployResult};

use super::result::DeploySummary;

/// Handle to a workspace deploy running on its own thread
pub struct DeployTask {
    cancellation: CancellationToken,
    handle: JoinHandle<FsDeployResult<DeploySummary>>,
}

impl DeployTask {
    pub(crate) fn new(
        cancellation: CancellationToken,
        handle: JoinHandle<FsDeployResult<DeploySummary>>,
    ) -> Self {
        Self {
            cancellation,
            handle,
        }
    }

    /// Ask the deploy to stop at the next file boundary.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the deploy and return its summary.
    pub fn join(self) -> FsDeployResult<DeploySummary> {
        self.handle.join().map_err(|_| DeployError::TaskPanicked)?
    }
}
