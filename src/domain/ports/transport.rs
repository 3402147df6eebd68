//! Transport Port
//!
//! The mechanism that materializes a file at its destination. Two
//! implementations share this contract: a local copy and a remote upload.
//! A transport is selected once per rule, at the start of that rule's deploy.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::value_objects::Destination;

/// Per-file transport failure
///
/// All variants are contained by the orchestrator: the file is marked failed
/// and the deploy moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("failed to read '{}': {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("failed to create directory '{path}': {message}")]
    DirectoryCreate { path: String, message: String },

    #[error("failed to write '{path}': {message}")]
    Write { path: String, message: String },

    #[error("failed to upload '{path}': {message}")]
    Upload { path: String, message: String },

    #[error("failed to connect to '{host}': {message}")]
    Connect { host: String, message: String },

    #[error("failed to delete target '{path}': {message}")]
    TargetDelete { path: String, message: String },
}

/// Sink that writes file content to a destination
pub trait Transport: Send {
    /// Short name for logs ("local", "remote")
    fn name(&self) -> &'static str;

    /// Make sure directory `dir` exists, creating missing ancestors.
    ///
    /// Existing directories are not an error.
    fn ensure_destination(&mut self, dir: &Destination) -> Result<(), TransportError>;

    /// Write the full `bytes` to `dest`, replacing any previous content.
    fn write(&mut self, dest: &Destination, bytes: &[u8]) -> Result<(), TransportError>;

    /// Recursively remove the tree rooted at `root`.
    fn purge(&mut self, root: &Destination) -> Result<(), TransportError>;

    /// Ensure the parent directory of `dest`, then write.
    fn deliver(&mut self, dest: &Destination, bytes: &[u8]) -> Result<(), TransportError> {
        if let Some(dir) = dest.parent() {
            self.ensure_destination(&dir)?;
        }
        self.write(dest, bytes)
    }
}
