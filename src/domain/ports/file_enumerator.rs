//! File Enumerator Port
//!
//! Finds the files a workspace deploy should visit for one rule.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::value_objects::GlobFilter;

/// Enumeration of a root failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to enumerate files under '{}': {message}", root.display())]
pub struct EnumerateError {
    pub root: PathBuf,
    pub message: String,
}

/// Where an enumerated entry lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriScheme {
    /// Plain file on the local filesystem
    File,
    /// Anything else; skipped by the deploy without error
    Other(String),
}

/// One enumeration result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumeratedFile {
    pub scheme: UriScheme,
    pub path: PathBuf,
}

impl EnumeratedFile {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            scheme: UriScheme::File,
            path: path.into(),
        }
    }

    pub fn is_local(&self) -> bool {
        self.scheme == UriScheme::File
    }
}

/// Finder of files matching an include/exclude pair under a root
pub trait FileEnumerator: Send + Sync {
    /// Walk `root` and keep the files `filter` accepts. Relative patterns
    /// are matched against the path relative to `base`.
    fn find_files(
        &self,
        root: &Path,
        base: &Path,
        filter: &GlobFilter,
    ) -> Result<Vec<EnumeratedFile>, EnumerateError>;
}
