//! Destination value object
//!
//! A computed deploy destination. Local destinations are native paths;
//! remote destinations are always forward-slash strings, whatever the host
//! separator is.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Where a single file is materialized
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum Destination {
    /// Path on the local filesystem (native separators)
    Local(PathBuf),
    /// Path on the remote host (forward slashes)
    Remote(String),
}

impl Destination {
    /// Directory containing this destination, if any.
    pub fn parent(&self) -> Option<Destination> {
        match self {
            Destination::Local(path) => path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| Destination::Local(p.to_path_buf())),
            Destination::Remote(path) => match path.trim_end_matches('/').rsplit_once('/') {
                Some(("", _)) => Some(Destination::Remote("/".to_string())),
                Some((dir, _)) => Some(Destination::Remote(dir.to_string())),
                None => None,
            },
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Local(path) => write!(f, "{}", path.display()),
            Destination::Remote(path) => write!(f, "{}", path),
        }
    }
}
