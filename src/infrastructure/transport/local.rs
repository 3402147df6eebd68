//! Local Copy Transport
//!
//! Materializes files on the local filesystem. Content is written to a
//! sibling temp file and renamed over the destination, so readers never see
//! a partially written file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::domain::ports::{Transport, TransportError};
use crate::domain::value_objects::Destination;

/// Local filesystem transport
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalCopy;

impl LocalCopy {
    pub fn new() -> Self {
        Self
    }

    fn local_path<'a>(dest: &'a Destination) -> Result<&'a Path, String> {
        match dest {
            Destination::Local(path) => Ok(path),
            Destination::Remote(path) => Err(format!(
                "remote destination '{}' cannot be written locally",
                path
            )),
        }
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.fsdeploy.tmp", name))
}

fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = temp_sibling(path);
    if let Err(e) = fs::write(&tmp, bytes).and_then(|_| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

impl Transport for LocalCopy {
    fn name(&self) -> &'static str {
        "local"
    }

    fn ensure_destination(&mut self, dir: &Destination) -> Result<(), TransportError> {
        let path = Self::local_path(dir).map_err(|message| TransportError::DirectoryCreate {
            path: dir.to_string(),
            message,
        })?;
        if path.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(path).map_err(|e| TransportError::DirectoryCreate {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    fn write(&mut self, dest: &Destination, bytes: &[u8]) -> Result<(), TransportError> {
        let path = Self::local_path(dest).map_err(|message| TransportError::Write {
            path: dest.to_string(),
            message,
        })?;
        atomic_write(path, bytes).map_err(|e| TransportError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    fn purge(&mut self, root: &Destination) -> Result<(), TransportError> {
        let delete_error = |message: String| TransportError::TargetDelete {
            path: root.to_string(),
            message,
        };
        let path = Self::local_path(root).map_err(delete_error)?;
        if path.parent().is_none() {
            return Err(delete_error("refusing to delete a filesystem root".to_string()));
        }
        match fs::remove_dir_all(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(delete_error(e.to_string())),
        }
    }
}
