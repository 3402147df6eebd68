//! Workspace file enumeration
//!
//! Walks a root directory with `ignore::WalkBuilder` and keeps the regular
//! files accepted by a rule's include/exclude filter, in file-name order.

use std::path::Path;

use ignore::{DirEntry, WalkBuilder};
use tracing::warn;

use crate::config::WalkConfig;
use crate::domain::ports::{EnumerateError, EnumeratedFile, FileEnumerator, UriScheme};
use crate::domain::services::strip_path_prefix;
use crate::domain::value_objects::GlobFilter;

/// Version-control metadata directories skipped when `skip_vcs` is set
const VCS_DIRS: &[&str] = &[".git", ".svn", ".hg", "CVS"];

/// Filesystem walker behind workspace deploys
#[derive(Debug, Clone, Copy)]
pub struct WalkEnumerator {
    respect_gitignore: bool,
    include_hidden: bool,
    skip_vcs: bool,
}

impl Default for WalkEnumerator {
    fn default() -> Self {
        Self::from_config(&WalkConfig::default())
    }
}

impl WalkEnumerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &WalkConfig) -> Self {
        Self {
            respect_gitignore: config.respect_gitignore,
            include_hidden: config.include_hidden,
            skip_vcs: config.skip_vcs,
        }
    }

    pub fn respect_gitignore(mut self, yes: bool) -> Self {
        self.respect_gitignore = yes;
        self
    }

    pub fn include_hidden(mut self, yes: bool) -> Self {
        self.include_hidden = yes;
        self
    }

    pub fn skip_vcs(mut self, yes: bool) -> Self {
        self.skip_vcs = yes;
        self
    }
}

fn is_vcs_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_some_and(|t| t.is_dir())
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| VCS_DIRS.contains(&name))
}

impl FileEnumerator for WalkEnumerator {
    fn find_files(
        &self,
        root: &Path,
        base: &Path,
        filter: &GlobFilter,
    ) -> Result<Vec<EnumeratedFile>, EnumerateError> {
        if !root.is_dir() {
            return Err(EnumerateError {
                root: root.to_path_buf(),
                message: "not a directory".to_string(),
            });
        }

        let skip_vcs = self.skip_vcs;
        let walker = WalkBuilder::new(root)
            .hidden(!self.include_hidden)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .ignore(self.respect_gitignore)
            .parents(self.respect_gitignore)
            .require_git(false)
            .follow_links(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| !(skip_vcs && is_vcs_dir(entry)))
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(root = %root.display(), "skipping unreadable entry: {}", e);
                    continue;
                }
            };
            let Some(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                continue;
            }

            let path = entry.path();
            let relative = strip_path_prefix(path, base);
            if !filter.matches(path, relative.as_deref()) {
                continue;
            }

            if file_type.is_file() {
                files.push(EnumeratedFile::local(path));
            } else {
                files.push(EnumeratedFile {
                    scheme: UriScheme::Other("special".to_string()),
                    path: path.to_path_buf(),
                });
            }
        }

        Ok(files)
    }
}
