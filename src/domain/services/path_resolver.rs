//! Path Resolver
//!
//! Turns a rule's configured source/target into absolute roots and computes
//! the destination of a source file by stripping the rule's source prefix
//! and re-rooting the remainder under the target.
//!
//! Local destinations use native separators. Remote destinations are always
//! joined with `/`, whatever the host separator is.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::domain::entities::{DeployRule, ResolvedRule, TargetRoot};
use crate::domain::value_objects::Destination;
use crate::domain::CASE_INSENSITIVE_PATHS;

/// Destination could not be computed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The file's directory is not under the rule's resolved source
    #[error("'{}' is not under rule source '{}'", path.display(), source_root.display())]
    OutsideSource { path: PathBuf, source_root: PathBuf },

    /// The path has no final file name component
    #[error("'{}' has no file name", path.display())]
    NoFileName { path: PathBuf },
}

/// Resolve `maybe_relative` against `root` when it is relative.
///
/// The result is lexically normalized: `.` segments are dropped, `..`
/// segments pop their parent and trailing separators disappear.
pub fn resolve_absolute(root: &Path, maybe_relative: &str) -> PathBuf {
    let path = Path::new(maybe_relative.trim());
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&root.join(path))
    }
}

/// Lexically normalize a path without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if popped {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Normalize a remote base path to forward slashes without a trailing `/`.
pub fn resolve_remote(target: &str) -> String {
    let unified = target.trim().replace('\\', "/");
    let absolute = unified.starts_with('/');
    let segments: Vec<&str> = unified
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();

    match (absolute, segments.is_empty()) {
        (true, _) => format!("/{}", segments.join("/")),
        (false, true) => ".".to_string(),
        (false, false) => segments.join("/"),
    }
}

/// Resolve a configured rule for one workspace.
pub fn resolve_rule(index: usize, rule: &DeployRule, workspace_root: &Path) -> ResolvedRule {
    let source = resolve_absolute(workspace_root, rule.source());
    let target = match rule.enabled_remote() {
        Some(remote) => TargetRoot::Remote {
            base: resolve_remote(rule.target()),
            remote: remote.clone(),
        },
        None => TargetRoot::Local(resolve_absolute(workspace_root, rule.target())),
    };
    ResolvedRule::new(index, rule.clone(), source, target)
}

/// Resolve every rule, keeping declaration order.
pub fn resolve_rules(rules: &[DeployRule], workspace_root: &Path) -> Vec<ResolvedRule> {
    rules
        .iter()
        .enumerate()
        .map(|(index, rule)| resolve_rule(index, rule, workspace_root))
        .collect()
}

fn component_eq(a: Component<'_>, b: Component<'_>) -> bool {
    if CASE_INSENSITIVE_PATHS {
        a.as_os_str().to_string_lossy().to_lowercase()
            == b.as_os_str().to_string_lossy().to_lowercase()
    } else {
        a == b
    }
}

/// Remove `prefix` from `path`, comparing whole components.
///
/// Returns `None` when `path` does not start with `prefix`.
pub fn strip_path_prefix(path: &Path, prefix: &Path) -> Option<PathBuf> {
    let mut rest = path.components();
    for expected in prefix.components() {
        let actual = rest.next()?;
        if !component_eq(actual, expected) {
            return None;
        }
    }
    Some(rest.as_path().to_path_buf())
}

/// Whether `path` is `prefix` or lies beneath it.
pub fn path_starts_with(path: &Path, prefix: &Path) -> bool {
    strip_path_prefix(path, prefix).is_some()
}

/// Whether `path` lies in any of `roots`.
pub fn is_inside_any(path: &Path, roots: &[PathBuf]) -> bool {
    roots.iter().any(|root| path_starts_with(path, root))
}

/// Destination of `file_name` living in `source_dir` under `rule`.
pub fn compute_destination(
    rule: &ResolvedRule,
    source_dir: &Path,
    file_name: &OsStr,
) -> Result<Destination, ResolveError> {
    let subpath =
        strip_path_prefix(source_dir, rule.source()).ok_or_else(|| ResolveError::OutsideSource {
            path: source_dir.to_path_buf(),
            source_root: rule.source().to_path_buf(),
        })?;

    match rule.target() {
        TargetRoot::Local(root) => {
            let mut dest = root.clone();
            for component in subpath.components() {
                dest.push(component.as_os_str());
            }
            dest.push(file_name);
            Ok(Destination::Local(dest))
        }
        TargetRoot::Remote { base, .. } => {
            let mut segments: Vec<String> = vec![base.trim_end_matches('/').to_string()];
            segments.extend(
                subpath
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned()),
            );
            segments.push(file_name.to_string_lossy().into_owned());
            Ok(Destination::Remote(segments.join("/")))
        }
    }
}

/// Destination of an absolute source file under `rule`.
pub fn destination_for_file(rule: &ResolvedRule, file: &Path) -> Result<Destination, ResolveError> {
    let (dir, name) = match (file.parent(), file.file_name()) {
        (Some(dir), Some(name)) => (dir, name),
        _ => {
            return Err(ResolveError::NoFileName {
                path: file.to_path_buf(),
            })
        }
    };
    compute_destination(rule, dir, name)
}
