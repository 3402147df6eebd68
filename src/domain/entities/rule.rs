//! Deploy rule entity
//!
//! A rule maps a source scope (path prefix + include/exclude globs) to a
//! target root. Rules are immutable once built; a deploy operation works on
//! `ResolvedRule`s produced from a fresh snapshot of the configuration.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::value_objects::{Destination, GlobFilter};

/// Default SSH port for remote targets
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Why a rule could not be built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("source must not be empty")]
    EmptySource,

    #[error("target must not be empty")]
    EmptyTarget,

    #[error("remote target is enabled but '{field}' is missing")]
    IncompleteRemote { field: &'static str },
}

/// Remote transport descriptor
///
/// When `enabled` is set, the rule's `target` is a path on `host` reached
/// through the remote transport instead of the local filesystem.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTarget {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub username: String,

    #[serde(default, skip_serializing)]
    pub password: String,
}

fn default_port() -> u16 {
    DEFAULT_SSH_PORT
}

impl RemoteTarget {
    pub fn new(host: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            enabled: true,
            host: host.into(),
            port: DEFAULT_SSH_PORT,
            username: username.into(),
            password: String::new(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// SSH destination string (`user@host`)
    pub fn ssh_destination(&self) -> String {
        if self.username.is_empty() {
            self.host.clone()
        } else {
            format!("{}@{}", self.username, self.host)
        }
    }

    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }

    fn validate(&self) -> Result<(), RuleError> {
        if !self.enabled {
            return Ok(());
        }
        if self.host.trim().is_empty() {
            return Err(RuleError::IncompleteRemote { field: "host" });
        }
        if self.username.trim().is_empty() {
            return Err(RuleError::IncompleteRemote { field: "username" });
        }
        Ok(())
    }
}

impl Default for RemoteTarget {
    fn default() -> Self {
        Self {
            enabled: false,
            host: String::new(),
            port: DEFAULT_SSH_PORT,
            username: String::new(),
            password: String::new(),
        }
    }
}

impl fmt::Debug for RemoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteTarget")
            .field("enabled", &self.enabled)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &if self.has_password() { "***" } else { "" })
            .finish()
    }
}

/// One configured deploy mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRule {
    source: String,
    target: String,
    filter: GlobFilter,
    delete_target_before_deploy: bool,
    remote: Option<RemoteTarget>,
}

impl DeployRule {
    /// Create a rule that matches everything under `source`.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Result<Self, RuleError> {
        let source = source.into();
        let target = target.into();

        if source.trim().is_empty() {
            return Err(RuleError::EmptySource);
        }
        if target.trim().is_empty() {
            return Err(RuleError::EmptyTarget);
        }

        Ok(Self {
            source,
            target,
            filter: GlobFilter::match_all(),
            delete_target_before_deploy: false,
            remote: None,
        })
    }

    pub fn with_filter(mut self, filter: GlobFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_delete_target_before_deploy(mut self, delete: bool) -> Self {
        self.delete_target_before_deploy = delete;
        self
    }

    pub fn with_remote(mut self, remote: RemoteTarget) -> Result<Self, RuleError> {
        remote.validate()?;
        self.remote = Some(remote);
        Ok(self)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn filter(&self) -> &GlobFilter {
        &self.filter
    }

    pub fn delete_target_before_deploy(&self) -> bool {
        self.delete_target_before_deploy
    }

    /// The remote descriptor, only when it is enabled.
    pub fn enabled_remote(&self) -> Option<&RemoteTarget> {
        self.remote.as_ref().filter(|r| r.enabled)
    }
}

/// Resolved target root of a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRoot {
    /// Absolute local directory
    Local(PathBuf),
    /// Forward-slash base path on a remote host
    Remote { base: String, remote: RemoteTarget },
}

impl TargetRoot {
    pub fn destination(&self) -> Destination {
        match self {
            TargetRoot::Local(path) => Destination::Local(path.clone()),
            TargetRoot::Remote { base, .. } => Destination::Remote(base.clone()),
        }
    }
}

impl fmt::Display for TargetRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetRoot::Local(path) => write!(f, "{}", path.display()),
            TargetRoot::Remote { base, remote } => {
                write!(f, "{}:{}", remote.ssh_destination(), base)
            }
        }
    }
}

/// A rule with absolute paths for one workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRule {
    index: usize,
    rule: DeployRule,
    source: PathBuf,
    target: TargetRoot,
}

impl ResolvedRule {
    pub(crate) fn new(index: usize, rule: DeployRule, source: PathBuf, target: TargetRoot) -> Self {
        Self {
            index,
            rule,
            source,
            target,
        }
    }

    /// Position of the rule in declaration order (0-based)
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn rule(&self) -> &DeployRule {
        &self.rule
    }

    /// Absolute source root
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn target(&self) -> &TargetRoot {
        &self.target
    }

    pub fn filter(&self) -> &GlobFilter {
        self.rule.filter()
    }
}
