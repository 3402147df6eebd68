//! Configuration type definitions

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{DeployRule, RemoteTarget};
use crate::domain::value_objects::GlobFilter;

use super::loader::{self, ConfigWarning};
use super::ConfigError;

/// One `[[nodes]]` entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub target: String,

    #[serde(default)]
    pub include: String,

    #[serde(default)]
    pub exclude: String,

    #[serde(default, alias = "deleteTargetBeforeDeploy")]
    pub delete_target_before_deploy: bool,

    #[serde(default, alias = "scp", skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteTarget>,
}

impl NodeConfig {
    /// Validate the entry into a rule. `position` is 1-based.
    pub fn to_rule(&self, position: usize) -> Result<DeployRule, ConfigError> {
        let invalid = |reason| ConfigError::InvalidRule {
            index: position,
            reason,
        };

        let filter = GlobFilter::new(&self.include, &self.exclude).map_err(|e| {
            ConfigError::InvalidGlob {
                index: position,
                message: e.to_string(),
            }
        })?;

        let mut rule = DeployRule::new(self.source.as_str(), self.target.as_str())
            .map_err(invalid)?
            .with_filter(filter)
            .with_delete_target_before_deploy(self.delete_target_before_deploy);

        if let Some(remote) = &self.remote {
            rule = rule.with_remote(remote.clone()).map_err(invalid)?;
        }

        Ok(rule)
    }
}

/// Save-trigger settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    100
}

/// Workspace enumeration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkConfig {
    #[serde(default)]
    pub respect_gitignore: bool,

    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// Skip version-control metadata directories (`.git`, `.svn`, `.hg`, `CVS`)
    #[serde(default = "default_true")]
    pub skip_vcs: bool,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            respect_gitignore: false,
            include_hidden: true,
            skip_vcs: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub walk: WalkConfig,
}

impl Config {
    /// Load configuration from a TOML file, dropping warnings.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::load_with_warnings(path)?.0)
    }

    /// Load configuration and collect unknown-key warnings.
    pub fn load_with_warnings(path: &Path) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        loader::load_with_warnings(path)
    }

    /// Validated rules in declaration order.
    pub fn rules(&self) -> Result<Vec<DeployRule>, ConfigError> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| node.to_rule(i + 1))
            .collect()
    }
}
