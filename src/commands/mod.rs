//! Command handlers
//!
//! Each handler builds its collaborators from a `CommandContext` and maps
//! the library result onto console or NDJSON output.

pub mod deploy;
pub mod status;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use fsdeploy::config::Config;
use fsdeploy::infrastructure::{OpenSshConnector, SessionConnector, TomlRuleSource, WalkEnumerator};
use fsdeploy::DeployOrchestrator;

use crate::ui::context::UiContext;

/// Settings shared by all subcommands
pub struct CommandContext {
    pub workspace_root: PathBuf,
    pub config_path: Option<PathBuf>,
    pub ui: UiContext,
}

impl CommandContext {
    pub fn new(
        workspace: Option<&Path>,
        config_path: Option<PathBuf>,
        json: bool,
        verbose: u8,
    ) -> Result<Self> {
        let requested = match workspace {
            Some(path) => path.to_path_buf(),
            None => std::env::current_dir().context("cannot determine current directory")?,
        };
        let workspace_root = requested
            .canonicalize()
            .with_context(|| format!("workspace '{}' not found", requested.display()))?;

        Ok(Self {
            workspace_root,
            config_path,
            ui: UiContext::new(json, verbose),
        })
    }

    pub fn rule_source(&self) -> TomlRuleSource {
        let source = TomlRuleSource::new(&self.workspace_root);
        match &self.config_path {
            Some(path) => source.with_path(path),
            None => source,
        }
    }

    /// Orchestrator wired to the real filesystem and OpenSSH, plus the
    /// configuration it was built from.
    pub fn orchestrator(&self) -> Result<(DeployOrchestrator, Config)> {
        let source = self.rule_source();
        let config = source.load_config()?;
        config.rules()?;
        let connector: Arc<dyn SessionConnector> = Arc::new(OpenSshConnector::new());
        let orchestrator = DeployOrchestrator::new(
            &self.workspace_root,
            source,
            WalkEnumerator::from_config(&config.walk),
            connector,
        );
        Ok((orchestrator, config))
    }

    /// Resolve a user-supplied file against the current directory.
    pub fn file_path(&self, file: &Path) -> Result<PathBuf> {
        if let Ok(path) = file.canonicalize() {
            return Ok(path);
        }
        if file.is_absolute() {
            return Ok(file.to_path_buf());
        }
        let cwd = std::env::current_dir().context("cannot determine current directory")?;
        Ok(cwd.join(file))
    }
}
