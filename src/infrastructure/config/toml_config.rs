//! TOML-backed rule source.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::{self, Config, ConfigError};
use crate::domain::entities::DeployRule;
use crate::domain::ports::RuleSource;

/// Rule source that re-reads the TOML configuration on every call.
///
/// Discovery runs each time too, so a config file created after startup
/// is picked up by the next deploy.
#[derive(Debug, Clone)]
pub struct TomlRuleSource {
    workspace_root: PathBuf,
    explicit: Option<PathBuf>,
}

impl TomlRuleSource {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            explicit: None,
        }
    }

    /// Always read `path`, skipping discovery.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit = Some(path.into());
        self
    }

    /// The file the next load would read, if any.
    pub fn config_path(&self) -> Option<PathBuf> {
        config::discover(&self.workspace_root, self.explicit.as_deref())
    }

    /// Load the full configuration, logging unknown keys.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let Some(path) = self.config_path() else {
            debug!(workspace = %self.workspace_root.display(), "no deploy configuration found");
            return Ok(Config::default());
        };
        load_logged(&path)
    }
}

fn load_logged(path: &Path) -> Result<Config, ConfigError> {
    let (config, warnings) = Config::load_with_warnings(path)?;
    for warning in &warnings {
        warn!("{}", warning);
    }
    debug!(path = %path.display(), rules = config.nodes.len(), "loaded deploy configuration");
    Ok(config)
}

impl RuleSource for TomlRuleSource {
    fn load_rules(&self) -> Result<Vec<DeployRule>, ConfigError> {
        self.load_config()?.rules()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn load_rules_from_explicit_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deploy.toml");
        fs::write(
            &path,
            r#"
[[nodes]]
source = "src"
target = "/out"
include = "**/*.js"
"#,
        )
        .unwrap();

        let source = TomlRuleSource::new(dir.path()).with_path(&path);
        let rules = source.load_rules().unwrap();

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].filter().include_pattern(), "**/*.js");
    }

    #[test]
    fn rules_are_read_fresh_each_time() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deploy.toml");
        fs::write(&path, "[[nodes]]\nsource = \"a\"\ntarget = \"/out/a\"\n").unwrap();
        let source = TomlRuleSource::new(dir.path()).with_path(&path);

        assert_eq!(source.load_rules().unwrap().len(), 1);

        fs::write(
            &path,
            "[[nodes]]\nsource = \"a\"\ntarget = \"/out/a\"\n\n[[nodes]]\nsource = \"b\"\ntarget = \"/out/b\"\n",
        )
        .unwrap();

        assert_eq!(source.load_rules().unwrap().len(), 2);
    }

    #[test]
    fn missing_explicit_config_errors() {
        let dir = tempdir().unwrap();
        let source = TomlRuleSource::new(dir.path()).with_path(dir.path().join("missing.toml"));

        assert!(matches!(
            source.load_rules(),
            Err(ConfigError::Read { .. })
        ));
    }
}
