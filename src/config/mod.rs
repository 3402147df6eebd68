//! Configuration module for fsdeploy
//!
//! Deploy rules live in a TOML file found in this order:
//! 1. `--config <path>` CLI flag (highest priority)
//! 2. `FSDEPLOY_CONFIG` environment variable
//! 3. Project config (`<workspace>/.fsdeploy.toml`)
//! 4. User config (`~/.config/fsdeploy/config.toml`)
//! 5. No file: empty rule list

mod loader;
mod types;

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::entities::RuleError;

pub use loader::{
    discover, load_with_warnings, parse_with_warnings, ConfigWarning, CONFIG_ENV_VAR,
    CONFIG_FILE_NAME,
};
pub use types::{Config, NodeConfig, WalkConfig, WatchConfig};

/// Configuration could not be loaded or validated
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// `index` is the 1-based position of the `[[nodes]]` entry
    #[error("invalid deploy rule #{index}: {reason}")]
    InvalidRule { index: usize, reason: RuleError },

    #[error("invalid glob in deploy rule #{index}: {message}")]
    InvalidGlob { index: usize, message: String },
}
