//! Rule Source Port
//!
//! The configuration provider. The orchestrator asks for a fresh snapshot
//! of the rules at the start of every operation and never caches it.

use crate::config::ConfigError;
use crate::domain::entities::DeployRule;

/// Supplier of the ordered rule list
pub trait RuleSource: Send + Sync {
    fn load_rules(&self) -> Result<Vec<DeployRule>, ConfigError>;
}

/// A fixed rule list is its own source.
impl RuleSource for Vec<DeployRule> {
    fn load_rules(&self) -> Result<Vec<DeployRule>, ConfigError> {
        Ok(self.clone())
    }
}
