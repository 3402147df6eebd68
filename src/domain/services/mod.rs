//! Domain Services
//!
//! Stateless logic of the rule engine.

pub mod path_resolver;
pub mod rule_matcher;
mod status;

pub use path_resolver::{
    compute_destination, destination_for_file, is_inside_any, normalize_path, path_starts_with,
    resolve_absolute, resolve_remote, resolve_rule, resolve_rules, strip_path_prefix, ResolveError,
};
pub use rule_matcher::{local_target_roots, rules_for_file, rules_for_workspace};
pub use status::{describe_rule, DeployStatus};
