//! Configuration provider backed by the TOML config files

mod toml_config;

pub use toml_config::TomlRuleSource;
