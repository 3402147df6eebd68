//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `transport/` - Local copy and remote upload transports
//! - `enumerate` - Workspace file walker
//! - `config/` - TOML rule source

pub mod config;
pub mod enumerate;
pub mod transport;

// Re-export for convenience
pub use config::TomlRuleSource;
pub use enumerate::WalkEnumerator;
pub use transport::{transport_for, LocalCopy, OpenSshConnector, RemoteUpload, SessionConnector};
