//! Domain Layer
//!
//! The deploy rule engine - pure logic without I/O dependencies.
//!
//! ## Structure
//!
//! - `entities/` - Deploy rules and the transient deploy operation
//! - `value_objects/` - Glob filters, destinations, cancellation tokens
//! - `services/` - Rule matching, path resolution, deploy status
//! - `ports/` - Interfaces implemented by the infrastructure layer
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system or network directly
//! 2. **Pure Functions** - Services are stateless and testable
//! 3. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;

/// Whether path comparisons on this host ignore case.
pub(crate) const CASE_INSENSITIVE_PATHS: bool = cfg!(any(windows, target_os = "macos"));
