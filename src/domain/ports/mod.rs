//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! The infrastructure layer provides concrete implementations.

pub mod deploy_events;
pub mod file_enumerator;
pub mod rule_source;
pub mod transport;

pub use deploy_events::{DeployEvent, DeployEventSink, NoopEventSink, RecordingEventSink};
pub use file_enumerator::{EnumerateError, EnumeratedFile, FileEnumerator, UriScheme};
pub use rule_source::RuleSource;
pub use transport::{Transport, TransportError};
