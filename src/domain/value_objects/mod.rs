//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod cancellation;
mod destination;
mod glob_filter;

pub use cancellation::CancellationToken;
pub use destination::Destination;
pub use glob_filter::GlobFilter;
