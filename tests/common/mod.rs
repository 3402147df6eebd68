//! Common test utilities for fsdeploy CLI tests.
//!
//! - `TestEnv`: isolated workspace, output and home directories
//! - Assertion macros: `assert_deployed!`, `assert_output_contains!`

pub mod assertions;
pub mod env;

#[allow(unused_imports)]
pub use assertions::*;
pub use env::*;
