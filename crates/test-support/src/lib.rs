//! Utilities for the `logmsg` acceptance tests.

/// Hamcrest matchers over process output.
pub mod matchers;
/// Building and running processes.
pub mod process;
pub mod project;

pub use process::Builder as ProcessBuilder;
pub use process::Error as ProcessError;
