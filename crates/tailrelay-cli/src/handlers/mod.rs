//! Command handlers.
//!
//! Handlers are thin: they run [`RelayTools`](crate::tools::RelayTools)
//! operations and print the answers. Tool text goes to stdout; diagnostics
//! go through `tracing` to stderr.

pub mod clear;
pub mod console;
pub mod paths;
pub mod read;
pub mod serve;
