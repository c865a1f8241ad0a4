#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Dev-dependencies only used by integration tests
#[cfg(test)]
use reqwest as _;
#[cfg(test)]
use tower as _;

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod sse;
pub mod state;

// Re-export primary types
pub use error::{HttpError, ServerError};
pub use routes::create_router;
pub use server::{IngestionServer, ServerStatus};
pub use state::{AppState, RelayContext};
