#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod broadcast;
pub mod error;
pub mod line;
pub mod settings;
pub mod store;

// Re-export commonly used types for convenience
pub use broadcast::{BroadcastRegistry, SubscriberId, Subscription};
pub use error::StoreError;
pub use line::LogLine;
pub use settings::{
    AckMode, DEFAULT_HOST, DEFAULT_LOG_FILE, DEFAULT_MAX_BODY_BYTES, DEFAULT_PORT,
    ParseAckModeError, RelayConfig,
};
pub use store::LogStore;
