//! Configuration, errors, logging and the user-visible reply catalogue.

pub mod config;
pub mod error;
pub mod logging;
pub mod messages;

// Re-exports for convenience
pub use error::{BotError, BotResult};
pub use logging::init_logger;
