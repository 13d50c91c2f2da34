//! Telegram gateway integration: bot setup, dispatch and intent handlers.

pub mod bot;
pub mod classify;
pub mod dispose;
pub mod handlers;
pub mod pending;
pub mod qr;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use classify::{classify, TextIntent};
pub use handlers::{schema, HandlerDeps, HandlerError};
pub use pending::PendingBets;
pub use qr::{QrDecoder, RqrrDecoder, SharedQrDecoder};
