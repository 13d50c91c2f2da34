//! Telegram bot handler tree.
//!
//! The handler chain is built by [`schema`], which production and
//! integration tests share; all collaborators arrive via [`HandlerDeps`].

pub mod bets;
pub mod commands;
pub mod payments;
mod schema;
mod types;

pub use schema::schema;
pub use types::{is_private_chat, require_private, require_registered, sender_username, HandlerDeps, HandlerError};
