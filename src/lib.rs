//! satsbet — Telegram bot for custodial Lightning wallets and betting
//! competitions.
//!
//! The bot is a command router over an external LNbits-style ledger
//! service plus a thin on-disk cache of username -> wallet identifiers.
//! All money movement happens on the remote ledger; this process holds no
//! balances and no keys.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, user-visible messages
//! - `storage`: the per-user wallet record store
//! - `ledger`: HTTP client for the wallet/payments/competitions service
//! - `telegram`: dispatcher schema and intent handlers

pub mod core;
pub mod ledger;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{config, BotError};
pub use crate::ledger::{LedgerClient, LedgerError};
pub use crate::storage::{RecordStore, StorageError, UserRecord};
pub use crate::telegram::{schema, HandlerDeps, HandlerError};
