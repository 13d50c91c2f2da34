use thiserror::Error;

use crate::core::messages;
use crate::storage::StorageError;

/// Failures of the shared preflight checks that run before an intent
/// touches the ledger: chat scope, argument shape, local registration and
/// the record store itself.
///
/// Handlers reply with [`BotError::notice`] and stop; nothing leaks upward
/// out of the dispatcher and nothing is retried. Ledger call failures are
/// not funneled through here — each intent reports those with its own
/// failure notice at the call site.
#[derive(Error, Debug)]
pub enum BotError {
    /// Bad local input; the notice is the usage message. No remote call is
    /// made for these.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Command used outside a private chat when it requires one.
    #[error("command requires a private chat")]
    Scope,

    /// No local wallet record for the named username.
    #[error("no wallet record for {0}")]
    NotFound(String),

    /// Local record store read or write failed. Surfaced to the user the
    /// same way as a remote failure, but it must never be swallowed into a
    /// false success reply.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl BotError {
    /// The single user-visible reply for this failure. Fixed notices only;
    /// storage causes are never echoed into chat.
    pub fn notice(&self) -> String {
        match self {
            BotError::Validation(usage) => usage.clone(),
            BotError::Scope => messages::DM_ONLY_COMMAND.to_string(),
            BotError::NotFound(_) => messages::USER_NOT_FOUND.to_string(),
            BotError::Storage(_) => messages::REQUEST_FAILED.to_string(),
        }
    }
}

pub type BotResult<T> = Result<T, BotError>;
