//! Handler types and shared dependencies.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::ChatKind;

use crate::core::error::{BotError, BotResult};
use crate::ledger::LedgerClient;
use crate::storage::{RecordStore, UserRecord};
use crate::telegram::pending::PendingBets;
use crate::telegram::qr::SharedQrDecoder;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies injected into every handler.
///
/// Constructed once in `main`; tests build one around fakes (a wiremock
/// ledger, a temp-dir record store, a stub decoder) and call the same
/// handlers production dispatches to. No module-level singletons.
#[derive(Clone)]
pub struct HandlerDeps {
    pub ledger: Arc<LedgerClient>,
    pub records: Arc<RecordStore>,
    pub pending_bets: PendingBets,
    pub qr_decoder: SharedQrDecoder,
    /// Shared HTTP client, used for downloading photo files.
    pub http: reqwest::Client,
    /// Whether /send requires a private chat (see `config::SEND_DM_ONLY`).
    pub send_dm_only: bool,
}

impl HandlerDeps {
    pub fn new(
        ledger: Arc<LedgerClient>,
        records: Arc<RecordStore>,
        pending_bets: PendingBets,
        qr_decoder: SharedQrDecoder,
        http: reqwest::Client,
        send_dm_only: bool,
    ) -> Self {
        Self {
            ledger,
            records,
            pending_bets,
            qr_decoder,
            http,
            send_dm_only,
        }
    }
}

/// True for one-on-one chats with the bot.
pub fn is_private_chat(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Enforces a private-chat scope restriction; DM-only intents run this
/// before anything else.
pub fn require_private(msg: &Message) -> BotResult<()> {
    if is_private_chat(msg) {
        Ok(())
    } else {
        Err(BotError::Scope)
    }
}

/// Username of the sender. Required for every wallet-touching intent;
/// Telegram accounts without a handle cannot hold a wallet here.
pub fn sender_username(msg: &Message) -> Option<&str> {
    msg.from.as_ref().and_then(|u| u.username.as_deref())
}

/// Looks up the sender's wallet record; unregistered users get
/// [`BotError::NotFound`] and no intent that needs a wallet proceeds to a
/// remote call without one.
pub fn require_registered(deps: &HandlerDeps, username: &str) -> BotResult<UserRecord> {
    match deps.records.get(username) {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(BotError::NotFound(username.to_string())),
        Err(err) => Err(err.into()),
    }
}
