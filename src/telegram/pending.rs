//! Conversation state for the two-step bet flow.
//!
//! When a user taps a competition button the bot sends an amount prompt
//! and records the prompt's message id here. A bet amount is accepted only
//! from a reply to that exact prompt, which keeps concurrent chats and
//! stale prompts from cross-wiring. Abandoned flows leave their entry
//! behind until the process exits; no timeout is enforced.

use std::collections::HashMap;
use std::sync::Arc;
use teloxide::types::{ChatId, MessageId};
use tokio::sync::Mutex;

/// Map of (chat, prompt message) -> competition id awaiting a bet amount.
#[derive(Clone, Default)]
pub struct PendingBets {
    inner: Arc<Mutex<HashMap<(ChatId, MessageId), String>>>,
}

impl PendingBets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembers which competition a prompt message is asking about.
    pub async fn insert(&self, chat: ChatId, prompt: MessageId, competition_id: String) {
        self.inner.lock().await.insert((chat, prompt), competition_id);
    }

    /// Resolves and clears the state bound to a prompt. Returns `None`
    /// when the reply does not target a live prompt.
    pub async fn take(&self, chat: ChatId, prompt: MessageId) -> Option<String> {
        self.inner.lock().await.remove(&(chat, prompt))
    }
}
