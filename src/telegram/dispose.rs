//! Delayed cleanup of inbound command messages.

use teloxide::prelude::*;
use teloxide::types::MessageId;

use crate::core::config;

/// Schedules the triggering command message for deletion after the fixed
/// delay. Fire-and-forget: the task handle is dropped, delete failures
/// are ignored, and a restart before the delay elapses simply abandons
/// the deletion. Cosmetic feature only.
pub fn schedule_delete(bot: Bot, chat_id: ChatId, message_id: MessageId) {
    tokio::spawn(async move {
        tokio::time::sleep(config::dispose::delay()).await;
        if let Err(err) = bot.delete_message(chat_id, message_id).await {
            log::debug!("could not delete message {} in chat {}: {}", message_id.0, chat_id, err);
        }
    });
}
