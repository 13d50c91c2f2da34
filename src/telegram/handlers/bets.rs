//! The bet flow: competition selection plus an amount reply, and the
//! direct /register_bet command.

use teloxide::prelude::*;
use teloxide::types::{ForceReply, Message};

use super::types::{require_private, require_registered, sender_username, HandlerDeps, HandlerError};
use crate::core::messages;

/// Handles a tap on a competition button. Sends the amount prompt and
/// binds the competition id to that prompt's message identity, so only a
/// direct reply to it can complete the flow.
pub async fn handle_competition_selected(
    bot: &Bot,
    q: &CallbackQuery,
    deps: &HandlerDeps,
) -> Result<(), HandlerError> {
    // Answer first so the client stops the button spinner.
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(competition_id) = q.data.as_deref().and_then(|data| data.strip_prefix("comp:")) else {
        return Ok(());
    };
    let Some(chat_id) = q.message.as_ref().map(|m| m.chat().id) else {
        return Ok(());
    };

    let prompt = bot
        .send_message(chat_id, messages::ENTER_BET_AMOUNT)
        .reply_markup(ForceReply::new())
        .await?;
    deps.pending_bets
        .insert(chat_id, prompt.id, competition_id.to_string())
        .await;

    log::info!("chat {chat_id} selecting competition {competition_id}, awaiting amount");
    Ok(())
}

/// Handles a free-text message that may be a bet amount. Accepts it only
/// when the message replies to a live prompt; anything else is ignored so
/// ordinary chatter never reaches the ledger.
///
/// Every failure short of the ledger call re-arms the prompt, so the user
/// can reply again instead of re-tapping the competition button.
pub async fn handle_bet_amount(bot: &Bot, msg: &Message, deps: &HandlerDeps, text: &str) -> Result<(), HandlerError> {
    let Some(reply_to) = msg.reply_to_message() else {
        return Ok(());
    };
    let Some(competition_id) = deps.pending_bets.take(msg.chat.id, reply_to.id).await else {
        return Ok(());
    };
    let rearm = || deps.pending_bets.insert(msg.chat.id, reply_to.id, competition_id.clone());

    if let Err(err) = require_private(msg) {
        rearm().await;
        bot.send_message(msg.chat.id, err.notice()).await?;
        return Ok(());
    }

    let amount: u64 = match text.trim().parse() {
        Ok(amount) => amount,
        Err(_) => {
            rearm().await;
            bot.send_message(msg.chat.id, messages::INVALID_BET_AMOUNT).await?;
            return Ok(());
        }
    };

    let Some(username) = sender_username(msg) else {
        rearm().await;
        bot.send_message(msg.chat.id, messages::USERNAME_REQUIRED).await?;
        return Ok(());
    };
    if let Err(err) = require_registered(deps, username) {
        rearm().await;
        bot.send_message(msg.chat.id, err.notice()).await?;
        return Ok(());
    }

    place_bet(bot, msg.chat.id, deps, &competition_id, username, amount).await
}

/// Handle /register_bet <competition_id> <amount> (DM only): places a bet
/// directly, skipping the button prompt.
pub async fn handle_register_bet(bot: &Bot, msg: &Message, deps: &HandlerDeps, raw_args: &str) -> Result<(), HandlerError> {
    if let Err(err) = require_private(msg) {
        bot.send_message(msg.chat.id, err.notice()).await?;
        return Ok(());
    }

    let tokens: Vec<&str> = raw_args.split_whitespace().collect();
    let amount = match tokens.get(1).and_then(|t| t.parse::<u64>().ok()) {
        Some(amount) if tokens.len() == 2 => amount,
        _ => {
            bot.send_message(msg.chat.id, messages::USAGE_REGISTER_BET).await?;
            return Ok(());
        }
    };
    let competition_id = tokens[0];

    let Some(username) = sender_username(msg) else {
        bot.send_message(msg.chat.id, messages::USERNAME_REQUIRED).await?;
        return Ok(());
    };
    if let Err(err) = require_registered(deps, username) {
        bot.send_message(msg.chat.id, err.notice()).await?;
        return Ok(());
    }

    place_bet(bot, msg.chat.id, deps, competition_id, username, amount).await
}

async fn place_bet(
    bot: &Bot,
    chat_id: ChatId,
    deps: &HandlerDeps,
    competition_id: &str,
    username: &str,
    amount: u64,
) -> Result<(), HandlerError> {
    match deps.ledger.place_bet(competition_id, username, amount).await {
        Ok(()) => {
            bot.send_message(chat_id, messages::BET_REGISTERED_SUCCESS).await?;
        }
        Err(err) => {
            log::error!("bet by {username} on {competition_id} failed: {err}");
            bot.send_message(chat_id, messages::BET_REGISTRATION_FAILED).await?;
        }
    }
    Ok(())
}
