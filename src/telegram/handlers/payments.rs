//! Invoice payments: pasted bolt11 text and QR-code photos.

use teloxide::prelude::*;
use teloxide::types::{Message, PhotoSize};

use super::bets;
use super::types::{require_private, require_registered, sender_username, HandlerDeps, HandlerError};
use crate::core::messages;
use crate::ledger::PaymentDestination;
use crate::telegram::classify::{classify, TextIntent};

/// Routes a free-text message: an invoice gets paid, anything else may be
/// a bet-amount reply.
pub async fn handle_free_text(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    match classify(text) {
        TextIntent::Invoice => handle_invoice_text(bot, msg, deps, text).await,
        TextIntent::Other => bets::handle_bet_amount(bot, msg, deps, text).await,
    }
}

async fn handle_invoice_text(bot: &Bot, msg: &Message, deps: &HandlerDeps, invoice: &str) -> Result<(), HandlerError> {
    if let Err(err) = require_private(msg) {
        bot.send_message(msg.chat.id, err.notice()).await?;
        return Ok(());
    }
    let Some(username) = sender_username(msg) else {
        bot.send_message(msg.chat.id, messages::USERNAME_REQUIRED).await?;
        return Ok(());
    };
    pay_invoice(bot, msg.chat.id, deps, username, invoice).await
}

/// Pays a bolt11 invoice out of the sender's wallet. The invoice carries
/// its own amount, so none is sent.
async fn pay_invoice(
    bot: &Bot,
    chat_id: ChatId,
    deps: &HandlerDeps,
    username: &str,
    invoice: &str,
) -> Result<(), HandlerError> {
    let record = match require_registered(deps, username) {
        Ok(record) => record,
        Err(err) => {
            bot.send_message(chat_id, err.notice()).await?;
            return Ok(());
        }
    };

    let destination = PaymentDestination::Invoice(invoice.to_string());
    match deps.ledger.send_payment(&record.wallet_id, &destination, None).await {
        Ok(()) => {
            bot.send_message(chat_id, messages::PAY_INVOICE_SUCCESS).await?;
        }
        Err(err) => {
            log::error!("invoice payment by {username} failed: {err}");
            bot.send_message(chat_id, messages::PAY_INVOICE_FAILED).await?;
        }
    }
    Ok(())
}

/// Handles a photo message (DM only): download the largest rendition,
/// decode the QR code and pay the invoice it contains. The scope check
/// comes first, before any file download is attempted.
pub async fn handle_photo(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    if let Err(err) = require_private(msg) {
        bot.send_message(msg.chat.id, err.notice()).await?;
        return Ok(());
    }
    let Some(username) = sender_username(msg) else {
        bot.send_message(msg.chat.id, messages::USERNAME_REQUIRED).await?;
        return Ok(());
    };
    // Telegram sends renditions smallest-first; the last decodes best.
    let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) else {
        return Ok(());
    };

    let bytes = match download_photo(bot, deps, photo).await {
        Ok(bytes) => bytes,
        Err(err) => {
            log::error!("photo download failed in chat {}: {err}", msg.chat.id);
            bot.send_message(msg.chat.id, messages::INVALID_INVOICE).await?;
            return Ok(());
        }
    };

    match deps.qr_decoder.decode(&bytes) {
        Some(content) if classify(&content) == TextIntent::Invoice => {
            pay_invoice(bot, msg.chat.id, deps, username, &content).await
        }
        _ => {
            bot.send_message(msg.chat.id, messages::INVALID_INVOICE).await?;
            Ok(())
        }
    }
}

/// Resolves a photo's file id and fetches the bytes through the Bot API
/// file URL.
async fn download_photo(bot: &Bot, deps: &HandlerDeps, photo: &PhotoSize) -> Result<Vec<u8>, HandlerError> {
    let file = bot.get_file(photo.file.id.clone()).await?;
    let url = format!("https://api.telegram.org/file/bot{}/{}", bot.token(), file.path);
    let resp = deps.http.get(&url).send().await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}
