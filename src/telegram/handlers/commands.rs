//! Command handler implementations.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, Message};

use super::types::{is_private_chat, require_private, require_registered, sender_username, HandlerDeps, HandlerError};
use crate::core::{config, messages, BotError};
use crate::ledger::{CompetitionSpec, LedgerError, PaymentDestination};
use crate::storage::UserRecord;

/// Handle /start: in a private chat, make sure the sender has a wallet
/// (creating one on first contact), then list competitions either way.
pub async fn handle_start(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    if is_private_chat(msg) {
        let Some(username) = sender_username(msg) else {
            bot.send_message(msg.chat.id, messages::USERNAME_REQUIRED).await?;
            return Ok(());
        };
        match deps.records.get(username) {
            Ok(Some(_)) => {}
            Ok(None) => create_user_flow(bot, msg.chat.id, deps, username).await?,
            Err(err) => {
                log::error!("record lookup failed for {username}: {err}");
                bot.send_message(msg.chat.id, messages::REQUEST_FAILED).await?;
                return Ok(());
            }
        }
    }
    list_competitions(bot, msg.chat.id, deps).await
}

pub async fn handle_help(bot: &Bot, msg: &Message) -> Result<(), HandlerError> {
    bot.send_message(msg.chat.id, messages::HELP_MESSAGE).await?;
    Ok(())
}

/// Handle /create_user (DM only).
pub async fn handle_create_user(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    if let Err(err) = require_private(msg) {
        bot.send_message(msg.chat.id, err.notice()).await?;
        return Ok(());
    }
    let Some(username) = sender_username(msg) else {
        bot.send_message(msg.chat.id, messages::USERNAME_REQUIRED).await?;
        return Ok(());
    };
    match deps.records.get(username) {
        Ok(Some(_)) => {
            // Records are write-once; a second /create_user must not mint
            // another remote user.
            bot.send_message(msg.chat.id, messages::ALREADY_REGISTERED).await?;
            Ok(())
        }
        Ok(None) => create_user_flow(bot, msg.chat.id, deps, username).await,
        Err(err) => {
            log::error!("record lookup failed for {username}: {err}");
            bot.send_message(msg.chat.id, messages::REQUEST_FAILED).await?;
            Ok(())
        }
    }
}

/// Creates the remote user and wallet, persists the record, then tries to
/// attach a Lightning address.
///
/// Persisting comes before the success reply: a record that failed to
/// write means the wallet is unreachable next turn, so the user must see
/// a failure, not a success. The address step is best-effort and reported
/// separately either way.
async fn create_user_flow(bot: &Bot, chat_id: ChatId, deps: &HandlerDeps, username: &str) -> Result<(), HandlerError> {
    log::info!("creating ledger user and wallet for {username}");
    let handle = match deps.ledger.create_user_and_wallet(username).await {
        Ok(handle) => handle,
        Err(err) => {
            log::error!("user/wallet creation failed for {username}: {err}");
            bot.send_message(chat_id, messages::USER_CREATION_FAILED).await?;
            return Ok(());
        }
    };

    let record = UserRecord {
        user_id: handle.user_id.clone(),
        wallet_id: handle.wallet_id.clone(),
    };
    if let Err(err) = deps.records.put(username, &record) {
        log::error!("failed to persist record for {username}: {err}");
        bot.send_message(chat_id, messages::USER_CREATION_FAILED).await?;
        return Ok(());
    }

    bot.send_message(chat_id, messages::wallet_created(&handle.user_id, &handle.wallet_id))
        .await?;

    match deps.ledger.create_payment_address(&handle.user_id, username).await {
        Ok(address_id) => {
            bot.send_message(chat_id, messages::payment_address_created(&address_id))
                .await?;
        }
        Err(err) => {
            log::error!("payment address creation failed for {username}: {err}");
            bot.send_message(chat_id, messages::PAYMENT_ADDRESS_FAILED).await?;
        }
    }
    Ok(())
}

/// Handle /create_competition <name> <info> <banner> <c1,c2,...> <closing> <tickets>.
pub async fn handle_create_competition(
    bot: &Bot,
    msg: &Message,
    deps: &HandlerDeps,
    raw_args: &str,
) -> Result<(), HandlerError> {
    let spec = match parse_competition_args(raw_args) {
        Ok(spec) => spec,
        Err(err) => {
            bot.send_message(msg.chat.id, err.notice()).await?;
            return Ok(());
        }
    };

    let Some(username) = sender_username(msg) else {
        bot.send_message(msg.chat.id, messages::USERNAME_REQUIRED).await?;
        return Ok(());
    };
    let record = match require_registered(deps, username) {
        Ok(record) => record,
        Err(err) => {
            bot.send_message(msg.chat.id, err.notice()).await?;
            return Ok(());
        }
    };

    match deps.ledger.create_competition(&record.wallet_id, &spec).await {
        Ok(()) => {
            bot.send_message(msg.chat.id, messages::COMPETITION_CREATED_SUCCESS).await?;
        }
        Err(LedgerError::InvalidRequest(reason)) => {
            bot.send_message(msg.chat.id, reason).await?;
        }
        Err(err) => {
            log::error!("competition creation failed for {username}: {err}");
            bot.send_message(msg.chat.id, messages::COMPETITION_CREATION_FAILED).await?;
        }
    }
    Ok(())
}

/// Handle /list_competitions (also runs after /start).
pub async fn handle_list_competitions(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    list_competitions(bot, msg.chat.id, deps).await
}

async fn list_competitions(bot: &Bot, chat_id: ChatId, deps: &HandlerDeps) -> Result<(), HandlerError> {
    match deps.ledger.list_competitions().await {
        Ok(competitions) if competitions.is_empty() => {
            bot.send_message(chat_id, messages::NO_COMPETITIONS).await?;
        }
        Ok(competitions) => {
            let keyboard: Vec<Vec<InlineKeyboardButton>> = competitions
                .iter()
                .map(|c| vec![InlineKeyboardButton::callback(c.name.clone(), format!("comp:{}", c.id))])
                .collect();
            bot.send_message(chat_id, messages::COMPETITIONS_HEADER)
                .reply_markup(InlineKeyboardMarkup::new(keyboard))
                .await?;
        }
        Err(err) => {
            log::error!("listing competitions failed: {err}");
            bot.send_message(chat_id, messages::COMPETITIONS_LIST_FAILED).await?;
        }
    }
    Ok(())
}

/// Handle /send <amount> <user@domain>.
pub async fn handle_send(bot: &Bot, msg: &Message, deps: &HandlerDeps, raw_args: &str) -> Result<(), HandlerError> {
    if deps.send_dm_only {
        if let Err(err) = require_private(msg) {
            bot.send_message(msg.chat.id, err.notice()).await?;
            return Ok(());
        }
    }

    let (amount, recipient, domain) = match parse_send_args(raw_args) {
        Ok(parsed) => parsed,
        Err(err) => {
            bot.send_message(msg.chat.id, err.notice()).await?;
            return Ok(());
        }
    };

    let Some(username) = sender_username(msg) else {
        bot.send_message(msg.chat.id, messages::USERNAME_REQUIRED).await?;
        return Ok(());
    };
    let sender = match require_registered(deps, username) {
        Ok(record) => record,
        Err(err) => {
            bot.send_message(msg.chat.id, err.notice()).await?;
            return Ok(());
        }
    };

    // The recipient must be known locally before the ledger is touched.
    match deps.records.get(recipient) {
        Ok(Some(_)) => {}
        Ok(None) => {
            bot.send_message(msg.chat.id, messages::RECIPIENT_NOT_FOUND).await?;
            return Ok(());
        }
        Err(err) => {
            log::error!("record lookup failed for recipient {recipient}: {err}");
            bot.send_message(msg.chat.id, messages::SEND_SATS_FAILED).await?;
            return Ok(());
        }
    }

    let destination = PaymentDestination::Address {
        username: recipient.to_string(),
        domain: domain.to_string(),
    };
    match deps.ledger.send_payment(&sender.wallet_id, &destination, Some(amount)).await {
        Ok(()) => {
            bot.send_message(msg.chat.id, messages::SEND_SATS_SUCCESS).await?;
        }
        Err(err) => {
            log::error!("payment from {username} to {recipient}@{domain} failed: {err}");
            bot.send_message(msg.chat.id, messages::SEND_SATS_FAILED).await?;
        }
    }
    Ok(())
}

/// Handle /link (DM only): point a registered user at their wallet page.
pub async fn handle_link(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    if let Err(err) = require_private(msg) {
        bot.send_message(msg.chat.id, err.notice()).await?;
        return Ok(());
    }
    let Some(username) = sender_username(msg) else {
        bot.send_message(msg.chat.id, messages::USERNAME_REQUIRED).await?;
        return Ok(());
    };
    match require_registered(deps, username) {
        Ok(_) => {
            bot.send_message(msg.chat.id, messages::link_wallet(&config::LNBITS_PUBLIC_URL))
                .await?;
        }
        Err(err) => {
            bot.send_message(msg.chat.id, err.notice()).await?;
        }
    }
    Ok(())
}

/// Parses the /send argument tail into (amount, recipient, domain).
fn parse_send_args(raw: &str) -> Result<(u64, &str, &str), BotError> {
    let usage = || BotError::Validation(messages::SEND_SATS_USAGE.to_string());

    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if tokens.len() < 2 {
        return Err(usage());
    }
    let amount: u64 = tokens[0].parse().map_err(|_| usage())?;
    let (recipient, domain) = tokens[1].split_once('@').ok_or_else(usage)?;
    Ok((amount, recipient, domain))
}

/// Parses the /create_competition argument tail into a spec.
///
/// Tokens are whitespace-separated, but a double-quoted group counts as
/// one token so names and info lines can contain spaces.
fn parse_competition_args(raw: &str) -> Result<CompetitionSpec, BotError> {
    let usage = || BotError::Validation(messages::USAGE_CREATE_COMPETITION.to_string());

    let tokens = split_args(raw);
    if tokens.len() < 6 {
        return Err(usage());
    }
    let amount_tickets: u64 = tokens[5].parse().map_err(|_| usage())?;

    Ok(CompetitionSpec {
        name: tokens[0].clone(),
        info: tokens[1].clone(),
        banner: tokens[2].clone(),
        choices: tokens[3].split(',').map(str::to_string).collect(),
        closing_datetime: tokens[4].clone(),
        amount_tickets,
    })
}

/// Splits an argument tail on whitespace, honoring double-quoted groups.
fn split_args(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in raw.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
