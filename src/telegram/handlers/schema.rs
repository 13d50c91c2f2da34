//! Dispatcher schema and handler chain builders.

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::{bets, commands, payments};
use super::types::{HandlerDeps, HandlerError};
use crate::telegram::bot::Command;
use crate::telegram::dispose;

/// Creates the main dispatcher schema for the bot.
///
/// Returns a handler tree for teloxide's Dispatcher. The same schema is
/// used in production and in integration tests.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_callback = deps.clone();
    let deps_photo = deps.clone();
    let deps_text = deps;

    dptree::entry()
        // Slash commands
        .branch(command_handler(deps_commands))
        // Competition selection buttons
        .branch(callback_handler(deps_callback))
        // QR-code photos
        .branch(photo_handler(deps_photo))
        // Free text: pasted invoices and bet-amount replies
        .branch(text_handler(deps_text))
}

fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("received command {:?} from chat {}", cmd, msg.chat.id);

                // Commands (and only commands) are tidied away after a
                // fixed delay.
                dispose::schedule_delete(bot.clone(), msg.chat.id, msg.id);

                match cmd {
                    Command::Start => commands::handle_start(&bot, &msg, &deps).await?,
                    Command::Help => commands::handle_help(&bot, &msg).await?,
                    Command::CreateUser => commands::handle_create_user(&bot, &msg, &deps).await?,
                    Command::CreateCompetition(args) => {
                        commands::handle_create_competition(&bot, &msg, &deps, &args).await?
                    }
                    Command::ListCompetitions => commands::handle_list_competitions(&bot, &msg, &deps).await?,
                    Command::RegisterBet(args) => bets::handle_register_bet(&bot, &msg, &deps, &args).await?,
                    Command::Send(args) => commands::handle_send(&bot, &msg, &deps, &args).await?,
                    Command::Link => commands::handle_link(&bot, &msg, &deps).await?,
                }
                Ok(())
            }
        },
    ))
}

fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move {
            if let Err(err) = bets::handle_competition_selected(&bot, &q, &deps).await {
                log::error!("competition selection failed: {err}");
            }
            Ok(())
        }
    })
}

fn photo_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.photo().is_some())
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                if let Err(err) = payments::handle_photo(&bot, &msg, &deps).await {
                    log::error!("photo handler failed in chat {}: {err}", msg.chat.id);
                }
                Ok(())
            }
        })
}

fn text_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().is_some())
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                if let Err(err) = payments::handle_free_text(&bot, &msg, &deps).await {
                    log::error!("text handler failed in chat {}: {err}", msg.chat.id);
                }
                Ok(())
            }
        })
}
