//! Bot instance creation and the command surface.

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::core::config;

/// Commands understood by the bot.
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "snake_case", description = "I can:")]
pub enum Command {
    #[command(description = "create your wallet (in a DM) and list competitions")]
    Start,
    #[command(description = "show help")]
    Help,
    #[command(description = "create a Lightning user and wallet (DM only)")]
    CreateUser,
    #[command(description = "create a competition")]
    CreateCompetition(String),
    #[command(description = "list open competitions")]
    ListCompetitions,
    #[command(description = "bet on a competition directly (DM only)")]
    RegisterBet(String),
    #[command(description = "send sats to another user")]
    Send(String),
    #[command(description = "link to your wallet page (DM only)")]
    Link,
}

/// Creates a Bot instance from the configured token.
///
/// No explicit request timeout is set; the transport client's defaults
/// apply.
pub fn create_bot() -> anyhow::Result<Bot> {
    let token = config::BOT_TOKEN.clone();
    if token.is_empty() {
        return Err(anyhow::anyhow!("BOT_TOKEN (or TELOXIDE_TOKEN) is not set"));
    }
    Ok(Bot::new(token))
}

/// Publishes the command list to the Telegram UI.
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}
