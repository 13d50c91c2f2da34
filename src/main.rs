use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::prelude::*;

use satsbet::core::{config, init_logger};
use satsbet::ledger::LedgerClient;
use satsbet::storage::RecordStore;
use satsbet::telegram::bot::{create_bot, setup_bot_commands};
use satsbet::telegram::pending::PendingBets;
use satsbet::telegram::qr::RqrrDecoder;
use satsbet::telegram::{schema, HandlerDeps};

/// Main entry point for the Telegram bot.
///
/// # Errors
/// Returns an error if initialization fails (logging, bot creation, or
/// the first Bot API round trip).
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present
    let _ = dotenv();

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    log::info!("starting satsbet...");
    let bot = create_bot()?;

    let me = bot.get_me().await?;
    log::info!("authorized as @{}", me.username.as_deref().unwrap_or("<unnamed>"));

    if let Err(err) = setup_bot_commands(&bot).await {
        log::warn!("failed to publish bot commands: {err}");
    }

    // One HTTP client handle shared by the ledger client and the photo
    // downloader; no explicit timeout beyond reqwest's defaults.
    let http = reqwest::Client::new();
    let ledger = Arc::new(LedgerClient::new(
        http.clone(),
        config::LNBITS_URL.clone(),
        config::LNBITS_API_KEY.clone(),
    ));
    let records = Arc::new(RecordStore::new(config::DATA_DIR.as_str()));
    log::info!(
        "ledger at {}, records under {}",
        *config::LNBITS_URL,
        records.dir().display()
    );

    let deps = HandlerDeps::new(
        ledger,
        records,
        PendingBets::new(),
        Arc::new(RqrrDecoder),
        http,
        *config::SEND_DM_ONLY,
    );

    Dispatcher::builder(bot, schema(deps))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    // Pending message disposals are abandoned on the way out.
    log::info!("dispatcher stopped");
    Ok(())
}
