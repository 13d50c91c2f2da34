//! Environment-driven configuration, read once at startup.

use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Base URL of the ledger (LNbits) instance
/// Read from LNBITS_URL environment variable
pub static LNBITS_URL: Lazy<String> =
    Lazy::new(|| env::var("LNBITS_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string()));

/// Admin API key for the ledger instance
/// Read from LNBITS_API_KEY environment variable
pub static LNBITS_API_KEY: Lazy<String> = Lazy::new(|| env::var("LNBITS_API_KEY").unwrap_or_else(|_| String::new()));

/// Public wallet URL handed out by /link
/// Read from LNBITS_PUBLIC_URL environment variable, falls back to LNBITS_URL
pub static LNBITS_PUBLIC_URL: Lazy<String> =
    Lazy::new(|| env::var("LNBITS_PUBLIC_URL").unwrap_or_else(|_| LNBITS_URL.clone()));

/// Directory holding the per-user wallet records
/// Read from DATA_DIR environment variable
/// Default: data
pub static DATA_DIR: Lazy<String> = Lazy::new(|| env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: satsbet.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "satsbet.log".to_string()));

/// Whether /send is restricted to private chats.
/// Deployments disagree on this one, so it stays a switch instead of a
/// hardcoded choice. Read from SEND_DM_ONLY environment variable.
/// Default: false
pub static SEND_DM_ONLY: Lazy<bool> = Lazy::new(|| {
    env::var("SEND_DM_ONLY")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false)
});

/// Command message disposal configuration
pub mod dispose {
    use super::Duration;

    /// Delay before an inbound command message is deleted (in seconds)
    pub const DELAY_SECS: u64 = 10;

    /// Disposal delay duration
    pub fn delay() -> Duration {
        Duration::from_secs(DELAY_SECS)
    }
}
