//! Wire types for the ledger service.

use serde::Deserialize;

use crate::core::messages;

/// Bounds on the number of choices a competition may offer.
pub const MIN_CHOICES: usize = 2;
pub const MAX_CHOICES: usize = 10;

/// Bet limits sent with every new competition. The bot does not expose
/// these as arguments; the betting extension enforces them server-side.
pub const DEFAULT_MIN_BET: u64 = 1;
pub const DEFAULT_MAX_BET: u64 = 100_000;

/// A competition as served by the ledger's betting extension. The bot
/// keeps no local copy; it renders the list and carries `id` through
/// callback payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct Competition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub banner: String,
    #[serde(default)]
    pub closing_datetime: String,
    #[serde(default)]
    pub amount_tickets: u64,
    #[serde(default)]
    pub min_bet: u64,
    #[serde(default)]
    pub max_bet: u64,
    #[serde(default)]
    pub choices: Vec<String>,
}

/// Parameters for a new competition, as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitionSpec {
    pub name: String,
    pub info: String,
    pub banner: String,
    pub choices: Vec<String>,
    pub closing_datetime: String,
    pub amount_tickets: u64,
}

impl CompetitionSpec {
    /// Local shape check. Runs before any request is built, so a bad spec
    /// costs no network round trip.
    pub fn validate(&self) -> Result<(), String> {
        if self.choices.len() < MIN_CHOICES || self.choices.len() > MAX_CHOICES {
            return Err(messages::CHOICES_LIMIT_ERROR.to_string());
        }
        Ok(())
    }
}

/// Where a payment goes: a raw bolt11 invoice, which encodes its own
/// amount, or a `user@domain` Lightning address, which needs one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentDestination {
    Invoice(String),
    Address { username: String, domain: String },
}
