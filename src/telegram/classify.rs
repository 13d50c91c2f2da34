//! Free-text classification, kept separate from dispatch so it can be
//! unit-tested without a live chat session.

use once_cell::sync::Lazy;
use regex::Regex;

/// Cached regex for sniffing bolt11 payment requests.
/// Compiled once at startup and reused for every text message.
static INVOICE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)lnbc[0-9a-z]+$").expect("Failed to compile invoice regex"));

/// What a free-text message turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextIntent {
    /// A bolt11 payment request pasted straight into the chat.
    Invoice,
    /// Anything else. May still be a bet-amount reply; the dispatcher
    /// decides that by looking at what the message replies to.
    Other,
}

/// Classifies a text message. The whole message must be the invoice; an
/// invoice embedded in other text is not treated as a payment request.
pub fn classify(text: &str) -> TextIntent {
    if INVOICE_REGEX.is_match(text) {
        TextIntent::Invoice
    } else {
        TextIntent::Other
    }
}
