//! User-visible replies. Every failure a handler reports goes through one
//! of these, so nothing from the ledger or the transport leaks into chat.

pub const HELP_MESSAGE: &str = "I can:\n\
    /start — create your wallet (in a DM) and list competitions\n\
    /create_user — create a Lightning user and wallet (DM only)\n\
    /create_competition <name> <info> <banner> <choice1,choice2,...> <closing_datetime> <amount_tickets>\n\
    /list_competitions — list open competitions\n\
    /register_bet <competition_id> <amount> — bet on a competition directly (DM only)\n\
    /send <amount> <user@domain> — send sats to another user\n\
    /link — get a link to your wallet page (DM only)\n\
    \nYou can also paste a Lightning invoice (lnbc...) or send a QR code \
    photo in a DM and I will pay it from your wallet.";

pub const DM_ONLY_COMMAND: &str = "This only works in a direct message with me.";

pub const USERNAME_REQUIRED: &str = "You need a Telegram username before I can set up a wallet for you.";

pub const USER_NOT_FOUND: &str = "You don't have a wallet yet. Send /create_user in a DM with me first.";

pub const ALREADY_REGISTERED: &str = "You already have a wallet. Send /link to open it.";

pub const RECIPIENT_NOT_FOUND: &str = "Recipient not found.";

pub const REQUEST_FAILED: &str = "Something went wrong, please try again.";

pub const USER_CREATION_FAILED: &str = "I couldn't create your wallet, please try again later.";

pub const PAYMENT_ADDRESS_FAILED: &str = "Your wallet is ready, but I couldn't create a Lightning address for it.";

pub const USAGE_CREATE_COMPETITION: &str =
    "Usage: /create_competition <name> <info> <banner> <choice1,choice2,...> <closing_datetime> <amount_tickets>";

pub const CHOICES_LIMIT_ERROR: &str = "A competition needs between 2 and 10 comma-separated choices.";

pub const COMPETITION_CREATED_SUCCESS: &str = "Competition created!";

pub const COMPETITION_CREATION_FAILED: &str = "I couldn't create the competition, please try again later.";

pub const COMPETITIONS_HEADER: &str = "Competitions:";

pub const NO_COMPETITIONS: &str = "There are no open competitions right now.";

pub const COMPETITIONS_LIST_FAILED: &str = "I couldn't fetch the competitions, please try again later.";

pub const USAGE_REGISTER_BET: &str = "Usage: /register_bet <competition_id> <amount>";

pub const ENTER_BET_AMOUNT: &str = "How many sats do you want to bet? Reply to this message with the amount.";

pub const INVALID_BET_AMOUNT: &str = "That doesn't look like an amount in sats. Reply with a whole number.";

pub const BET_REGISTERED_SUCCESS: &str = "Your bet is in. Good luck!";

pub const BET_REGISTRATION_FAILED: &str = "I couldn't register your bet, please try again later.";

pub const SEND_SATS_USAGE: &str = "Usage: /send <amount> <user@domain>";

pub const SEND_SATS_SUCCESS: &str = "Sats sent!";

pub const SEND_SATS_FAILED: &str = "I couldn't send the payment, please try again later.";

pub const PAY_INVOICE_SUCCESS: &str = "Invoice paid!";

pub const PAY_INVOICE_FAILED: &str = "I couldn't pay that invoice, please try again later.";

pub const INVALID_INVOICE: &str = "That doesn't look like a Lightning invoice I can pay.";

/// Reply for a freshly created user and wallet.
pub fn wallet_created(user_id: &str, wallet_id: &str) -> String {
    format!("Your wallet is ready!\nUser id: {user_id}\nWallet id: {wallet_id}")
}

/// Reply for a freshly created Lightning address.
pub fn payment_address_created(address_id: &str) -> String {
    format!("Lightning address created (link id: {address_id}). Others can now pay you directly.")
}

/// Reply for /link, pointing at the public wallet page.
pub fn link_wallet(public_url: &str) -> String {
    format!("Your wallet lives here: {public_url}")
}
