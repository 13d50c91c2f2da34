//! HTTP client for the LNbits-style ledger service.
//!
//! Every wallet, competition and payment operation the bot offers ends up
//! here as a single request/response pair. Nothing is retried: a failure
//! of any kind is surfaced immediately and the user re-issues the command.

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use super::models::{Competition, CompetitionSpec, PaymentDestination, DEFAULT_MAX_BET, DEFAULT_MIN_BET};

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Rejected locally before any request was made.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The service could not be reached at the transport level.
    #[error("ledger unreachable: {0}")]
    Network(reqwest::Error),

    /// The service answered with a non-success status.
    #[error("ledger rejected the call with status {0}")]
    ServiceRejected(StatusCode),

    /// The service answered 2xx but the body was not what we expected.
    #[error("malformed ledger response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for LedgerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LedgerError::MalformedResponse(err.to_string())
        } else {
            LedgerError::Network(err)
        }
    }
}

/// Remote identifiers minted when a user completes wallet creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletHandle {
    pub user_id: String,
    pub wallet_id: String,
}

#[derive(Debug, Deserialize)]
struct CreatedId {
    id: String,
}

/// Thin typed wrapper over the ledger's REST API. Holds its own
/// `reqwest::Client` handle and is injected into the dispatcher at
/// construction, so tests can point it at a mock server.
#[derive(Debug, Clone)]
pub struct LedgerClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl LedgerClient {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http,
            base_url,
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<Response, LedgerError> {
        let resp = self
            .http
            .post(self.url(path))
            .header("X-Api-Key", &self.api_key)
            .json(body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LedgerError::ServiceRejected(status));
        }
        Ok(resp)
    }

    /// Creates a remote user, then a wallet for it. Both calls must
    /// succeed; if the wallet call fails the already-created remote user
    /// is left behind (the API offers no rollback) and the whole
    /// operation reports failure.
    pub async fn create_user_and_wallet(&self, username: &str) -> Result<WalletHandle, LedgerError> {
        let user: CreatedId = self
            .post_json("/users", &json!({ "user_name": username }))
            .await?
            .json()
            .await?;

        let wallet: CreatedId = self
            .post_json("/wallets", &json!({ "user_id": user.id }))
            .await?
            .json()
            .await?;

        Ok(WalletHandle {
            user_id: user.id,
            wallet_id: wallet.id,
        })
    }

    /// Creates an LNURL payment address for a user. Best-effort from the
    /// caller's point of view: failing here does not undo the wallet.
    pub async fn create_payment_address(&self, user_id: &str, username: &str) -> Result<String, LedgerError> {
        let created: CreatedId = self
            .post_json("/payment-address", &json!({ "user_id": user_id, "username": username }))
            .await?
            .json()
            .await?;
        Ok(created.id)
    }

    /// Lists open competitions. An empty list is success, not an error.
    pub async fn list_competitions(&self) -> Result<Vec<Competition>, LedgerError> {
        let resp = self
            .http
            .get(self.url("/competitions"))
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LedgerError::ServiceRejected(status));
        }
        Ok(resp.json().await?)
    }

    /// Creates a competition funded by `wallet_id`. The spec is validated
    /// locally first; a bad choices list never reaches the wire.
    pub async fn create_competition(&self, wallet_id: &str, spec: &CompetitionSpec) -> Result<(), LedgerError> {
        spec.validate().map_err(LedgerError::InvalidRequest)?;
        self.post_json(
            "/competitions",
            &json!({
                "wallet": wallet_id,
                "name": spec.name,
                "info": spec.info,
                "banner": spec.banner,
                "closing_datetime": spec.closing_datetime,
                "amount_tickets": spec.amount_tickets,
                "min_bet": DEFAULT_MIN_BET,
                "max_bet": DEFAULT_MAX_BET,
                "choices": spec.choices,
            }),
        )
        .await?;
        Ok(())
    }

    /// Records a bet against a competition on behalf of `bettor`.
    pub async fn place_bet(&self, competition_id: &str, bettor: &str, amount: u64) -> Result<(), LedgerError> {
        self.post_json(
            &format!("/tickets/{competition_id}"),
            &json!({
                "bettor": bettor,
                "details": format!("Bet amount: {amount}"),
            }),
        )
        .await?;
        Ok(())
    }

    /// Pays an invoice or a Lightning address out of `wallet_id`.
    ///
    /// An invoice carries its own amount, so `amount` is ignored for
    /// invoice destinations; address destinations require it and are
    /// rejected locally without one.
    pub async fn send_payment(
        &self,
        wallet_id: &str,
        destination: &PaymentDestination,
        amount: Option<u64>,
    ) -> Result<(), LedgerError> {
        let body = match destination {
            PaymentDestination::Invoice(bolt11) => json!({
                "out": true,
                "wallet_id": wallet_id,
                "payment_request": bolt11,
            }),
            PaymentDestination::Address { username, domain } => {
                let amount = amount.ok_or_else(|| {
                    LedgerError::InvalidRequest("an amount is required to pay a Lightning address".to_string())
                })?;
                json!({
                    "out": true,
                    "wallet_id": wallet_id,
                    "amount": amount,
                    "payment_request": format!("{}/lnurlp/api/v1/well-known/{username}@{domain}", self.base_url),
                })
            }
        };
        self.post_json("/payments", &body).await?;
        Ok(())
    }
}
