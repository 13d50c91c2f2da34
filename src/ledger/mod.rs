//! Client for the external wallet/payments/competitions service.

pub mod client;
pub mod models;

// Re-exports for convenience
pub use client::{LedgerClient, LedgerError, WalletHandle};
pub use models::{Competition, CompetitionSpec, PaymentDestination};
