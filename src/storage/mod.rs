//! Local persistence: the user record store.

pub mod records;

// Re-exports for convenience
pub use records::{RecordStore, StorageError, UserRecord};
