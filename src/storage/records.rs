//! On-disk cache of Telegram username -> remote ledger identifiers.
//!
//! One JSON file per known username under the data directory; file absence
//! is the canonical "unregistered" signal. The file-per-user layout means
//! concurrent handlers for different users never contend, and same-user
//! concurrent writes are last-writer-wins.
//!
//! Keys are the raw Telegram username and matching is case-sensitive, even
//! though Telegram treats handles as case-insensitive. Known limitation,
//! kept as-is rather than silently normalized.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("record store io failure: {0}")]
    Io(#[from] io::Error),

    #[error("record file for {username} is not valid JSON: {source}")]
    Corrupt {
        username: String,
        source: serde_json::Error,
    },

    #[error("failed to encode record: {0}")]
    Encode(serde_json::Error),
}

/// Identifiers the ledger service assigned to a user. Written once when
/// wallet creation completes, never mutated or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    pub wallet_id: String,
}

/// File-per-user record store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, username: &str) -> PathBuf {
        self.dir.join(format!("{username}.json"))
    }

    /// Looks up a user's record. A missing file is `Ok(None)`, never an
    /// error; an unreadable or undecodable file is a [`StorageError`].
    pub fn get(&self, username: &str) -> Result<Option<UserRecord>, StorageError> {
        match std::fs::read(self.record_path(username)) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|source| StorageError::Corrupt {
                    username: username.to_string(),
                    source,
                }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Writes (or idempotently overwrites) a user's record, creating the
    /// data directory on demand. Callers must not report wallet creation
    /// as successful when this fails.
    pub fn put(&self, username: &str, record: &UserRecord) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        let body = serde_json::to_vec(record).map_err(StorageError::Encode)?;
        std::fs::write(self.record_path(username), body)?;
        Ok(())
    }
}
