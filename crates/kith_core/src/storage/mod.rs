//! Key-value storage port and its implementations.
//!
//! # Responsibility
//! - Define the slot-oriented contract repositories persist through.
//! - Provide an in-memory store and a SQLite-backed store.
//!
//! # Invariants
//! - `set_item` replaces the whole value of a slot; there is no append.
//! - Quota checks account for every key and value byte after the write and
//!   reject the write without changing stored data.
//! - Stores do no locking; one writer per slot at a time is assumed.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug)]
pub enum StorageError {
    /// Write rejected because the store would exceed its byte quota.
    QuotaExceeded {
        key: String,
        required_bytes: usize,
        quota_bytes: usize,
    },
    /// Backend failure from the SQLite store.
    Db(DbError),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded {
                key,
                required_bytes,
                quota_bytes,
            } => write!(
                f,
                "storage quota exceeded writing `{key}`: {required_bytes} bytes required, quota is {quota_bytes}"
            ),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::QuotaExceeded { .. } => None,
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String slot store consumed by repositories.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    /// # Errors
    /// - `QuotaExceeded` when the write would push usage past the quota.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    /// No-op for unknown keys.
    fn remove_item(&self, key: &str) -> StorageResult<()>;
    fn clear(&self) -> StorageResult<()>;
    /// All keys in ascending order.
    fn keys(&self) -> StorageResult<Vec<String>>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        (**self).remove_item(key)
    }

    fn clear(&self) -> StorageResult<()> {
        (**self).clear()
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        (**self).keys()
    }
}

/// Returns the quota error when `required_bytes` exceeds `quota_bytes`.
pub(crate) fn check_quota(
    key: &str,
    required_bytes: usize,
    quota_bytes: Option<usize>,
) -> StorageResult<()> {
    match quota_bytes {
        Some(quota_bytes) if required_bytes > quota_bytes => {
            log::warn!(
                "event=storage_write module=storage status=error error_code=quota_exceeded key={} required_bytes={} quota_bytes={}",
                key,
                required_bytes,
                quota_bytes
            );
            Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                required_bytes,
                quota_bytes,
            })
        }
        _ => Ok(()),
    }
}
