//! Persistent record store.
//!
//! Named collections of records serialized as JSON text into a synchronous
//! key-value [`KeyValueMedium`]. The store has no query capability: callers
//! read a whole collection, compute over it, and write the whole collection
//! back.
//!
//! # Media
//!
//! - [`FileMedium`] - one `<key>.json` file per key in a directory (durable)
//! - [`MemoryMedium`] - a process-local map (tests, last-resort fallback)
//!
//! # Atomicity
//!
//! Single-key writes replace the key's content wholesale. Multi-key updates
//! go through [`RecordStore::commit`], which snapshots every key in the
//! [`Batch`] first and restores the snapshots if any write fails.

mod file;
mod memory;

pub use file::FileMedium;
pub use memory::MemoryMedium;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur in the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the medium failed.
    #[error("I/O error on '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Stored text is not a valid collection.
    #[error("corrupt data under '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be serialized.
    #[error("failed to encode '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A lock guarding the medium was poisoned by a panicking thread.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Raw text key-value medium underneath the record store.
///
/// Implementations are synchronous; every call either completes or fails
/// before returning.
pub trait KeyValueMedium: Send + Sync + fmt::Debug {
    /// Get the text stored under `key`, or `None` if never written.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the text stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the medium cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the medium cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Typed access to named record collections.
#[derive(Debug, Clone)]
pub struct RecordStore {
    medium: Arc<dyn KeyValueMedium>,
}

impl RecordStore {
    /// Create a record store over `medium`.
    pub fn new(medium: impl KeyValueMedium + 'static) -> Self {
        Self {
            medium: Arc::new(medium),
        }
    }

    /// Create an in-memory record store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryMedium::default())
    }

    /// Read the collection under `key`; empty if never written.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupt` if the stored text is not a JSON array
    /// of `T`, or `StoreError::Io` if the medium fails.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        self.read_slot(key).map(Option::unwrap_or_default)
    }

    /// Replace the collection under `key` with `records`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if encoding or the medium fails.
    pub fn write<T: Serialize>(&self, key: &str, records: &[T]) -> Result<(), StoreError> {
        let text = encode(key, records)?;
        self.medium.set(key, &text)
    }

    /// Whether anything was ever written under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the medium fails.
    pub fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.medium.get(key)?.is_some())
    }

    /// Read a single record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupt` if the stored text is not a `T`.
    pub fn read_slot<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.medium.get(key)? {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|source| StoreError::Corrupt {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Store a single record under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if encoding or the medium fails.
    pub fn write_slot<T: Serialize>(&self, key: &str, record: &T) -> Result<(), StoreError> {
        let text = encode(key, record)?;
        self.medium.set(key, &text)
    }

    /// Remove whatever is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the medium fails.
    pub fn clear(&self, key: &str) -> Result<(), StoreError> {
        self.medium.remove(key)
    }

    /// Apply every write in `batch`, or none of them.
    ///
    /// Each key's previous content is captured before the first write. If a
    /// write fails, keys already written are restored to their snapshot and
    /// the original error is returned.
    ///
    /// # Errors
    ///
    /// Returns the `StoreError` of the write that failed.
    pub fn commit(&self, batch: Batch) -> Result<(), StoreError> {
        let snapshots = batch
            .writes
            .iter()
            .map(|(key, _)| self.medium.get(key))
            .collect::<Result<Vec<_>, _>>()?;

        for (index, (key, text)) in batch.writes.iter().enumerate() {
            if let Err(err) = self.medium.set(key, text) {
                tracing::warn!(key = %key, error = %err, "Batch write failed, rolling back");
                let written = batch.writes.iter().zip(&snapshots).take(index);
                for ((done_key, _), snapshot) in written {
                    self.restore(done_key, snapshot.as_deref());
                }
                return Err(err);
            }
        }

        Ok(())
    }

    /// Put `key` back to `snapshot`, logging (not returning) failures.
    fn restore(&self, key: &str, snapshot: Option<&str>) {
        let result = match snapshot {
            Some(text) => self.medium.set(key, text),
            None => self.medium.remove(key),
        };
        if let Err(err) = result {
            tracing::error!(key = %key, error = %err, "Rollback failed, collection may be inconsistent");
        }
    }
}

/// A set of collection writes applied together by [`RecordStore::commit`].
#[derive(Debug, Default)]
pub struct Batch {
    writes: Vec<(String, String)>,
}

impl Batch {
    /// Create an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a full replacement of the collection under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Encode` if `records` cannot be serialized.
    pub fn put<T: Serialize>(&mut self, key: &str, records: &[T]) -> Result<(), StoreError> {
        let text = encode(key, records)?;
        self.writes.push((key.to_string(), text));
        Ok(())
    }

    /// Number of queued writes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Whether no writes are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })
}
