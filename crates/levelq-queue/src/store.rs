//! Ordered key-value stores backing a queue.

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::error::StoreError;

/// Ordered key-value store.
///
/// Keys compare byte-wise. Every single-key operation is atomic. Once
/// [`close`](KvStore::close) succeeds, all other operations return
/// [`StoreError::Closed`].
pub trait KvStore: Send + Sync {
    /// Store a value, replacing any previous one.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Fetch a value. Absence is [`StoreError::NotFound`].
    fn get(&self, key: &[u8]) -> Result<Vec<u8>, StoreError>;

    /// Remove a key. Removing a missing key is not an error.
    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError>;

    /// Smallest key in the store.
    fn first_key(&self) -> Result<Option<Vec<u8>>, StoreError>;

    /// Largest key in the store.
    fn last_key(&self) -> Result<Option<Vec<u8>>, StoreError>;

    /// Up to `limit` keys in ascending order, strictly after `start`
    /// (or from the beginning when `start` is `None`).
    fn keys_after(&self, start: Option<&[u8]>, limit: usize) -> Result<Vec<Vec<u8>>, StoreError>;

    /// Release the handle. Closing twice is a no-op.
    fn close(&mut self) -> Result<(), StoreError>;

    /// Remove all durable state. Only valid after `close`.
    fn destroy(&mut self) -> Result<(), StoreError>;
}

/// In-memory ordered store for tests and ephemeral queues.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
    closed: bool,
}

impl MemoryStore {
    /// Create an empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_open(&self) -> Result<(), StoreError> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

impl KvStore for MemoryStore {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.check_open()?;
        self.entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Vec<u8>, StoreError> {
        self.check_open()?;
        self.entries.get(key).cloned().ok_or(StoreError::NotFound)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.check_open()?;
        self.entries.remove(key);
        Ok(())
    }

    fn first_key(&self) -> Result<Option<Vec<u8>>, StoreError> {
        self.check_open()?;
        Ok(self.entries.keys().next().cloned())
    }

    fn last_key(&self) -> Result<Option<Vec<u8>>, StoreError> {
        self.check_open()?;
        Ok(self.entries.keys().next_back().cloned())
    }

    fn keys_after(&self, start: Option<&[u8]>, limit: usize) -> Result<Vec<Vec<u8>>, StoreError> {
        self.check_open()?;
        let lower = match start {
            Some(key) => Bound::Excluded(key),
            None => Bound::Unbounded,
        };
        Ok(self
            .entries
            .range::<[u8], _>((lower, Bound::Unbounded))
            .take(limit)
            .map(|(k, _)| k.clone())
            .collect())
    }

    fn close(&mut self) -> Result<(), StoreError> {
        self.closed = true;
        Ok(())
    }

    fn destroy(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
