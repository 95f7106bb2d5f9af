//! Persistent FIFO queue.
//!
//! Entries occupy a ring of identifiers `[0, max_queue_size)`. `head` is the
//! last dequeued identifier and `tail` the last enqueued one; the live entries
//! are `head + 1 ..= tail` following the ring, each stored under its
//! big-endian key. `head == tail` means empty, and the ring is full once
//! advancing `tail` would land on `head`.

use std::path::{Path, PathBuf};

use levelq_config::{ConfigValidator, QueueConfig};
use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::codec::{Codec, JsonCodec};
use crate::error::{QueueError, StoreError};
use crate::key;
use crate::recovery::recover_positions;
use crate::sqlite::SqliteStore;
use crate::store::KvStore;

/// State guarded by the queue lock.
struct QueueState<S> {
    store: S,
    head: u64,
    tail: u64,
    is_open: bool,
}

/// Durable FIFO queue over an ordered key-value store.
pub struct PersistentQueue<S = SqliteStore, C = JsonCodec> {
    max_queue_size: u64,
    data_dir: Option<PathBuf>,
    codec: C,
    state: RwLock<QueueState<S>>,
}

impl PersistentQueue<SqliteStore, JsonCodec> {
    /// Open the queue described by `config`, creating it if needed.
    pub fn open(config: &QueueConfig) -> Result<Self, QueueError> {
        check_max_queue_size(config.max_queue_size)?;
        let store = SqliteStore::open(&config.data_dir, config.sync_mode)?;
        Self::build(
            store,
            config.max_queue_size,
            Some(config.data_dir.clone()),
            JsonCodec,
        )
    }

    /// Open a queue in `data_dir` with the default configuration.
    pub fn open_dir(data_dir: impl Into<PathBuf>) -> Result<Self, QueueError> {
        Self::open(&QueueConfig::new(data_dir))
    }
}

impl<S: KvStore> PersistentQueue<S, JsonCodec> {
    /// Create a queue over an already opened store.
    pub fn with_store(store: S, max_queue_size: u64) -> Result<Self, QueueError> {
        Self::build(store, max_queue_size, None, JsonCodec)
    }
}

impl<S: KvStore, C: Codec> PersistentQueue<S, C> {
    fn build(
        store: S,
        max_queue_size: u64,
        data_dir: Option<PathBuf>,
        codec: C,
    ) -> Result<Self, QueueError> {
        check_max_queue_size(max_queue_size)?;
        let (head, tail) = recover_positions(&store, max_queue_size)?;

        let queue = Self {
            max_queue_size,
            data_dir,
            codec,
            state: RwLock::new(QueueState {
                store,
                head,
                tail,
                is_open: true,
            }),
        };

        info!(
            "Opened queue at {:?} (head={}, tail={}, length={})",
            queue.data_dir,
            head,
            tail,
            queue.length()
        );
        Ok(queue)
    }

    /// Replace the codec used by the object helpers.
    pub fn with_codec<C2: Codec>(self, codec: C2) -> PersistentQueue<S, C2> {
        PersistentQueue {
            max_queue_size: self.max_queue_size,
            data_dir: self.data_dir,
            codec,
            state: self.state,
        }
    }

    /// Append a payload to the back of the queue.
    pub fn enqueue(&self, value: &[u8]) -> Result<(), QueueError> {
        let mut state = self.state.write();

        if !state.is_open {
            return Err(QueueError::DbClosed);
        }

        let next_id = (state.tail + 1) % self.max_queue_size;
        if next_id == state.head {
            return Err(QueueError::Full);
        }

        state.store.put(&key::encode(next_id), value)?;
        state.tail = next_id;

        debug!("Enqueued entry {} ({} bytes)", next_id, value.len());
        Ok(())
    }

    /// Serialize `value` with the queue codec and enqueue it.
    ///
    /// Serialization happens before the lock is taken, so a value that cannot
    /// be encoded never touches the store.
    pub fn enqueue_object<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), QueueError> {
        let bytes = self.codec.encode(value)?;
        self.enqueue(&bytes)
    }

    /// Remove and return the payload at the front of the queue.
    pub fn dequeue(&self) -> Result<Vec<u8>, QueueError> {
        let mut state = self.state.write();

        if !state.is_open {
            return Err(QueueError::DbClosed);
        }

        let next_id = (state.head + 1) % self.max_queue_size;
        let value = self.lookup_in(&state, next_id)?;

        state.store.delete(&key::encode(next_id))?;
        state.head = next_id;

        debug!("Dequeued entry {} ({} bytes)", next_id, value.len());
        Ok(value)
    }

    /// Dequeue the front entry and decode it with the queue codec.
    ///
    /// The entry is removed before decoding. A decode failure therefore
    /// loses that entry; see [`QueueError::is_data_loss`].
    pub fn dequeue_object<T: DeserializeOwned>(&self) -> Result<T, QueueError> {
        let bytes = self.dequeue()?;
        self.codec.decode(&bytes).map_err(|e| {
            warn!("Dropped undecodable entry from queue at {:?}: {}", self.data_dir, e);
            QueueError::from(e)
        })
    }

    /// Read the payload stored under `id` without removing it.
    pub fn lookup(&self, id: u64) -> Result<Vec<u8>, QueueError> {
        let state = self.state.read();

        if !state.is_open {
            return Err(QueueError::DbClosed);
        }

        self.lookup_in(&state, id)
    }

    fn lookup_in(&self, state: &QueueState<S>, id: u64) -> Result<Vec<u8>, QueueError> {
        let (head, tail) = (state.head, state.tail);

        if head == tail {
            return Err(QueueError::Empty);
        }
        if id >= self.max_queue_size {
            return Err(QueueError::OutOfBounds(id));
        }

        let in_range = if head < tail {
            id > head && id <= tail
        } else {
            // Wrapped: everything except (tail, head] is live.
            id <= tail || id > head
        };
        if !in_range {
            return Err(QueueError::OutOfBounds(id));
        }

        match state.store.get(&key::encode(id)) {
            Ok(value) => Ok(value),
            Err(StoreError::NotFound) => Err(QueueError::OutOfBounds(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Number of entries in the queue. Zero once closed.
    pub fn length(&self) -> u64 {
        let state = self.state.read();
        (self.max_queue_size + state.tail - state.head) % self.max_queue_size
    }

    /// Whether the queue holds no entries.
    pub fn is_empty(&self) -> bool {
        let state = self.state.read();
        state.head == state.tail
    }

    /// Current `(head, tail)` identifiers.
    pub fn positions(&self) -> (u64, u64) {
        let state = self.state.read();
        (state.head, state.tail)
    }

    /// Size of the identifier ring.
    pub fn capacity(&self) -> u64 {
        self.max_queue_size
    }

    /// Directory of the backing store, if it lives on disk.
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// Whether the store handle is still open.
    pub fn is_open(&self) -> bool {
        self.state.read().is_open
    }

    /// Close the store handle. Stored entries remain for the next open.
    pub fn close(&self) -> Result<(), QueueError> {
        let mut state = self.state.write();
        self.close_locked(&mut state)
    }

    fn close_locked(&self, state: &mut QueueState<S>) -> Result<(), QueueError> {
        if !state.is_open {
            return Ok(());
        }

        state.store.close()?;
        state.head = 0;
        state.tail = 0;
        state.is_open = false;

        info!("Closed queue at {:?}", self.data_dir);
        Ok(())
    }

    /// Close the queue and delete all of its durable state.
    ///
    /// If the queue closes but its storage cannot be removed, the error is
    /// [`QueueError::PartialDrop`].
    pub fn destroy(&self) -> Result<(), QueueError> {
        let mut state = self.state.write();
        self.close_locked(&mut state)?;

        if let Err(e) = state.store.destroy() {
            warn!("Queue at {:?} closed but not removed: {}", self.data_dir, e);
            return Err(QueueError::PartialDrop(e));
        }

        info!("Destroyed queue at {:?}", self.data_dir);
        Ok(())
    }
}

fn check_max_queue_size(max_queue_size: u64) -> Result<(), QueueError> {
    ConfigValidator::check_max_queue_size(max_queue_size).map_err(|e| {
        QueueError::InvalidConfig {
            field: e.path,
            message: e.message,
        }
    })
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
