//! Queue errors.

use thiserror::Error;

/// Queue error types.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The queue (and its store handle) has been closed.
    #[error("Database is closed")]
    DbClosed,

    /// No entries to dequeue.
    #[error("Queue is empty")]
    Empty,

    /// Advancing the tail would collide with the head.
    #[error("Queue is full")]
    Full,

    /// Identifier outside the live segment of the ring.
    #[error("ID {0} is outside the range of the queue")]
    OutOfBounds(u64),

    /// A stored key is not a fixed-width identifier.
    #[error("Invalid key length: expected 8 bytes, got {0}")]
    InvalidKey(usize),

    /// Stored keys cannot be a live segment of the ring.
    #[error("Stored keys do not form a valid queue: {0}")]
    Corrupt(String),

    /// Queue configuration rejected at construction.
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig { field: String, message: String },

    /// Underlying store failure, passed through unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Payload could not be serialized or deserialized.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The queue was closed but its durable state could not be removed.
    #[error("Queue closed but storage not removed: {0}")]
    PartialDrop(#[source] StoreError),
}

/// Errors raised by a key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No value stored under the key.
    #[error("Key not found")]
    NotFound,

    /// The store handle has been closed.
    #[error("Store is closed")]
    Closed,

    /// SQLite failure.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Filesystem failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialization errors from a [`Codec`](crate::codec::Codec).
#[derive(Debug, Error)]
pub enum CodecError {
    /// Value could not be encoded; nothing was written.
    #[error("Failed to encode value: {0}")]
    Encode(String),

    /// Bytes could not be decoded; the entry has already left the queue.
    #[error("Failed to decode value: {0}")]
    Decode(String),
}

impl QueueError {
    /// Whether the error means an entry was removed but could not be handed back.
    pub fn is_data_loss(&self) -> bool {
        matches!(self, QueueError::Codec(CodecError::Decode(_)))
    }
}
