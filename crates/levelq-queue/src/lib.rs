//! # levelq Queue
//!
//! Durable first-in-first-out queue layered over an ordered key-value store.
//!
//! ## Features
//!
//! - Byte payloads and serde values through a pluggable codec
//! - Ring of fixed-width big-endian keys, so store order is queue order
//! - Head and tail recovered from surviving keys on open, no metadata record
//! - SQLite store for durability, in-memory store for tests
//! - Thread-safe: mutations serialize on one lock, reads share it

pub mod codec;
pub mod error;
pub mod key;
pub mod queue;
mod recovery;
pub mod sqlite;
pub mod store;

pub use codec::{Codec, JsonCodec};
pub use error::{CodecError, QueueError, StoreError};
pub use levelq_config::{QueueConfig, SyncMode, MAX_QUEUE_SIZE};
pub use queue::PersistentQueue;
pub use sqlite::SqliteStore;
pub use store::{KvStore, MemoryStore};
