//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Largest ring size a queue may be configured with.
///
/// Keeping the ring at a quarter of the `u64` range means
/// `max_queue_size + tail - head` can never overflow.
pub const MAX_QUEUE_SIZE: u64 = u64::MAX >> 2;

/// Smallest usable ring: one sentinel slot plus one entry.
pub const MIN_QUEUE_SIZE: u64 = 2;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub queue: QueueConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Queue configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Directory holding the backing store.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Size of the identifier ring. The queue holds at most `max_queue_size - 1` entries.
    #[serde(default = "default_max_queue_size")]
    pub max_queue_size: u64,

    /// Durability of each write.
    #[serde(default)]
    pub sync_mode: SyncMode,
}

impl QueueConfig {
    /// Create a configuration for the given directory with default capacity.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Set the ring size.
    pub fn with_max_queue_size(mut self, max_queue_size: u64) -> Self {
        self.max_queue_size = max_queue_size;
        self
    }

    /// Set the write durability.
    pub fn with_sync_mode(mut self, sync_mode: SyncMode) -> Self {
        self.sync_mode = sync_mode;
        self
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            max_queue_size: default_max_queue_size(),
            sync_mode: SyncMode::default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("~/.levelq/queue")
}

fn default_max_queue_size() -> u64 {
    MAX_QUEUE_SIZE
}

/// How hard the store pushes each write to disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Hand writes to the OS and move on.
    Off,
    /// Sync at checkpoints only.
    Normal,
    /// Sync every committed write.
    #[default]
    Full,
}

impl SyncMode {
    /// Name understood by `PRAGMA synchronous`.
    pub fn as_pragma(&self) -> &'static str {
        match self {
            SyncMode::Off => "OFF",
            SyncMode::Normal => "NORMAL",
            SyncMode::Full => "FULL",
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncMode::Off => write!(f, "off"),
            SyncMode::Normal => write!(f, "normal"),
            SyncMode::Full => write!(f, "full"),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily-rolling log files. Console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Emit JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
