//! Rebuilding ring positions from the keys that survived a restart.
//!
//! No head/tail record is persisted. The live segment of the ring is exactly
//! the set of stored keys, so its boundaries are read back from the store.

use tracing::{debug, warn};

use crate::error::QueueError;
use crate::key;
use crate::store::KvStore;

/// Keys fetched per page when searching for the wrap gap.
const SCAN_PAGE: usize = 1024;

/// Recover `(head, tail)` from the keys in `store`.
///
/// An empty store yields the `(0, 0)` sentinel. Otherwise the oldest key is
/// `head + 1` and the newest is `tail`. A live run that straddles the top of
/// the ring is the only way both `0` and `max_queue_size - 1` can be present,
/// since an unwrapped run holding both would exceed capacity; that case is
/// resolved by locating the gap between the two halves.
pub(crate) fn recover_positions<S: KvStore>(
    store: &S,
    max_queue_size: u64,
) -> Result<(u64, u64), QueueError> {
    let Some(first_key) = store.first_key()? else {
        return Ok((0, 0));
    };
    let first = checked_id(&first_key, max_queue_size)?;
    let last = match store.last_key()? {
        Some(last_key) => checked_id(&last_key, max_queue_size)?,
        None => first,
    };

    if first == 0 && last == max_queue_size - 1 {
        return recover_wrapped(store, max_queue_size);
    }

    let head = (first + max_queue_size - 1) % max_queue_size;
    debug!("Recovered contiguous run {}..={}", first, last);
    Ok((head, last))
}

/// Walk keys upward from `0` until the run breaks.
///
/// The keys below the gap are the part of the run that already wrapped, so
/// the last of them is the tail. The first key above the gap is the oldest
/// entry, so the head sits just before it.
fn recover_wrapped<S: KvStore>(store: &S, max_queue_size: u64) -> Result<(u64, u64), QueueError> {
    let mut expected = 0u64;
    let mut cursor: Option<Vec<u8>> = None;

    loop {
        let page = store.keys_after(cursor.as_deref(), SCAN_PAGE)?;
        if page.is_empty() {
            break;
        }

        for raw in &page {
            let id = checked_id(raw, max_queue_size)?;
            if id != expected {
                let (head, tail) = (id - 1, expected - 1);
                debug!(
                    "Recovered wrapped run {}..{} and 0..={}",
                    id, max_queue_size, tail
                );
                return Ok((head, tail));
            }
            expected += 1;
        }

        cursor = page.last().cloned();
    }

    warn!(
        "Every identifier in a ring of {} is occupied, which exceeds capacity",
        max_queue_size
    );
    Err(QueueError::Corrupt(format!(
        "all {} identifiers are occupied",
        max_queue_size
    )))
}

fn checked_id(raw: &[u8], max_queue_size: u64) -> Result<u64, QueueError> {
    let id = key::decode(raw)?;
    if id >= max_queue_size {
        warn!(
            "Stored identifier {} does not fit a ring of {}",
            id, max_queue_size
        );
        return Err(QueueError::OutOfBounds(id));
    }
    Ok(id)
}
