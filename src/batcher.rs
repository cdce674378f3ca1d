//! Groups pending feed updates into capacity-bounded batches and builds the
//! ring buffer bookkeeping table that travels with each write transaction.
//!
//! Batching is a greedy single pass in input order. Each feed contributes
//! `stride + 1` size units to its batch: one unit of per-feed control
//! overhead plus the stride size class. The per-feed round counters are owned
//! by the caller and only read here; after a batch is submitted the caller
//! advances the counter of every feed it consumed.

use std::collections::{BTreeMap, HashMap};

use log::{debug, info};

use crate::error::CodecError;
use crate::types::{Feed, RingBufferTableEntry, RING_CAPACITY};

/// For each feed id, the round counter assigning the next ring buffer slot.
pub type RoundCounters = HashMap<u128, u64>;

/// Size units a feed contributes to its batch.
fn feed_size(feed: &Feed) -> u64 {
    u64::from(feed.stride) + 1
}

/// Walks `pending` in input order and groups it into batches whose aggregate
/// size never exceeds `capacity`. Order is preserved, never re-sorted.
///
/// Each emitted feed's `index` is stamped from its round counter, wrapped
/// modulo the ring capacity; a feed without a counter starts at slot 0. A
/// feed too large for `capacity` on its own still gets a dedicated batch
/// rather than being dropped.
pub fn batch_feeds(pending: &[Feed], counters: &RoundCounters, capacity: u64) -> Vec<Vec<Feed>> {
    let mut batches: Vec<Vec<Feed>> = Vec::new();
    let mut current: Vec<Feed> = Vec::new();
    let mut current_size: u64 = 0;

    for feed in pending {
        let counter = counters.get(&feed.id).copied().unwrap_or(0);
        let mut feed = feed.clone();
        feed.index = (counter % RING_CAPACITY) as u16;

        let size = feed_size(&feed);
        if current_size + size > capacity {
            if !current.is_empty() {
                batches.push(std::mem::take(&mut current));
            }
            current_size = size;
            current.push(feed);
        } else {
            current_size += size;
            current.push(feed);
        }
    }

    if !current.is_empty() {
        batches.push(current);
    }

    info!(
        "Batched {} pending feed updates into {} batch(es) (capacity {capacity})",
        pending.len(),
        batches.len()
    );
    batches
}

/// Builds the ring buffer table for a batch: one entry per written feed,
/// keyed by the slot formula and emitted in ascending key order.
///
/// If the same feed appears more than once in a batch, the last written
/// index wins, matching the store's latest-value semantics.
pub fn build_ring_buffer_table(feeds: &[Feed]) -> Result<Vec<RingBufferTableEntry>, CodecError> {
    let mut slots: BTreeMap<u128, u16> = BTreeMap::new();

    for feed in feeds {
        let key = RingBufferTableEntry::slot_key_for(feed.stride, feed.id)?;
        slots.insert(key, feed.index);
    }

    debug!("Ring buffer table covers {} slot(s)", slots.len());
    Ok(slots
        .into_iter()
        .map(|(slot_key, index)| RingBufferTableEntry { slot_key, index })
        .collect())
}
