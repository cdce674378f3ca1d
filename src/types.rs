// In: src/types.rs

//! Defines all wire-level structures and constants for the ADFS calldata format.
//! This is the single source of truth for both the write-path batch layout and
//! the bookkeeping constants of the round-robin storage addressing scheme. It
//! establishes the contracts shared by the encoder, the decoder and the batcher.

use ethereum_types::H256;
use serde::{Serialize, Serializer};

use crate::error::CodecError;

//==================================================================================
// I. Storage-Addressing Constants
//==================================================================================

/// Size of one storage word. Payloads and read responses are word-oriented.
pub const WORD_SIZE: usize = 32;

/// Number of historical slots in each feed's ring buffer. Indices are taken
/// modulo this capacity (a deployment parameter of the reference store).
pub const RING_CAPACITY: u64 = 8192;

/// Upper sanity bound on the stride field. The store practically deploys
/// strides 0..=7 (payloads of 32 to 4096 bytes), but the wire field admits
/// anything below this bound.
pub const MAX_STRIDE: u8 = 31;

/// Number of feed ids covered by one family slot of the ring buffer table.
pub const FEEDS_PER_TABLE_SLOT: u128 = 16;

/// Bit position of the stride within a ring buffer table slot key.
pub const STRIDE_KEY_SHIFT: u32 = 115;

/// Largest feed id representable in the slot-key addressing scheme.
pub const MAX_FEED_ID: u128 = (1 << STRIDE_KEY_SHIFT) - 1;

//==================================================================================
// II. Field Widths (bytes, big-endian)
//==================================================================================

pub const BLOCK_NUMBER_WIDTH: usize = 8;
pub const ACCUMULATOR_WIDTH: usize = 32;
pub const COUNT_WIDTH: usize = 4;
pub const FEED_ID_WIDTH: usize = 16;
pub const STRIDE_WIDTH: usize = 1;
pub const INDEX_WIDTH: usize = 2;
pub const SLOT_KEY_WIDTH: usize = 16;

//==================================================================================
// III. Core Data Model
//==================================================================================

/// One price feed's state at a point in time.
///
/// `data` is opaque to the codec; its encoding is the oracle's value
/// convention. The only structural requirement is `data.len() == 32 << stride`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feed {
    /// Stable feed identifier.
    pub id: u128,
    /// Size class; the payload occupies exactly `32 << stride` bytes.
    pub stride: u8,
    /// Ring buffer slot this record occupies for its feed.
    pub index: u16,
    #[serde(serialize_with = "ser_hex")]
    pub data: Vec<u8>,
}

impl Feed {
    /// The exact payload length implied by a stride, saturating instead of
    /// overflowing so that callers on any target can compare it safely.
    pub fn data_len(stride: u8) -> usize {
        let len = (WORD_SIZE as u64) << u64::from(stride.min(MAX_STRIDE));
        usize::try_from(len).unwrap_or(usize::MAX)
    }
}

/// One bookkeeping record updated alongside a batch, mapping a stride/feed
/// slot to its latest ring buffer index.
///
/// Every feed written in a batch must have a corresponding table entry so
/// readers can locate its latest index without scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RingBufferTableEntry {
    pub slot_key: u128,
    pub index: u16,
}

impl RingBufferTableEntry {
    /// Computes the table slot key for a feed: the stride selects the family
    /// region, the feed id the position within it.
    pub fn slot_key_for(stride: u8, feed_id: u128) -> Result<u128, CodecError> {
        if feed_id > MAX_FEED_ID {
            return Err(CodecError::FeedIdTooLarge(feed_id));
        }
        Ok((u128::from(stride) << STRIDE_KEY_SHIFT) | feed_id)
    }
}

/// The two mutually exclusive header shapes of a write transaction.
///
/// The shape is selected by the caller, never inferred from the bytes; the
/// wire carries no discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BatchHeader {
    /// Single-chain mode.
    BlockNumber(u64),
    /// Cross-domain accumulator mode.
    AccumulatorPair {
        #[serde(serialize_with = "ser_h256")]
        source: H256,
        #[serde(serialize_with = "ser_h256")]
        destination: H256,
    },
}

/// Caller-selected header interpretation for the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMode {
    BlockNumber,
    AccumulatorPair,
}

/// One write transaction's payload, as produced by the batcher and consumed
/// by the encoder. Feed order is significant: it is write order, not sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Batch {
    pub header: BatchHeader,
    pub feeds: Vec<Feed>,
    pub ring_buffer_table: Vec<RingBufferTableEntry>,
}

/// The best-effort reconstruction of a batch from observed calldata.
///
/// `feeds_len`/`indices_len` are the counts as transmitted; on truncated
/// input they may exceed the lengths of the vectors actually recovered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedBatch {
    pub header: Option<BatchHeader>,
    pub feeds_len: u32,
    pub indices_len: u32,
    pub feeds: Vec<Feed>,
    pub ring_buffer_table: Vec<RingBufferTableEntry>,
}

//==================================================================================
// IV. Serde Helpers
//==================================================================================

fn ser_hex<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format!("0x{}", hex::encode(bytes)))
}

fn ser_h256<S: Serializer>(h: &H256, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format!("{h:#x}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_len_matches_stride_size_class() {
        assert_eq!(Feed::data_len(0), 32);
        assert_eq!(Feed::data_len(1), 64);
        assert_eq!(Feed::data_len(7), 4096);
    }

    #[test]
    fn slot_key_places_stride_above_feed_id() {
        let key = RingBufferTableEntry::slot_key_for(2, 5).unwrap();
        assert_eq!(key, (2u128 << STRIDE_KEY_SHIFT) | 5);
        assert_eq!(key >> STRIDE_KEY_SHIFT, 2);
    }

    #[test]
    fn slot_key_rejects_oversized_feed_id() {
        let err = RingBufferTableEntry::slot_key_for(0, MAX_FEED_ID + 1).unwrap_err();
        assert_eq!(err, CodecError::FeedIdTooLarge(MAX_FEED_ID + 1));
    }
}
