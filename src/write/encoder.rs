//! Serializes a [`Batch`] into update-entry-point calldata.
//!
//! Layout, all integers fixed-width big-endian, fields packed back to back:
//!
//! ```text
//! [header][feeds_len: u32][indices_len: u32]
//!     [id u128][stride u8][index u16][data 32<<stride]   * feeds_len
//!     [slot_key u128][index u16]                         * indices_len
//! ```
//!
//! Every structural check runs before emission. A feed whose payload does not
//! match its declared stride is the caller's bug, caught here while the caller
//! can still fix it instead of being discovered by the on-chain decoder after
//! the transaction is spent.

use log::{debug, info};

use crate::error::CodecError;
use crate::types::{
    Batch, BatchHeader, Feed, ACCUMULATOR_WIDTH, BLOCK_NUMBER_WIDTH, COUNT_WIDTH, FEED_ID_WIDTH,
    INDEX_WIDTH, MAX_STRIDE, RING_CAPACITY, SLOT_KEY_WIDTH, STRIDE_WIDTH,
};
use crate::words::{put_uint, split_into_32b_words};

/// The flat word array plus bookkeeping counts handed to the store's update
/// entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedWords {
    pub words: Vec<Vec<u8>>,
    pub feeds_len: u32,
    pub indices_len: u32,
}

fn validate_feed(feed: &Feed) -> Result<(), CodecError> {
    if feed.stride > MAX_STRIDE {
        return Err(CodecError::StrideTooLarge {
            feed_id: feed.id,
            stride: feed.stride,
            max: MAX_STRIDE,
        });
    }
    let expected = Feed::data_len(feed.stride);
    if feed.data.len() != expected {
        return Err(CodecError::DataLengthMismatch {
            feed_id: feed.id,
            stride: feed.stride,
            expected,
            got: feed.data.len(),
        });
    }
    if u64::from(feed.index) >= RING_CAPACITY {
        return Err(CodecError::IndexOutOfRange {
            feed_id: feed.id,
            index: u64::from(feed.index),
        });
    }
    Ok(())
}

/// Turns one batch into the exact byte layout expected by the store's update
/// entry point. Fails fast, before any bytes are returned, on any feed whose
/// payload length, stride or index violates the wire contract.
pub fn encode_batch(batch: &Batch) -> Result<Vec<u8>, CodecError> {
    for feed in &batch.feeds {
        validate_feed(feed)?;
    }

    let mut out = Vec::new();

    match batch.header {
        BatchHeader::BlockNumber(block_number) => {
            put_uint(&mut out, block_number, BLOCK_NUMBER_WIDTH)?;
        }
        BatchHeader::AccumulatorPair {
            source,
            destination,
        } => {
            debug_assert_eq!(source.as_bytes().len(), ACCUMULATOR_WIDTH);
            out.extend_from_slice(source.as_bytes());
            out.extend_from_slice(destination.as_bytes());
        }
    }

    put_uint(&mut out, batch.feeds.len() as u32, COUNT_WIDTH)?;
    put_uint(
        &mut out,
        batch.ring_buffer_table.len() as u32,
        COUNT_WIDTH,
    )?;

    for feed in &batch.feeds {
        put_uint(&mut out, feed.id, FEED_ID_WIDTH)?;
        put_uint(&mut out, feed.stride, STRIDE_WIDTH)?;
        put_uint(&mut out, feed.index, INDEX_WIDTH)?;
        out.extend_from_slice(&feed.data);
    }

    for entry in &batch.ring_buffer_table {
        put_uint(&mut out, entry.slot_key, SLOT_KEY_WIDTH)?;
        put_uint(&mut out, entry.index, INDEX_WIDTH)?;
    }

    info!(
        "Encoded batch of {} feed(s) and {} table entr(ies) into {} bytes",
        batch.feeds.len(),
        batch.ring_buffer_table.len(),
        out.len()
    );
    Ok(out)
}

/// Encodes a batch and splits the result into the flat 32-byte word array
/// plus bookkeeping counts that the update entry point consumes.
pub fn encode_batch_words(batch: &Batch) -> Result<EncodedWords, CodecError> {
    let calldata = encode_batch(batch)?;
    let words = split_into_32b_words(&calldata);
    debug!("Batch spans {} storage word(s)", words.len());
    Ok(EncodedWords {
        words,
        feeds_len: batch.feeds.len() as u32,
        indices_len: batch.ring_buffer_table.len() as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RingBufferTableEntry;

    fn single_feed_batch() -> Batch {
        Batch {
            header: BatchHeader::BlockNumber(100),
            feeds: vec![Feed {
                id: 2,
                stride: 0,
                index: 5,
                data: vec![0u8; 32],
            }],
            ring_buffer_table: vec![],
        }
    }

    #[test]
    fn emits_expected_layout_for_a_single_feed() {
        let bytes = encode_batch(&single_feed_batch()).unwrap();

        // header(8) + counts(4+4) + id(16) + stride(1) + index(2) + data(32)
        assert_eq!(bytes.len(), 67);
        assert_eq!(&bytes[..8], &[0, 0, 0, 0, 0, 0, 0, 100]);
        assert_eq!(&bytes[8..12], &[0, 0, 0, 1]); // feeds_len
        assert_eq!(&bytes[12..16], &[0, 0, 0, 0]); // indices_len
        assert_eq!(bytes[31], 2); // feed id, low byte of the u128
        assert_eq!(bytes[32], 0); // stride
        assert_eq!(&bytes[33..35], &[0, 5]); // ring buffer index
        assert!(bytes[35..].iter().all(|&b| b == 0));
    }

    #[test]
    fn rejects_data_length_mismatch_before_emitting() {
        let mut batch = single_feed_batch();
        batch.feeds[0].data = vec![0u8; 31];

        let err = encode_batch(&batch).unwrap_err();
        assert_eq!(
            err,
            CodecError::DataLengthMismatch {
                feed_id: 2,
                stride: 0,
                expected: 32,
                got: 31,
            }
        );
    }

    #[test]
    fn rejects_index_beyond_ring_capacity() {
        let mut batch = single_feed_batch();
        batch.feeds[0].index = RING_CAPACITY as u16; // capacity fits u16

        let err = encode_batch(&batch).unwrap_err();
        assert!(matches!(err, CodecError::IndexOutOfRange { feed_id: 2, .. }));
    }

    #[test]
    fn table_entries_follow_the_feed_records() {
        let mut batch = single_feed_batch();
        batch.ring_buffer_table = vec![RingBufferTableEntry {
            slot_key: RingBufferTableEntry::slot_key_for(0, 2).unwrap(),
            index: 5,
        }];

        let bytes = encode_batch(&batch).unwrap();
        assert_eq!(bytes.len(), 67 + 18);
        assert_eq!(&bytes[85..87], &[0, 5]); // table index trails the slot key
    }

    #[test]
    fn word_serialization_carries_the_counts() {
        let mut batch = single_feed_batch();
        batch.ring_buffer_table = vec![RingBufferTableEntry {
            slot_key: 2,
            index: 5,
        }];

        let encoded = encode_batch_words(&batch).unwrap();
        assert_eq!(encoded.feeds_len, 1);
        assert_eq!(encoded.indices_len, 1);
        assert_eq!(
            encoded.words.concat(),
            encode_batch(&batch).unwrap()
        );
    }
}
