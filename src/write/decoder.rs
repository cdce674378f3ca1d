//! Reconstructs a [`ParsedBatch`] from raw submitted calldata.
//!
//! The decoder audits data that is already final on-chain, so it never
//! aborts: every structural anomaly is appended to the returned error list
//! and whatever was fully read up to that point is kept. Feed records are
//! self-describing variable length (the byte width follows from each record's
//! own stride field), so decoding advances an explicit bounds-checked cursor
//! field by field instead of assuming a fixed record width.
//!
//! State walk: Header -> Counts -> Feed* -> TableEntry* -> Done, where every
//! state can short-circuit to Done on cursor exhaustion. Safe on adversarial
//! or truncated input; nothing here indexes past the buffer or preallocates
//! from attacker-controlled counts.

use ethereum_types::H256;

use crate::error::DecodeError;
use crate::types::{
    BatchHeader, Feed, HeaderMode, ParsedBatch, RingBufferTableEntry, ACCUMULATOR_WIDTH,
    BLOCK_NUMBER_WIDTH, COUNT_WIDTH, FEED_ID_WIDTH, INDEX_WIDTH, MAX_STRIDE, RING_CAPACITY,
    SLOT_KEY_WIDTH, STRIDE_WIDTH,
};

//==================================================================================
// 1. Bounds-Checked Cursor
//==================================================================================

/// A reader over immutable calldata. All access goes through `take*`, which
/// either yields the requested bytes or leaves the cursor untouched.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        if n > self.remaining() {
            return None;
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Some(slice)
    }

    /// Reads `width` big-endian bytes as an unsigned integer. `width` must
    /// not exceed 16.
    fn take_uint(&mut self, width: usize) -> Option<u128> {
        let bytes = self.take(width)?;
        let mut value = 0u128;
        for &b in bytes {
            value = (value << 8) | u128::from(b);
        }
        Some(value)
    }
}

//==================================================================================
// 2. Decode Entry Point
//==================================================================================

/// Decodes write-path calldata under the caller-selected header mode.
///
/// Always returns; the error list is empty exactly when the input was fully
/// well formed. The header shape follows `mode` alone, never the bytes, so
/// block-number decoding can never populate accumulators and vice versa.
pub fn decode_calldata(calldata: &[u8], mode: HeaderMode) -> (ParsedBatch, Vec<DecodeError>) {
    let mut cur = Cursor::new(calldata);
    let mut parsed = ParsedBatch::default();
    let mut errors = Vec::new();

    // Header
    match mode {
        HeaderMode::BlockNumber => match cur.take_uint(BLOCK_NUMBER_WIDTH) {
            Some(block_number) => {
                parsed.header = Some(BatchHeader::BlockNumber(block_number as u64));
            }
            None => {
                errors.push(unexpected_end("block number", &cur));
                return (parsed, errors);
            }
        },
        HeaderMode::AccumulatorPair => {
            let source = cur.take(ACCUMULATOR_WIDTH).map(H256::from_slice);
            let destination = cur.take(ACCUMULATOR_WIDTH).map(H256::from_slice);
            match (source, destination) {
                (Some(source), Some(destination)) => {
                    parsed.header = Some(BatchHeader::AccumulatorPair {
                        source,
                        destination,
                    });
                }
                _ => {
                    errors.push(unexpected_end("accumulator pair", &cur));
                    return (parsed, errors);
                }
            }
        }
    }

    // Counts
    match (cur.take_uint(COUNT_WIDTH), cur.take_uint(COUNT_WIDTH)) {
        (Some(feeds_len), Some(indices_len)) => {
            parsed.feeds_len = feeds_len as u32;
            parsed.indices_len = indices_len as u32;
        }
        _ => {
            errors.push(unexpected_end("record counts", &cur));
            return (parsed, errors);
        }
    }

    // Feed records
    for _ in 0..parsed.feeds_len {
        let Some(id) = cur.take_uint(FEED_ID_WIDTH) else {
            errors.push(unexpected_end("feed id", &cur));
            return (parsed, errors);
        };
        let Some(stride) = cur.take_uint(STRIDE_WIDTH) else {
            errors.push(unexpected_end("feed stride", &cur));
            return (parsed, errors);
        };
        let stride = stride as u8;
        if stride > MAX_STRIDE {
            // The record width is no longer trustworthy; stop here rather
            // than guess at a cursor advance.
            errors.push(DecodeError::StrideOutOfRange {
                feed_id: id,
                stride,
            });
            return (parsed, errors);
        }
        let Some(index) = cur.take_uint(INDEX_WIDTH) else {
            errors.push(unexpected_end("feed index", &cur));
            return (parsed, errors);
        };
        if index >= u128::from(RING_CAPACITY) {
            errors.push(DecodeError::IndexOutOfRange {
                feed_id: id,
                index: index as u64,
            });
        }
        let Some(data) = cur.take(Feed::data_len(stride)) else {
            errors.push(unexpected_end("feed data", &cur));
            return (parsed, errors);
        };
        parsed.feeds.push(Feed {
            id,
            stride,
            index: index as u16,
            data: data.to_vec(),
        });
    }

    // Ring buffer table records
    for _ in 0..parsed.indices_len {
        let Some(slot_key) = cur.take_uint(SLOT_KEY_WIDTH) else {
            errors.push(unexpected_end("table slot key", &cur));
            return (parsed, errors);
        };
        let Some(index) = cur.take_uint(INDEX_WIDTH) else {
            errors.push(unexpected_end("table index", &cur));
            return (parsed, errors);
        };
        if index >= u128::from(RING_CAPACITY) {
            errors.push(DecodeError::TableIndexOutOfRange {
                slot_key,
                index: index as u64,
            });
        }
        parsed.ring_buffer_table.push(RingBufferTableEntry {
            slot_key,
            index: index as u16,
        });
    }

    if cur.remaining() > 0 {
        errors.push(DecodeError::TrailingBytes(cur.remaining()));
    }

    (parsed, errors)
}

fn unexpected_end(field: &'static str, cur: &Cursor) -> DecodeError {
    DecodeError::UnexpectedEnd {
        field,
        offset: cur.position(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_take_past_end_leaves_position_untouched() {
        let bytes = [1u8, 2, 3];
        let mut cur = Cursor::new(&bytes);
        assert_eq!(cur.take(2), Some(&bytes[..2]));
        assert_eq!(cur.take(2), None);
        assert_eq!(cur.position(), 2);
        assert_eq!(cur.take(1), Some(&bytes[2..]));
    }

    #[test]
    fn cursor_take_uint_is_big_endian() {
        let bytes = [0x01u8, 0x00, 0x05];
        let mut cur = Cursor::new(&bytes);
        assert_eq!(cur.take_uint(3), Some(0x010005));
    }

    #[test]
    fn empty_calldata_reports_missing_header() {
        let (parsed, errors) = decode_calldata(&[], HeaderMode::BlockNumber);
        assert_eq!(parsed.header, None);
        assert_eq!(
            errors,
            vec![DecodeError::UnexpectedEnd {
                field: "block number",
                offset: 0
            }]
        );
    }

    #[test]
    fn bogus_stride_stops_the_feed_walk() {
        // header + counts claiming one feed, then a record with stride 200.
        let mut calldata = vec![0u8; 8];
        calldata.extend_from_slice(&[0, 0, 0, 1, 0, 0, 0, 0]);
        calldata.extend_from_slice(&[0u8; 16]); // feed id 0
        calldata.push(200);

        let (parsed, errors) = decode_calldata(&calldata, HeaderMode::BlockNumber);
        assert!(parsed.feeds.is_empty());
        assert_eq!(
            errors,
            vec![DecodeError::StrideOutOfRange {
                feed_id: 0,
                stride: 200
            }]
        );
    }

    #[test]
    fn out_of_range_index_is_reported_but_record_kept() {
        let mut calldata = vec![0u8; 8];
        calldata.extend_from_slice(&[0, 0, 0, 1, 0, 0, 0, 0]);
        calldata.extend_from_slice(&[0u8; 15]);
        calldata.push(9); // feed id 9
        calldata.push(0); // stride 0
        calldata.extend_from_slice(&0x3fffu16.to_be_bytes()); // 16383 >= capacity
        calldata.extend_from_slice(&[0u8; 32]);

        let (parsed, errors) = decode_calldata(&calldata, HeaderMode::BlockNumber);
        assert_eq!(parsed.feeds.len(), 1);
        assert_eq!(
            errors,
            vec![DecodeError::IndexOutOfRange {
                feed_id: 9,
                index: 0x3fff
            }]
        );
    }

    #[test]
    fn trailing_bytes_are_flagged() {
        let mut calldata = vec![0u8; 8];
        calldata.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0]);
        calldata.extend_from_slice(&[0xde, 0xad]);

        let (parsed, errors) = decode_calldata(&calldata, HeaderMode::BlockNumber);
        assert!(parsed.feeds.is_empty());
        assert_eq!(errors, vec![DecodeError::TrailingBytes(2)]);
    }
}
