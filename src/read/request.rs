//! Builds read requests for the store's single-byte-selector surface.
//!
//! A request is `[opcode][feed_id u128]` followed by the fields the opcode
//! admits: a 2-byte historical index and/or a `[start_slot u32][slots u32]`
//! sub-range. [`ReadRequest`]'s variants carry exactly the fields of their
//! opcode, so a caller cannot pass a field the operation does not expect.

use crate::error::CodecError;
use crate::types::{FEED_ID_WIDTH, INDEX_WIDTH};
use crate::words::{pack_big_endian, PackItem};

const START_SLOT_WIDTH: usize = 4;
const SLOTS_WIDTH: usize = 4;

/// The six read operations and their selector bytes. The high bit is set on
/// all of them; the store dispatches on it instead of an ABI selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReadOp {
    LatestIndex = 0x81,
    LatestSingleData = 0x82,
    LatestSingleDataAndIndex = 0x83,
    LatestData = 0x84,
    LatestDataAndIndex = 0x85,
    DataAtIndex = 0x86,
}

/// An optional byte-slot sub-range of a multi-word payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRange {
    pub start_slot: u32,
    /// Number of 32-byte slots to read; 0 means "through the end".
    pub slots: u32,
}

/// A fully parameterized read request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadRequest {
    /// Latest ring buffer index of a feed.
    LatestIndex { feed_id: u128 },
    /// Latest single-slot data.
    LatestSingleData { feed_id: u128 },
    /// Latest single-slot data together with its index.
    LatestSingleDataAndIndex { feed_id: u128 },
    /// Latest multi-slot data, optionally restricted to a sub-range.
    LatestData {
        feed_id: u128,
        range: Option<SlotRange>,
    },
    /// Latest multi-slot data and its index, optionally a sub-range.
    LatestDataAndIndex {
        feed_id: u128,
        range: Option<SlotRange>,
    },
    /// Data at a historical ring buffer index, optionally a sub-range.
    DataAtIndex {
        feed_id: u128,
        index: u16,
        range: Option<SlotRange>,
    },
}

impl ReadRequest {
    /// The selector this request is dispatched on.
    pub fn op(&self) -> ReadOp {
        match self {
            ReadRequest::LatestIndex { .. } => ReadOp::LatestIndex,
            ReadRequest::LatestSingleData { .. } => ReadOp::LatestSingleData,
            ReadRequest::LatestSingleDataAndIndex { .. } => ReadOp::LatestSingleDataAndIndex,
            ReadRequest::LatestData { .. } => ReadOp::LatestData,
            ReadRequest::LatestDataAndIndex { .. } => ReadOp::LatestDataAndIndex,
            ReadRequest::DataAtIndex { .. } => ReadOp::DataAtIndex,
        }
    }

    pub fn feed_id(&self) -> u128 {
        match *self {
            ReadRequest::LatestIndex { feed_id }
            | ReadRequest::LatestSingleData { feed_id }
            | ReadRequest::LatestSingleDataAndIndex { feed_id }
            | ReadRequest::LatestData { feed_id, .. }
            | ReadRequest::LatestDataAndIndex { feed_id, .. }
            | ReadRequest::DataAtIndex { feed_id, .. } => feed_id,
        }
    }

    /// Serializes the request into contract-call payload bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut items = vec![
            PackItem::Uint {
                value: u128::from(self.op() as u8),
                width: 1,
            },
            PackItem::Uint {
                value: self.feed_id(),
                width: FEED_ID_WIDTH,
            },
        ];

        if let ReadRequest::DataAtIndex { index, .. } = *self {
            items.push(PackItem::Uint {
                value: u128::from(index),
                width: INDEX_WIDTH,
            });
        }

        let range = match *self {
            ReadRequest::LatestData { range, .. }
            | ReadRequest::LatestDataAndIndex { range, .. }
            | ReadRequest::DataAtIndex { range, .. } => range,
            _ => None,
        };
        if let Some(SlotRange { start_slot, slots }) = range {
            items.push(PackItem::Uint {
                value: u128::from(start_slot),
                width: START_SLOT_WIDTH,
            });
            items.push(PackItem::Uint {
                value: u128::from(slots),
                width: SLOTS_WIDTH,
            });
        }

        pack_big_endian(&items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_single_data_request_for_feed_731() {
        let req = ReadRequest::LatestSingleData { feed_id: 731 };
        let bytes = req.to_bytes().unwrap();

        assert_eq!(bytes.len(), 17);
        assert_eq!(bytes[0], 0x82);
        let mut expected_id = [0u8; 16];
        expected_id[14..].copy_from_slice(&731u16.to_be_bytes());
        assert_eq!(&bytes[1..], &expected_id);
    }

    #[test]
    fn historical_request_carries_the_index() {
        let req = ReadRequest::DataAtIndex {
            feed_id: 1,
            index: 42,
            range: None,
        };
        let bytes = req.to_bytes().unwrap();

        assert_eq!(bytes.len(), 19);
        assert_eq!(bytes[0], 0x86);
        assert_eq!(&bytes[17..], &[0, 42]);
    }

    #[test]
    fn slot_range_appends_start_and_count() {
        let req = ReadRequest::LatestData {
            feed_id: 1,
            range: Some(SlotRange {
                start_slot: 2,
                slots: 3,
            }),
        };
        let bytes = req.to_bytes().unwrap();

        assert_eq!(bytes.len(), 25);
        assert_eq!(bytes[0], 0x84);
        assert_eq!(&bytes[17..21], &[0, 0, 0, 2]);
        assert_eq!(&bytes[21..25], &[0, 0, 0, 3]);
    }

    #[test]
    fn historical_request_with_range_orders_index_first() {
        let req = ReadRequest::DataAtIndex {
            feed_id: 7,
            index: 5,
            range: Some(SlotRange {
                start_slot: 0,
                slots: 1,
            }),
        };
        let bytes = req.to_bytes().unwrap();

        assert_eq!(bytes.len(), 27);
        assert_eq!(&bytes[17..19], &[0, 5]);
        assert_eq!(&bytes[19..23], &[0, 0, 0, 0]);
        assert_eq!(&bytes[23..27], &[0, 0, 0, 1]);
    }

    #[test]
    fn selector_bytes_match_the_store_dispatch_table() {
        assert_eq!(ReadOp::LatestIndex as u8, 0x81);
        assert_eq!(ReadOp::LatestSingleData as u8, 0x82);
        assert_eq!(ReadOp::LatestSingleDataAndIndex as u8, 0x83);
        assert_eq!(ReadOp::LatestData as u8, 0x84);
        assert_eq!(ReadOp::LatestDataAndIndex as u8, 0x85);
        assert_eq!(ReadOp::DataAtIndex as u8, 0x86);
    }
}
