//! Parses the raw bytes returned by the store's read surface.
//!
//! For single-word operations the whole buffer is the result. Multi-word
//! payloads are split into 32-byte storage words. "And index" operations
//! prefix the payload with one word holding the ring buffer index; the
//! remainder is parsed by the rule of the corresponding non-indexed
//! operation.
//!
//! An empty response is the one fatal condition on this side: it means the
//! call target does not implement the read surface at all, as opposed to
//! returning malformed data.

use crate::error::CodecError;
use crate::read::request::ReadOp;
use crate::types::WORD_SIZE;
use crate::words::split_into_32b_words;

/// The parsed form of a read response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadResult {
    /// A ring buffer index on its own.
    Index(u64),
    /// One data word, returned unchanged.
    Single(Vec<u8>),
    /// A multi-slot payload split into 32-byte words.
    Multi(Vec<Vec<u8>>),
    SingleWithIndex { index: u64, data: Vec<u8> },
    MultiWithIndex { index: u64, data: Vec<Vec<u8>> },
}

/// Reads the index word prefix: the low 8 bytes of a 32-byte big-endian
/// word. Short prefixes still parse; the ring index is tiny.
fn parse_index_word(word: &[u8]) -> u64 {
    let mut index = 0u64;
    let tail = if word.len() > 8 {
        &word[word.len() - 8..]
    } else {
        word
    };
    for &b in tail {
        index = (index << 8) | u64::from(b);
    }
    index
}

/// Parses `raw` according to the operation that produced it.
pub fn parse_response(op: ReadOp, raw: &[u8]) -> Result<ReadResult, CodecError> {
    if raw.is_empty() {
        return Err(CodecError::EmptyResponse);
    }

    let result = match op {
        ReadOp::LatestIndex => ReadResult::Index(parse_index_word(raw)),
        ReadOp::LatestSingleData => ReadResult::Single(raw.to_vec()),
        ReadOp::LatestData | ReadOp::DataAtIndex => {
            ReadResult::Multi(split_into_32b_words(raw))
        }
        ReadOp::LatestSingleDataAndIndex => {
            let (prefix, data) = raw.split_at(WORD_SIZE.min(raw.len()));
            ReadResult::SingleWithIndex {
                index: parse_index_word(prefix),
                data: data.to_vec(),
            }
        }
        ReadOp::LatestDataAndIndex => {
            let (prefix, data) = raw.split_at(WORD_SIZE.min(raw.len()));
            ReadResult::MultiWithIndex {
                index: parse_index_word(prefix),
                data: split_into_32b_words(data),
            }
        }
    };
    Ok(result)
}
