// In: src/error.rs

//! This module defines the error types for the ADFS codec.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Two disjoint philosophies by direction:
//! - The write path fails fast with [`CodecError`] before any bytes are emitted,
//!   because the caller can still fix its input before spending a transaction.
//! - The decode path never fails. It accumulates [`DecodeError`] records while a
//!   best-effort structure is still produced, because the input is historical,
//!   immutable and possibly adversarial.

use thiserror::Error;

/// Fail-fast errors raised by the write-path encoder, the packing kernel and
/// the read-result parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("value {0:#x} does not fit into {1} bytes")]
    ValueTooWide(u128, usize),

    #[error("feed {feed_id} data is {got} bytes, stride {stride} requires {expected}")]
    DataLengthMismatch {
        feed_id: u128,
        stride: u8,
        expected: usize,
        got: usize,
    },

    #[error("stride {stride} exceeds the maximum of {max} for feed {feed_id}")]
    StrideTooLarge { feed_id: u128, stride: u8, max: u8 },

    #[error("ring buffer index {index} out of range for feed {feed_id}")]
    IndexOutOfRange { feed_id: u128, index: u64 },

    #[error("feed id {0} does not fit in the ring buffer table addressing scheme")]
    FeedIdTooLarge(u128),

    #[error("empty response from the read surface (wrong target or selector?)")]
    EmptyResponse,
}

/// A single anomaly observed while decoding write-path calldata.
///
/// These are accumulated in a list next to the partially reconstructed batch
/// rather than returned as `Err`; the decoder's consumers are auditing
/// already-finalized transactions and need to see what was wrong, not just
/// that something was wrong.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("calldata ends at byte {offset} while reading {field}")]
    UnexpectedEnd { field: &'static str, offset: usize },

    #[error("invalid stride {stride} for feed {feed_id}")]
    StrideOutOfRange { feed_id: u128, stride: u8 },

    #[error("invalid ring buffer index {index} for feed {feed_id}")]
    IndexOutOfRange { feed_id: u128, index: u64 },

    #[error("invalid ring buffer table index {index} for slot key {slot_key:#x}")]
    TableIndexOutOfRange { slot_key: u128, index: u64 },

    #[error("{0} trailing bytes after the ring buffer table")]
    TrailingBytes(usize),
}
