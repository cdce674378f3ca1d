//! This file is the root of the `adfs_codec` Rust crate.
//!
//! The crate implements the calldata codec for the Aggregated Data Feed Store
//! (ADFS): a compact binary wire format that packs many independent,
//! variable-size price-feed updates into a single transaction payload,
//! addressed through single-byte operation selectors instead of ABI-encoded
//! calls.
//!
//! Built bottom-up:
//! 1. [`words`]: pack fixed-width big-endian fields, split buffers into
//!    32-byte storage words.
//! 2. [`batcher`]: group pending updates into capacity-bounded batches.
//! 3. [`write`]: encode a batch into update-entry-point calldata and decode
//!    observed calldata back, reporting per-field errors instead of aborting.
//! 4. [`read`]: build selector-based read requests and parse their responses.
//!
//! Everything here is a pure, synchronous transformation over immutable
//! inputs. Transaction submission, event observation and RPC transport are
//! external collaborators.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod batcher;
pub mod error;
pub mod read;
pub mod types;
pub mod words;
pub mod write;

//==================================================================================
// 2. Public API Surface
//==================================================================================
pub use batcher::{batch_feeds, build_ring_buffer_table, RoundCounters};
pub use error::{CodecError, DecodeError};
pub use read::{parse_response, ReadOp, ReadRequest, ReadResult, SlotRange};
pub use types::{
    Batch, BatchHeader, Feed, HeaderMode, ParsedBatch, RingBufferTableEntry, MAX_STRIDE,
    RING_CAPACITY, WORD_SIZE,
};
pub use write::{decode_calldata, encode_batch, encode_batch_words, EncodedWords};
