//! The write path: serializing a batch into the exact byte layout expected by
//! the store's update entry point, and reconstructing batches from observed
//! calldata for auditing.
//!
//! The two directions deliberately disagree about failure. [`encoder`] fails
//! fast before emitting a single byte; [`decoder`] never fails, reporting
//! anomalies alongside whatever structure it managed to recover.

pub mod decoder;
pub mod encoder;


pub use decoder::decode_calldata;
pub use encoder::{encode_batch, encode_batch_words, EncodedWords};
