//! The read path: building single-byte-selector requests against the store's
//! read surface and parsing the raw response bytes it returns.
//!
//! Independent of the write path; requests and results are ephemeral values,
//! never persisted.

pub mod request;
pub mod response;

pub use request::{ReadOp, ReadRequest, SlotRange};
pub use response::{parse_response, ReadResult};
