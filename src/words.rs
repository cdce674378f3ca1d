//! This module contains the pure, stateless kernels for packing fixed-width
//! big-endian integers and byte strings into flat buffers, and for splitting
//! buffers back into fixed-size storage words.
//!
//! It is the leaf dependency of the write-path encoder and the read-path
//! codec. All functions are panic-free: a value that does not fit its
//! declared width is a [`CodecError`], never a truncation.

use num_traits::{PrimInt, Unsigned};

use crate::error::CodecError;
use crate::types::WORD_SIZE;

//==================================================================================
// 1. Public API for Fixed-Width Packing
//==================================================================================

/// One item of a packed encoding: either an unsigned integer written as
/// exactly `width` big-endian bytes, or a byte string copied verbatim.
#[derive(Debug, Clone, Copy)]
pub enum PackItem<'a> {
    Uint { value: u128, width: usize },
    Bytes(&'a [u8]),
}

/// Appends `value` to `buf` as exactly `width` big-endian bytes.
///
/// This is the primary single-value packing function, generic over the
/// unsigned primitive integers.
pub fn put_uint<T>(buf: &mut Vec<u8>, value: T, width: usize) -> Result<(), CodecError>
where
    T: PrimInt + Unsigned,
{
    // PrimInt guarantees a lossless widening into u128 for every unsigned
    // primitive, so the None arm is unreachable in practice.
    let value = value
        .to_u128()
        .ok_or(CodecError::ValueTooWide(u128::MAX, width))?;

    if width < 16 && value >= 1u128 << (width * 8) {
        return Err(CodecError::ValueTooWide(value, width));
    }

    let be = value.to_be_bytes();
    if width <= be.len() {
        buf.extend_from_slice(&be[be.len() - width..]);
    } else {
        // Widths beyond 16 bytes are zero-extended on the left.
        buf.extend(std::iter::repeat(0u8).take(width - be.len()));
        buf.extend_from_slice(&be);
    }
    Ok(())
}

/// Concatenates each item as a fixed-width big-endian integer or raw byte
/// string, failing before any partial output if a value exceeds its width.
pub fn pack_big_endian(items: &[PackItem]) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    for item in items {
        match *item {
            PackItem::Uint { value, width } => put_uint(&mut buf, value, width)?,
            PackItem::Bytes(bytes) => buf.extend_from_slice(bytes),
        }
    }
    Ok(buf)
}

//==================================================================================
// 2. Public API for Word Splitting
//==================================================================================

/// Partitions a byte buffer into chunks of `word_size` bytes. The final
/// partial chunk, if any, is emitted unpadded.
pub fn split_into_words(bytes: &[u8], word_size: usize) -> Vec<Vec<u8>> {
    if word_size == 0 {
        return Vec::new();
    }
    bytes.chunks(word_size).map(<[u8]>::to_vec).collect()
}

/// Splits into the canonical 32-byte storage words.
pub fn split_into_32b_words(bytes: &[u8]) -> Vec<Vec<u8>> {
    split_into_words(bytes, WORD_SIZE)
}

//==================================================================================
// 3. Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_uint_emits_fixed_width_big_endian() {
        let mut buf = Vec::new();
        put_uint(&mut buf, 731u128, 16).unwrap();
        assert_eq!(buf.len(), 16);
        assert_eq!(&buf[14..], &[0x02, 0xdb]);
        assert!(buf[..14].iter().all(|&b| b == 0));
    }

    #[test]
    fn put_uint_rejects_value_wider_than_declared() {
        let mut buf = Vec::new();
        let err = put_uint(&mut buf, 0x1_00u64, 1).unwrap_err();
        assert_eq!(err, CodecError::ValueTooWide(0x100, 1));
        assert!(buf.is_empty());
    }

    #[test]
    fn put_uint_accepts_exact_boundary() {
        let mut buf = Vec::new();
        put_uint(&mut buf, 0xffffu32, 2).unwrap();
        assert_eq!(buf, vec![0xff, 0xff]);
    }

    #[test]
    fn pack_big_endian_concatenates_mixed_items() {
        let packed = pack_big_endian(&[
            PackItem::Uint { value: 0x82, width: 1 },
            PackItem::Uint { value: 5, width: 2 },
            PackItem::Bytes(&[0xaa, 0xbb]),
        ])
        .unwrap();
        assert_eq!(packed, vec![0x82, 0x00, 0x05, 0xaa, 0xbb]);
    }

    #[test]
    fn split_exact_multiple_is_stable() {
        let bytes: Vec<u8> = (0..96).collect();
        let words = split_into_32b_words(&bytes);
        assert_eq!(words.len(), 3);
        assert!(words.iter().all(|w| w.len() == 32));
        let rejoined: Vec<u8> = words.concat();
        assert_eq!(rejoined, bytes);
    }

    #[test]
    fn split_emits_final_partial_chunk_unpadded() {
        let bytes = vec![1u8; 40];
        let words = split_into_32b_words(&bytes);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].len(), 32);
        assert_eq!(words[1].len(), 8);
    }

    #[test]
    fn split_of_packed_round_trips() {
        let packed = pack_big_endian(&[
            PackItem::Uint { value: 100, width: 8 },
            PackItem::Bytes(&[0u8; 24]),
            PackItem::Bytes(&[7u8; 32]),
        ])
        .unwrap();
        let words = split_into_32b_words(&packed);
        assert_eq!(words.len(), packed.len() / 32);
        assert_eq!(words.concat(), packed);
    }
}
