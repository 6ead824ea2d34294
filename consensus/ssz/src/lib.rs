//! Canonical serialization, per spec.md §4.2 and §6 "Wire format":
//!
//! > Canonical serialization is field-order concatenation of fixed-width
//! > big-endian integers and fixed-width byte strings, with variable-length
//! > sequences prefixed by a 32-bit big-endian length.
//!
//! This is also the byte string hashed to produce an entity's root (§4.2), so
//! `Encodable`/`Decodable` and `tree_hash::TreeHash` must always agree on field
//! order for a given type.
//!
//! The derive-macro convenience the teacher later grew (`eth2_ssz_derive`) is
//! deliberately not reproduced here: every type in `consensus/types` hand-rolls
//! its `Encodable`/`Decodable` impl, the way the teacher's own early types (e.g.
//! the sampled `Deposit`) did before the derive macro existed.

mod decode;
mod encode;

pub use decode::{DecodeError, Decodable};
pub use encode::{Encodable, SszStream};

pub const LENGTH_BYTES: usize = 4;
pub const MAX_LIST_SIZE: usize = 1 << (4 * 8);

/// Convenience function to SSZ-encode a single value.
pub fn ssz_encode<T: Encodable>(val: &T) -> Vec<u8> {
    let mut stream = SszStream::new();
    stream.append(val);
    stream.drain()
}

/// Convenience function to SSZ-decode a single value starting at byte 0, asserting
/// that the entire buffer was consumed.
pub fn ssz_decode<T: Decodable>(bytes: &[u8]) -> Result<T, DecodeError> {
    let (value, index) = T::ssz_decode(bytes, 0)?;
    if index != bytes.len() {
        return Err(DecodeError::TooLong);
    }
    Ok(value)
}
