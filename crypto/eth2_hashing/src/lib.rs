//! A single source of hash function types and implementations so the rest of the
//! workspace never imports a digest crate directly.
//!
//! The beacon chain hashes almost everything with SHA-256: canonical roots (§4.2),
//! the shuffle's re-hashed seed (§4.1), and the RANDAO layer function (§4.5). Keeping
//! the call site behind one function means swapping the underlying implementation
//! (`ring` here, matching the wasm target's `sha2` fallback) never touches consensus
//! code.

#[cfg(feature = "zero_hash_cache")]
#[macro_use]
extern crate lazy_static;

use ring::digest::{digest, SHA256};

/// Length in bytes of a SHA-256 digest, and therefore of every root in this crate.
pub const HASH_LEN: usize = 32;

/// Hash `input` with SHA-256, returning a newly allocated 32-byte digest.
pub fn hash(input: &[u8]) -> Vec<u8> {
    digest(&SHA256, input).as_ref().to_vec()
}

/// Hash the concatenation of `a ++ b` without an intermediate allocation for the
/// concatenated buffer beyond what `ring` itself requires.
pub fn hash_concat(a: &[u8], b: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(a.len() + b.len());
    buf.extend_from_slice(a);
    buf.extend_from_slice(b);
    hash(&buf)
}

/// Hash `input` into a fixed-size 32 byte array, for call sites that want to avoid a
/// `Vec` (e.g. writing directly into a ring buffer slot).
pub fn hash_fixed(input: &[u8]) -> [u8; HASH_LEN] {
    let mut out = [0; HASH_LEN];
    out.copy_from_slice(&hash(input));
    out
}

#[cfg(feature = "zero_hash_cache")]
lazy_static! {
    /// Cached hash_tree_root of a zero-filled Merkle subtree at each depth, indexed by
    /// depth. Index 0 is `ZERO_HASH32`. Saves re-hashing the same zeroed subtrees
    /// across every call to the `tree_hash` crate's `merkleize` helper.
    pub static ref ZERO_HASHES: Vec<Vec<u8>> = {
        let mut hashes = vec![vec![0; HASH_LEN]; 1];

        for i in 1..64 {
            let previous = &hashes[i - 1];
            hashes.push(hash_concat(previous, previous));
        }

        hashes
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hex::ToHex;

    #[test]
    fn test_hash() {
        let digest = hash(&[]);
        assert_eq!(digest.len(), HASH_LEN);
        assert_eq!(
            digest.to_hex::<String>(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_hash_fixed() {
        let a = hash(b"hello");
        let b = hash_fixed(b"hello");
        assert_eq!(a.as_slice(), &b[..]);
    }

    #[test]
    fn test_hash_concat_matches_manual_concat() {
        let a = b"foo";
        let b = b"bar";
        let manual = hash(b"foobar");
        assert_eq!(hash_concat(a, b), manual);
    }

    #[cfg(feature = "zero_hash_cache")]
    #[test]
    fn test_zero_hashes_consistent() {
        assert_eq!(ZERO_HASHES[0], vec![0; HASH_LEN]);
        assert_eq!(ZERO_HASHES[1], hash_concat(&ZERO_HASHES[0], &ZERO_HASHES[0]));
    }
}
