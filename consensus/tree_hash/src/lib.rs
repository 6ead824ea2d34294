//! Canonical `hash_tree_root` per spec.md §4.2: "The root of an entity is the
//! 32-byte hash of its canonical serialization; equality of roots implies
//! structural equality."
//!
//! Unlike later Ethereum beacon chains, `spec.md`'s wire format is a flat
//! field-order SSZ concatenation rather than a full Merkle tree over typed
//! chunks. `hash_tree_root` therefore reduces to "serialize, then hash" for
//! every type in this spec's data model; the `merkleize` helper below exists
//! for variable-length sequences, whose root is the hash of the concatenation
//! of each element's own root rather than of raw bytes (this is what lets
//! `Vec<ValidatorRecord>` produce a stable root without re-hashing every
//! validator's fields into one another).

use eth2_hashing::hash;
use ethereum_types::H256;

pub const HASHSIZE: usize = 32;

pub trait TreeHash {
    /// Returns the 32-byte canonical root of `self`.
    fn tree_hash_root(&self) -> Vec<u8>;
}

macro_rules! impl_tree_hash_for_int {
    ($typ:ty) => {
        impl TreeHash for $typ {
            fn tree_hash_root(&self) -> Vec<u8> {
                let mut bytes = vec![0; HASHSIZE];
                let be = self.to_be_bytes();
                bytes[HASHSIZE - be.len()..].copy_from_slice(&be);
                bytes
            }
        }
    };
}

impl_tree_hash_for_int!(u8);
impl_tree_hash_for_int!(u16);
impl_tree_hash_for_int!(u32);
impl_tree_hash_for_int!(u64);

impl TreeHash for bool {
    fn tree_hash_root(&self) -> Vec<u8> {
        (*self as u8).tree_hash_root()
    }
}

impl TreeHash for H256 {
    fn tree_hash_root(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl TreeHash for Vec<u8> {
    fn tree_hash_root(&self) -> Vec<u8> {
        if self.len() == HASHSIZE {
            self.clone()
        } else {
            hash(self)
        }
    }
}

impl<T: TreeHash> TreeHash for Vec<T> {
    fn tree_hash_root(&self) -> Vec<u8> {
        merkleize(self.iter().map(TreeHash::tree_hash_root).collect())
    }
}

impl<T: TreeHash> TreeHash for Option<T> {
    fn tree_hash_root(&self) -> Vec<u8> {
        match self {
            Some(inner) => inner.tree_hash_root(),
            None => vec![0; HASHSIZE],
        }
    }
}

/// Reduces a list of 32-byte chunks to a single root by pairwise hashing, padding
/// the final odd chunk with a zero chunk. An empty list roots to the zero hash.
pub fn merkleize(mut chunks: Vec<Vec<u8>>) -> Vec<u8> {
    if chunks.is_empty() {
        return vec![0; HASHSIZE];
    }

    while chunks.len() > 1 {
        if chunks.len() % 2 == 1 {
            chunks.push(vec![0; HASHSIZE]);
        }
        chunks = chunks
            .chunks(2)
            .map(|pair| hash(&[pair[0].clone(), pair[1].clone()].concat()))
            .collect();
    }

    chunks.remove(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_roots_are_distinct() {
        assert_ne!(1_u64.tree_hash_root(), 2_u64.tree_hash_root());
    }

    #[test]
    fn test_int_root_is_left_padded() {
        let root = 1_u64.tree_hash_root();
        assert_eq!(root.len(), HASHSIZE);
        assert_eq!(&root[HASHSIZE - 8..], &1_u64.to_be_bytes()[..]);
        assert!(root[..HASHSIZE - 8].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_merkleize_empty_is_zero_hash() {
        assert_eq!(merkleize(vec![]), vec![0; HASHSIZE]);
    }

    #[test]
    fn test_merkleize_single_chunk_is_itself() {
        let chunk = vec![7; HASHSIZE];
        assert_eq!(merkleize(vec![chunk.clone()]), chunk);
    }

    #[test]
    fn test_vec_root_stable_across_calls() {
        let v: Vec<u64> = vec![1, 2, 3];
        assert_eq!(v.tree_hash_root(), v.tree_hash_root());
    }

    #[test]
    fn test_vec_root_differs_from_element_order() {
        let a: Vec<u64> = vec![1, 2, 3];
        let b: Vec<u64> = vec![3, 2, 1];
        assert_ne!(a.tree_hash_root(), b.tree_hash_root());
    }
}
