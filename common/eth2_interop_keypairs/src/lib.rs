//! Deterministic BLS keypair derivation for interop/test networks, used by
//! the genesis builder's deterministic validator set (spec.md §4.4) and by
//! `types::test_utils`. No sampled source was available for this crate in
//! the retrieved pack (its Cargo.toml carries the real crate's dependency
//! list, but no `src/`), so the derivation below is written from general
//! BLS12-381/Eth2 interop-network conventions rather than copied from a
//! teacher file — see DESIGN.md.

use eth2_hashing::hash;
use lazy_static::lazy_static;
use milagro_bls::{PublicKey as RawPublicKey, SecretKey as RawSecretKey};
use num_bigint::BigUint;

/// The order `r` of the BLS12-381 scalar field, i.e. the group order of G1/G2.
const CURVE_ORDER_HEX: &str =
    "73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001";

lazy_static! {
    static ref CURVE_ORDER: BigUint =
        BigUint::parse_bytes(CURVE_ORDER_HEX.as_bytes(), 16).expect("curve order is valid hex");
}

/// Derives the secret key scalar for interop validator `index`: SHA-256 of
/// the index's little-endian bytes, reduced modulo the curve order and
/// left-padded to 32 bytes. Deterministic and index-ordered, so two networks
/// seeded with the same range of indices always agree on the same keys.
fn secret_key_bytes(index: usize) -> [u8; 32] {
    let digest = hash(&index.to_le_bytes());
    let scalar = BigUint::from_bytes_le(&digest) % &*CURVE_ORDER;

    let mut out = [0u8; 32];
    let be = scalar.to_bytes_be();
    out[32 - be.len()..].copy_from_slice(&be);
    out
}

/// A raw milagro keypair, returned so callers (e.g. `bls::Keypair`, via
/// `PublicKey::from_raw`/`SecretKey::from_raw`) can wrap it without this
/// crate depending on the `bls` crate itself.
pub struct RawKeypair {
    pub sk: RawSecretKey,
    pub pk: RawPublicKey,
}

/// Returns the interop keypair for validator `index`.
pub fn keypair(index: usize) -> RawKeypair {
    let sk_bytes = secret_key_bytes(index);
    let sk = RawSecretKey::from_bytes(&sk_bytes).expect("reduced scalar is a valid secret key");
    let pk = RawPublicKey::from_secret_key(&sk);
    RawKeypair { sk, pk }
}

/// Returns `count` interop keypairs starting at index 0, in index order.
pub fn keypairs(count: usize) -> Vec<RawKeypair> {
    (0..count).map(keypair).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let a = keypair(0);
        let b = keypair(0);
        assert_eq!(a.sk.as_bytes(), b.sk.as_bytes());
        assert_eq!(a.pk.as_bytes(), b.pk.as_bytes());
    }

    #[test]
    fn test_distinct_indices_differ() {
        let a = keypair(0);
        let b = keypair(1);
        assert_ne!(a.sk.as_bytes(), b.sk.as_bytes());
    }

    #[test]
    fn test_keypairs_are_index_ordered() {
        let pairs = keypairs(4);
        assert_eq!(pairs.len(), 4);
        for (i, pair) in pairs.iter().enumerate() {
            assert_eq!(pair.sk.as_bytes(), keypair(i).sk.as_bytes());
        }
    }
}
