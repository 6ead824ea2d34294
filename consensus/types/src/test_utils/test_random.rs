use ethereum_types::H256;
use rand::RngCore;

/// Produces an arbitrary-but-reproducible value for test fixtures, given an
/// `Rng`. Hand-rolled rather than derived: this crate's SSZ/TreeHash impls
/// are hand-rolled too (see lib.rs), and `test_random_derive` (sampled
/// alongside the teacher) is a proc-macro crate this workspace does not
/// carry — implemented only for the handful of primitives test fixtures
/// actually need.
pub trait TestRandom: Sized {
    fn random_for_test(rng: &mut impl RngCore) -> Self;
}

impl TestRandom for u64 {
    fn random_for_test(rng: &mut impl RngCore) -> Self {
        rng.next_u64()
    }
}

impl TestRandom for H256 {
    fn random_for_test(rng: &mut impl RngCore) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        H256::from(bytes)
    }
}

impl TestRandom for crate::Bitfield {
    fn random_for_test(rng: &mut impl RngCore) -> Self {
        let mut bytes = [0u8; 8];
        rng.fill_bytes(&mut bytes);
        crate::Bitfield::from_bytes(bytes.to_vec(), 64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_h256_random_for_test_is_seed_deterministic() {
        let mut a = rand::rngs::StdRng::seed_from_u64(1);
        let mut b = rand::rngs::StdRng::seed_from_u64(1);
        assert_eq!(H256::random_for_test(&mut a), H256::random_for_test(&mut b));
    }
}
