use bls::{Keypair, PublicKey, SecretKey};
use eth2_interop_keypairs::keypair;

/// Generates `validator_count` keypairs whose secret key is derived solely
/// from the validator's index, per the teacher's own
/// `generate_deterministic_keypairs`. Sequential (no `rayon`, unlike the
/// teacher): this crate does not carry a data-parallelism dependency, and
/// genesis-sized validator sets are small enough that it doesn't matter.
pub fn generate_deterministic_keypairs(validator_count: usize) -> Vec<Keypair> {
    (0..validator_count)
        .map(generate_deterministic_keypair)
        .collect()
}

/// Generates a single deterministic keypair. Test fixtures only — the
/// secret key is a function of `validator_index`, never use this outside
/// tests.
pub fn generate_deterministic_keypair(validator_index: usize) -> Keypair {
    let raw = keypair(validator_index);
    Keypair::from_components(SecretKey::from_raw(raw.sk), PublicKey::from_raw(raw.pk))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_deterministic() {
        let a = generate_deterministic_keypair(3);
        let b = generate_deterministic_keypair(3);
        assert_eq!(a.pk.as_bytes(), b.pk.as_bytes());
    }

    #[test]
    fn test_generate_many() {
        let keypairs = generate_deterministic_keypairs(8);
        assert_eq!(keypairs.len(), 8);
    }
}
