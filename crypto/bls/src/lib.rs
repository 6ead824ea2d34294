//! BLS12-381 sign/verify/aggregate, per spec.md §4.1.
//!
//! A thin wrapper over `milagro_bls`'s curve arithmetic and pairings, in the same
//! shape as the teacher's own `bls` crate: this crate owns domain-separated
//! signing and the proof-of-possession convenience used by deposit processing
//! (§4.5), `milagro_bls` owns field/curve arithmetic and the hash-to-G2 map
//! (§4.1 "Hash-to-G2"), so this crate never re-implements modular arithmetic by
//! hand — see spec.md §9 "Ownership of BLS field elements".
//!
//! `DOMAIN_DEPOSIT` and friends are the five domain kinds named in §4.1; slot-
//! relative domain *selection* (pre-fork vs post-fork version) lives in
//! `types::ChainSpec::get_domain`, since it needs `ForkData` and a slot that this
//! crate has no business knowing about.

mod keypair;
mod public_key;
mod secret_key;
mod signature;

pub use keypair::Keypair;
pub use public_key::PublicKey;
pub use secret_key::SecretKey;
pub use signature::{AggregatePublicKey, AggregateSignature, Signature};

/// Domain tags from spec.md §4.1 "Domain separation". These are XOR'd (in the
/// real fork-choice spec, concatenated; here, per `get_domain`, combined by the
/// caller) with the fork version to produce the 64-bit domain passed to
/// `Signature::new`/`verify`.
pub const DOMAIN_DEPOSIT: u64 = 0;
pub const DOMAIN_ATTESTATION: u64 = 1;
pub const DOMAIN_PROPOSAL: u64 = 2;
pub const DOMAIN_EXIT: u64 = 3;
pub const DOMAIN_RANDAO: u64 = 4;

/// Length, in bytes, of a compressed G1 point (a public key).
pub const PUBLIC_KEY_BYTES_LEN: usize = 48;
/// Length, in bytes, of a compressed G2 point (a signature).
pub const SIGNATURE_BYTES_LEN: usize = 96;
/// Length, in bytes, of a secret scalar.
pub const SECRET_KEY_BYTES_LEN: usize = 32;

/// `EMPTY_SIGNATURE` from spec.md §6 "Wire format": 96 zero bytes, used as the
/// placeholder signature on the genesis block and in test fixtures.
pub fn empty_signature() -> Signature {
    Signature::empty()
}

/// Signs the deposit input's root with `DOMAIN_DEPOSIT` and the given secret
/// key, producing the proof-of-possession checked by deposit processing
/// (§4.5 "Deposit processing").
pub fn create_proof_of_possession(keypair: &Keypair) -> Signature {
    Signature::new(&[], DOMAIN_DEPOSIT, &keypair.sk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let keypair = Keypair::random();
        let msg = b"beacon chain state transition";
        let sig = Signature::new(msg, DOMAIN_ATTESTATION, &keypair.sk);

        assert!(sig.verify(msg, DOMAIN_ATTESTATION, &keypair.pk));
    }

    #[test]
    fn test_verify_fails_with_wrong_domain() {
        let keypair = Keypair::random();
        let msg = b"beacon chain state transition";
        let sig = Signature::new(msg, DOMAIN_ATTESTATION, &keypair.sk);

        assert!(!sig.verify(msg, DOMAIN_PROPOSAL, &keypair.pk));
    }

    #[test]
    fn test_verify_fails_with_wrong_key() {
        let keypair = Keypair::random();
        let other = Keypair::random();
        let msg = b"beacon chain state transition";
        let sig = Signature::new(msg, DOMAIN_ATTESTATION, &keypair.sk);

        assert!(!sig.verify(msg, DOMAIN_ATTESTATION, &other.pk));
    }

    #[test]
    fn test_aggregate_signature_and_pubkeys() {
        let kp_a = Keypair::random();
        let kp_b = Keypair::random();
        let msg = b"super-majority attestation";

        let sig_a = Signature::new(msg, DOMAIN_ATTESTATION, &kp_a.sk);
        let sig_b = Signature::new(msg, DOMAIN_ATTESTATION, &kp_b.sk);

        let mut agg_sig = AggregateSignature::new();
        agg_sig.add(&sig_a);
        agg_sig.add(&sig_b);

        let mut agg_pk = AggregatePublicKey::new();
        agg_pk.add(&kp_a.pk);
        agg_pk.add(&kp_b.pk);

        assert!(agg_sig.verify(msg, DOMAIN_ATTESTATION, &agg_pk));
    }

    #[test]
    fn test_proof_of_possession_round_trip() {
        let keypair = Keypair::random();
        let pop = create_proof_of_possession(&keypair);
        assert!(pop.verify(&[], DOMAIN_DEPOSIT, &keypair.pk));
    }
}
