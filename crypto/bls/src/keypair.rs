use super::{PublicKey, SecretKey};

/// A secret/public key pair, convenient for test fixtures and the genesis
/// builder's deterministic validator set (§4.4).
pub struct Keypair {
    pub sk: SecretKey,
    pub pk: PublicKey,
}

impl Keypair {
    pub fn random() -> Self {
        let sk = SecretKey::random();
        let pk = PublicKey::from_secret_key(&sk);
        Self { sk, pk }
    }

    pub fn from_components(sk: SecretKey, pk: PublicKey) -> Self {
        Self { sk, pk }
    }
}

impl Clone for Keypair {
    fn clone(&self) -> Self {
        // `SecretKey` is intentionally not `Clone` (see secret_key.rs); round-trip
        // through bytes rather than widen its API just for this call site.
        let sk = SecretKey::from_bytes(&self.sk.as_bytes()).expect("valid secret key bytes");
        Self {
            sk,
            pk: self.pk.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pubkey_matches_secret_key() {
        let keypair = Keypair::random();
        assert_eq!(
            PublicKey::from_secret_key(&keypair.sk).as_bytes(),
            keypair.pk.as_bytes()
        );
    }
}
