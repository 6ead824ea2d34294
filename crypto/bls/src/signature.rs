use milagro_bls::Signature as RawSignature;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use ssz::{Decodable, DecodeError, Encodable, SszStream};
use tree_hash::TreeHash;

use super::public_key::{AggregatePublicKey, PublicKey};
use super::secret_key::SecretKey;
use super::SIGNATURE_BYTES_LEN;

/// A BLS12-381 signature: a compressed G2 point, per spec.md §4.1 "Sign":
/// "hash the message with 8-byte big-endian domain prefix to a G2 point,
/// multiply by the private key, compress to 96 bytes".
///
/// The domain-to-G2 hash (§4.1 "Hash-to-G2") and the pairing check in `verify`
/// are both performed inside `milagro_bls`; this type only owns the compressed
/// representation, (de)serialization and the empty-signature sentinel.
#[derive(Clone, PartialEq)]
pub struct Signature(RawSignature);

impl Signature {
    /// Signs `msg` under `domain` with `secret_key`.
    pub fn new(msg: &[u8], domain: u64, secret_key: &SecretKey) -> Self {
        Self(RawSignature::new(msg, domain, secret_key.as_raw()))
    }

    /// Verifies that `self` is a valid signature over `msg` under `domain` by
    /// `public_key`: `e(sig, G1) * e(hash_to_G2(m, domain), -pub) == 1`.
    pub fn verify(&self, msg: &[u8], domain: u64, public_key: &PublicKey) -> bool {
        self.0.verify(msg, domain, public_key.as_raw())
    }

    /// `EMPTY_SIGNATURE`: 96 zero bytes, per spec.md §6.
    pub fn empty() -> Self {
        Self(RawSignature::from_bytes(&[0; SIGNATURE_BYTES_LEN]).expect("zero bytes are valid"))
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        self.0.as_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != SIGNATURE_BYTES_LEN {
            return Err(DecodeError::InvalidLength);
        }
        RawSignature::from_bytes(bytes)
            .map(Self)
            .map_err(|_| DecodeError::InvalidLength)
    }
}

impl Encodable for Signature {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append_encoded_raw(&self.as_bytes());
    }
}

impl Decodable for Signature {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let end = index + SIGNATURE_BYTES_LEN;
        if end > bytes.len() {
            return Err(DecodeError::TooShort);
        }
        Ok((Self::from_bytes(&bytes[index..end])?, end))
    }
}

impl TreeHash for Signature {
    fn tree_hash_root(&self) -> Vec<u8> {
        self.as_bytes().tree_hash_root()
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Signature({})", hex::encode(self.as_bytes()))
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde_hex::encode(&self.as_bytes(), serializer)
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = serde_hex::decode(deserializer, SIGNATURE_BYTES_LEN)?;
        Self::from_bytes(&bytes).map_err(|e| serde::de::Error::custom(format!("{:?}", e)))
    }
}

/// The sum of a set of signatures over (possibly distinct) messages, combined
/// by G2 point addition (§4.1 "Aggregate signatures").
#[derive(Clone)]
pub struct AggregateSignature(milagro_bls::AggregateSignature);

impl AggregateSignature {
    pub fn new() -> Self {
        Self(milagro_bls::AggregateSignature::new())
    }

    pub fn add(&mut self, signature: &Signature) {
        self.0.add(&signature.0);
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        self.0.as_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != SIGNATURE_BYTES_LEN {
            return Err(DecodeError::InvalidLength);
        }
        milagro_bls::AggregateSignature::from_bytes(bytes)
            .map(Self)
            .map_err(|_| DecodeError::InvalidLength)
    }

    /// Verifies against a single message and the sum of the signers' public
    /// keys — the common case where every signer attested to the same message.
    pub fn verify(&self, msg: &[u8], domain: u64, aggregate_public_key: &AggregatePublicKey) -> bool {
        self.0.verify(msg, domain, aggregate_public_key.as_raw())
    }

    /// Multi-message verification, grouped by distinct message: one pairing per
    /// distinct message plus one for the aggregated signature (§4.1
    /// "Multi-verify").
    pub fn verify_multiple(
        &self,
        messages: &[&[u8]],
        domain: u64,
        public_keys: &[&AggregatePublicKey],
    ) -> bool {
        let raw_keys: Vec<&milagro_bls::AggregatePublicKey> =
            public_keys.iter().map(|pk| pk.as_raw()).collect();
        self.0.verify_multiple(messages, domain, &raw_keys)
    }
}

impl Default for AggregateSignature {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for AggregateSignature {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl std::fmt::Debug for AggregateSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "AggregateSignature({})", hex::encode(self.as_bytes()))
    }
}

impl Encodable for AggregateSignature {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append_encoded_raw(&self.as_bytes());
    }
}

impl Decodable for AggregateSignature {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let end = index + SIGNATURE_BYTES_LEN;
        if end > bytes.len() {
            return Err(DecodeError::TooShort);
        }
        Ok((Self::from_bytes(&bytes[index..end])?, end))
    }
}

impl TreeHash for AggregateSignature {
    fn tree_hash_root(&self) -> Vec<u8> {
        self.as_bytes().tree_hash_root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_signature_is_96_zero_bytes() {
        let empty = Signature::empty();
        assert_eq!(empty.as_bytes(), vec![0; SIGNATURE_BYTES_LEN]);
    }

    #[test]
    fn test_ssz_round_trip() {
        let sk = SecretKey::random();
        let original = Signature::new(b"hello", 0, &sk);
        let mut s = SszStream::new();
        s.append(&original);
        let bytes = s.drain();

        let (decoded, index) = Signature::ssz_decode(&bytes, 0).unwrap();
        assert_eq!(index, bytes.len());
        assert_eq!(decoded, original);
    }
}
