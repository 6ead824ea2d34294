use milagro_bls::PublicKey as RawPublicKey;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use ssz::{Decodable, DecodeError, Encodable, SszStream};
use tree_hash::TreeHash;

use super::secret_key::SecretKey;
use super::PUBLIC_KEY_BYTES_LEN;

/// A BLS12-381 public key: a compressed G1 point, per spec.md §3 "48-byte
/// integer".
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKey(RawPublicKey);

impl PublicKey {
    pub fn from_secret_key(secret_key: &SecretKey) -> Self {
        Self(RawPublicKey::from_secret_key(secret_key.as_raw()))
    }

    pub fn from_raw(raw: RawPublicKey) -> Self {
        Self(raw)
    }

    pub(crate) fn as_raw(&self) -> &RawPublicKey {
        &self.0
    }

    /// Compresses the point into its canonical 48-byte form.
    pub fn as_bytes(&self) -> Vec<u8> {
        self.0.as_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != PUBLIC_KEY_BYTES_LEN {
            return Err(DecodeError::InvalidLength);
        }
        RawPublicKey::from_bytes(bytes)
            .map(Self)
            .map_err(|_| DecodeError::InvalidLength)
    }
}

impl Encodable for PublicKey {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append_encoded_raw(&self.as_bytes());
    }
}

impl Decodable for PublicKey {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let end = index + PUBLIC_KEY_BYTES_LEN;
        if end > bytes.len() {
            return Err(DecodeError::TooShort);
        }
        Ok((Self::from_bytes(&bytes[index..end])?, end))
    }
}

impl TreeHash for PublicKey {
    fn tree_hash_root(&self) -> Vec<u8> {
        self.as_bytes().tree_hash_root()
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.as_bytes()))
    }
}

/// Encodes/decodes as a `0x`-prefixed hex string, for config files and
/// JSON-RPC rather than the SSZ wire format `Encodable`/`Decodable` cover.
impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde_hex::encode(&self.as_bytes(), serializer)
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = serde_hex::decode(deserializer, PUBLIC_KEY_BYTES_LEN)?;
        Self::from_bytes(&bytes).map_err(|e| serde::de::Error::custom(format!("{:?}", e)))
    }
}

/// The sum of a set of public keys, used to verify an aggregate signature
/// against every committee member who attested (§4.1 "aggregate public keys by
/// G1 addition").
pub struct AggregatePublicKey(milagro_bls::AggregatePublicKey);

impl AggregatePublicKey {
    pub fn new() -> Self {
        Self(milagro_bls::AggregatePublicKey::new())
    }

    pub fn add(&mut self, public_key: &PublicKey) {
        self.0.add(public_key.as_raw());
    }

    pub(crate) fn as_raw(&self) -> &milagro_bls::AggregatePublicKey {
        &self.0
    }
}

impl Default for AggregatePublicKey {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SecretKey;

    #[test]
    fn test_ssz_round_trip() {
        let sk = SecretKey::random();
        let original = PublicKey::from_secret_key(&sk);
        let mut s = SszStream::new();
        s.append(&original);
        let bytes = s.drain();

        let (decoded, index) = PublicKey::ssz_decode(&bytes, 0).unwrap();
        assert_eq!(index, bytes.len());
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let sk_a = SecretKey::random();
        let sk_b = SecretKey::random();
        let pk_a = PublicKey::from_secret_key(&sk_a);
        let pk_b = PublicKey::from_secret_key(&sk_b);

        let mut first = AggregatePublicKey::new();
        first.add(&pk_a);
        first.add(&pk_b);

        let mut second = AggregatePublicKey::new();
        second.add(&pk_b);
        second.add(&pk_a);

        assert_eq!(first.as_raw().as_bytes(), second.as_raw().as_bytes());
    }
}
