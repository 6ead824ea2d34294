use milagro_bls::SecretKey as RawSecretKey;
use ssz::{Decodable, DecodeError, Encodable, SszStream};
use tree_hash::TreeHash;

use super::SECRET_KEY_BYTES_LEN;

/// A BLS12-381 private key: a scalar in `F_r`. Never implements `Clone`/`Debug`
/// in the teacher's own crate to discourage accidental copies or logging; this
/// port keeps that shape and additionally zeroizes on drop.
#[derive(zeroize::Zeroize)]
#[zeroize(drop)]
pub struct SecretKey(RawSecretKey);

impl SecretKey {
    /// Generates a new secret key from a CSPRNG.
    pub fn random() -> Self {
        Self(RawSecretKey::random(&mut rand::thread_rng()))
    }

    pub fn from_raw(raw: RawSecretKey) -> Self {
        Self(raw)
    }

    pub(crate) fn as_raw(&self) -> &RawSecretKey {
        &self.0
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        self.0.as_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != SECRET_KEY_BYTES_LEN {
            return Err(DecodeError::InvalidLength);
        }
        RawSecretKey::from_bytes(bytes)
            .map(Self)
            .map_err(|_| DecodeError::InvalidLength)
    }
}

impl Encodable for SecretKey {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append_encoded_raw(&self.as_bytes());
    }
}

impl Decodable for SecretKey {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let end = index + SECRET_KEY_BYTES_LEN;
        if end > bytes.len() {
            return Err(DecodeError::TooShort);
        }
        Ok((Self::from_bytes(&bytes[index..end])?, end))
    }
}

impl TreeHash for SecretKey {
    fn tree_hash_root(&self) -> Vec<u8> {
        self.as_bytes().tree_hash_root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssz_round_trip() {
        let original = SecretKey::random();
        let mut s = SszStream::new();
        s.append(&original);
        let bytes = s.drain();

        let (decoded, index) = SecretKey::ssz_decode(&bytes, 0).unwrap();
        assert_eq!(index, bytes.len());
        assert_eq!(decoded.as_bytes(), original.as_bytes());
    }
}
