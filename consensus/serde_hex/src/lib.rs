//! `0x`-prefixed hex encoding helpers for `serde`, grounded in the teacher's
//! own `eth2_hashing`/`ssz` conventions of exposing byte arrays as hex over
//! JSON while keeping SSZ as the binary wire format. Consumed by `bls`'s
//! public types so keys and signatures round-trip through config files and
//! JSON-RPC the same way the rest of this workspace's hashes do.

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use std::fmt;

/// Serializes `bytes` as a `0x`-prefixed lowercase hex string.
pub fn encode<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
}

/// A `serde::de::Visitor` that decodes a `0x`-prefixed (or bare) hex string
/// into a `Vec<u8>`. Generic byte containers implement `Decode` to accept the
/// result in their own fixed-size representation.
pub struct PrefixedHexVisitor;

impl<'de> Visitor<'de> for PrefixedHexVisitor {
    type Value = Vec<u8>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a 0x-prefixed hex string")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        let stripped = value.strip_prefix("0x").unwrap_or(value);
        hex::decode(stripped).map_err(|e| de::Error::custom(format!("invalid hex: {}", e)))
    }
}

/// Decodes a `0x`-prefixed hex string into a `Vec<u8>` of exactly `len`
/// bytes, for use as a `#[serde(deserialize_with = "...")]` helper.
pub fn decode<'de, D: Deserializer<'de>>(deserializer: D, len: usize) -> Result<Vec<u8>, D::Error> {
    let bytes = deserializer.deserialize_str(PrefixedHexVisitor)?;
    if bytes.len() != len {
        return Err(de::Error::custom(format!(
            "expected {} bytes, found {}",
            len,
            bytes.len()
        )));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::value::{Error as ValueError, StrDeserializer};
    use serde::de::IntoDeserializer;

    #[test]
    fn test_decode_strips_prefix() {
        let deserializer: StrDeserializer<ValueError> = "0xdeadbeef".into_deserializer();
        let bytes = decode(deserializer, 4).unwrap();
        assert_eq!(bytes, vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let deserializer: StrDeserializer<ValueError> = "0xdead".into_deserializer();
        assert!(decode(deserializer, 4).is_err());
    }
}
