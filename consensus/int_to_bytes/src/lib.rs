//! Fixed-width big-endian integer encoding, per spec.md §6 "Wire format":
//! "Integers are unsigned big-endian fixed-width (64 or 384 bits)."
//!
//! These are the building blocks `ssz` uses for every integer field, and the
//! building blocks the committee engine and crypto primitives use directly
//! (e.g. the domain tag in `get_domain`, the shuffle round's little helper
//! constants).

/// Encodes `value` as 4 big-endian bytes.
pub fn int_to_bytes4(value: u32) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

/// Encodes `value` as 8 big-endian bytes.
pub fn int_to_bytes8(value: u64) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

/// Encodes `value` as 32 big-endian bytes, left-padded with zeros.
pub fn int_to_bytes32(value: u64) -> Vec<u8> {
    let mut bytes = vec![0; 24];
    bytes.extend_from_slice(&value.to_be_bytes());
    bytes
}

/// Encodes `value` as 48 big-endian bytes, left-padded with zeros. Used for the
/// compressed-integer encoding of a BLS public key (§4.1).
pub fn int_to_bytes48(value: u64) -> Vec<u8> {
    let mut bytes = vec![0; 40];
    bytes.extend_from_slice(&value.to_be_bytes());
    bytes
}

/// Decodes the first 4 bytes of `bytes` as a big-endian `u32`.
pub fn bytes4_to_int(bytes: &[u8]) -> u32 {
    let mut array = [0; 4];
    array.copy_from_slice(&bytes[0..4]);
    u32::from_be_bytes(array)
}

/// Decodes the first 8 bytes of `bytes` as a big-endian `u64`.
pub fn bytes8_to_int(bytes: &[u8]) -> u64 {
    let mut array = [0; 8];
    array.copy_from_slice(&bytes[0..8]);
    u64::from_be_bytes(array)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_to_bytes4() {
        assert_eq!(int_to_bytes4(0), vec![0, 0, 0, 0]);
        assert_eq!(int_to_bytes4(1), vec![0, 0, 0, 1]);
        assert_eq!(int_to_bytes4(u32::max_value()), vec![255, 255, 255, 255]);
    }

    #[test]
    fn test_int_to_bytes8() {
        assert_eq!(int_to_bytes8(0), vec![0; 8]);
        assert_eq!(int_to_bytes8(1), vec![0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_int_to_bytes32_length_and_roundtrip() {
        let encoded = int_to_bytes32(42);
        assert_eq!(encoded.len(), 32);
        assert_eq!(bytes8_to_int(&encoded[24..]), 42);
    }

    #[test]
    fn test_roundtrip() {
        for value in [0_u64, 1, 256, u32::max_value() as u64].iter() {
            assert_eq!(bytes8_to_int(&int_to_bytes8(*value)), *value);
        }
    }
}
