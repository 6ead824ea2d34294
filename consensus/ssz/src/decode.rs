use super::LENGTH_BYTES;
use ethereum_types::H256;

#[derive(Debug, PartialEq, Clone)]
pub enum DecodeError {
    /// The bytes ended before a fixed-width field or a declared length could be
    /// read in full.
    TooShort,
    /// Trailing bytes remained after decoding a value expected to consume the
    /// whole buffer.
    TooLong,
    /// A declared variable-length field's length prefix disagreed with the
    /// number of bytes actually present.
    InvalidLength,
}

pub trait Decodable: Sized {
    /// Decodes `Self` starting at `index` in `bytes`, returning the decoded value
    /// and the index of the first byte after it.
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError>;
}

macro_rules! impl_decodable_for_uint {
    ($typ:ty, $width:expr) => {
        impl Decodable for $typ {
            fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
                let end = index + $width;
                if end > bytes.len() {
                    return Err(DecodeError::TooShort);
                }
                let mut array = [0; $width];
                array.copy_from_slice(&bytes[index..end]);
                Ok((<$typ>::from_be_bytes(array), end))
            }
        }
    };
}

impl_decodable_for_uint!(u8, 1);
impl_decodable_for_uint!(u16, 2);
impl_decodable_for_uint!(u32, 4);
impl_decodable_for_uint!(u64, 8);

impl Decodable for bool {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (byte, index) = u8::ssz_decode(bytes, index)?;
        Ok((byte != 0, index))
    }
}

impl Decodable for H256 {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let end = index + 32;
        if end > bytes.len() {
            return Err(DecodeError::TooShort);
        }
        Ok((H256::from_slice(&bytes[index..end]), end))
    }
}

macro_rules! impl_decodable_for_byte_array {
    ($width:expr) => {
        impl Decodable for [u8; $width] {
            fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
                let end = index + $width;
                if end > bytes.len() {
                    return Err(DecodeError::TooShort);
                }
                let mut array = [0; $width];
                array.copy_from_slice(&bytes[index..end]);
                Ok((array, end))
            }
        }
    };
}

impl_decodable_for_byte_array!(32);
impl_decodable_for_byte_array!(48);
impl_decodable_for_byte_array!(96);

impl Decodable for Vec<u8> {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (len, body_start) = read_length_prefix(bytes, index)?;
        let body_end = body_start + len;
        if body_end > bytes.len() {
            return Err(DecodeError::InvalidLength);
        }
        Ok((bytes[body_start..body_end].to_vec(), body_end))
    }
}

impl<T: Decodable> Decodable for Vec<T> {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (len, body_start) = read_length_prefix(bytes, index)?;
        let body_end = body_start + len;
        if body_end > bytes.len() {
            return Err(DecodeError::InvalidLength);
        }

        let mut values = vec![];
        let mut cursor = body_start;
        while cursor < body_end {
            let (value, next) = T::ssz_decode(bytes, cursor)?;
            if next > body_end {
                return Err(DecodeError::InvalidLength);
            }
            values.push(value);
            cursor = next;
        }

        Ok((values, body_end))
    }
}

impl<T: Decodable> Decodable for Option<T> {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (flag, index) = u8::ssz_decode(bytes, index)?;
        match flag {
            0 => Ok((None, index)),
            1 => {
                let (value, index) = T::ssz_decode(bytes, index)?;
                Ok((Some(value), index))
            }
            _ => Err(DecodeError::InvalidLength),
        }
    }
}

fn read_length_prefix(bytes: &[u8], index: usize) -> Result<(usize, usize), DecodeError> {
    let end = index + LENGTH_BYTES;
    if end > bytes.len() {
        return Err(DecodeError::TooShort);
    }
    let mut array = [0; LENGTH_BYTES];
    array.copy_from_slice(&bytes[index..end]);
    Ok((u32::from_be_bytes(array) as usize, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u64_round_trip() {
        let bytes = 42_u64.to_be_bytes().to_vec();
        let (value, index) = u64::ssz_decode(&bytes, 0).unwrap();
        assert_eq!(value, 42);
        assert_eq!(index, 8);
    }

    #[test]
    fn test_too_short() {
        let bytes = vec![0, 0, 0];
        assert_eq!(u64::ssz_decode(&bytes, 0), Err(DecodeError::TooShort));
    }

    #[test]
    fn test_vec_u32_round_trip() {
        use super::super::{Encodable, SszStream};
        let original: Vec<u32> = vec![1, 2, 3];
        let mut s = SszStream::new();
        s.append(&original);
        let bytes = s.drain();

        let (decoded, index) = Vec::<u32>::ssz_decode(&bytes, 0).unwrap();
        assert_eq!(decoded, original);
        assert_eq!(index, bytes.len());
    }

    #[test]
    fn test_option_round_trip() {
        use super::super::{Encodable, SszStream};

        let mut s = SszStream::new();
        s.append(&Some(7_u64));
        let bytes = s.drain();
        let (decoded, _) = Option::<u64>::ssz_decode(&bytes, 0).unwrap();
        assert_eq!(decoded, Some(7));

        let mut s = SszStream::new();
        s.append(&(None as Option<u64>));
        let bytes = s.drain();
        let (decoded, _) = Option::<u64>::ssz_decode(&bytes, 0).unwrap();
        assert_eq!(decoded, None);
    }
}
