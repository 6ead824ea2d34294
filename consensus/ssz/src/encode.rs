use super::LENGTH_BYTES;
use ethereum_types::H256;

/// A growable buffer that `Encodable` implementations append their canonical bytes
/// to. Variable-length values are length-prefixed by the caller (see
/// `append_vec`), never by the value itself — a type cannot know from inside its
/// own `ssz_append` whether it is being encoded as a top-level value or as an
/// element of a list.
#[derive(Default)]
pub struct SszStream {
    buffer: Vec<u8>,
}

impl SszStream {
    pub fn new() -> Self {
        Self { buffer: vec![] }
    }

    /// Appends `value`'s canonical encoding to the stream.
    pub fn append<T: Encodable>(&mut self, value: &T) -> &mut Self {
        value.ssz_append(self);
        self
    }

    /// Appends a length-prefixed vector of `Encodable` elements.
    pub fn append_vec<T: Encodable>(&mut self, values: &[T]) -> &mut Self {
        let mut inner = SszStream::new();
        for value in values {
            inner.append(value);
        }
        let bytes = inner.drain();
        self.buffer
            .extend_from_slice(&(bytes.len() as u32).to_be_bytes());
        self.buffer.extend_from_slice(&bytes);
        self
    }

    /// Appends raw, already-canonical bytes (used by fixed-width primitives).
    pub fn append_encoded_raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buffer.extend_from_slice(bytes);
        self
    }

    /// Consumes the stream, returning the accumulated bytes.
    pub fn drain(self) -> Vec<u8> {
        self.buffer
    }
}

pub trait Encodable {
    fn ssz_append(&self, s: &mut SszStream);
}

macro_rules! impl_encodable_for_uint {
    ($typ:ty) => {
        impl Encodable for $typ {
            fn ssz_append(&self, s: &mut SszStream) {
                s.append_encoded_raw(&self.to_be_bytes());
            }
        }
    };
}

impl_encodable_for_uint!(u8);
impl_encodable_for_uint!(u16);
impl_encodable_for_uint!(u32);
impl_encodable_for_uint!(u64);

impl Encodable for bool {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append_encoded_raw(&[*self as u8]);
    }
}

impl Encodable for H256 {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append_encoded_raw(self.as_bytes());
    }
}

/// A raw byte string, fixed-width at 32 bytes (a hash) — encoded with no length
/// prefix, matching §4.2's fixed-width byte strings.
impl Encodable for [u8; 32] {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append_encoded_raw(self);
    }
}

impl Encodable for [u8; 48] {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append_encoded_raw(self);
    }
}

impl Encodable for [u8; 96] {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append_encoded_raw(self);
    }
}

/// A variable-length byte string, length-prefixed per §6.
impl Encodable for Vec<u8> {
    fn ssz_append(&self, s: &mut SszStream) {
        s.buffer
            .extend_from_slice(&(self.len() as u32).to_be_bytes());
        s.buffer.extend_from_slice(self);
    }
}

impl<T: Encodable> Encodable for Vec<T> {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append_vec(self);
    }
}

impl<T: Encodable> Encodable for Option<T> {
    fn ssz_append(&self, s: &mut SszStream) {
        match self {
            Some(value) => {
                s.append_encoded_raw(&[1]);
                value.ssz_append(s);
            }
            None => s.append_encoded_raw(&[0]),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u64_encoding() {
        let mut s = SszStream::new();
        s.append(&1_u64);
        assert_eq!(s.drain(), vec![0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_vec_u64_length_prefixed() {
        let mut s = SszStream::new();
        s.append(&vec![1_u64, 2_u64]);
        let bytes = s.drain();
        // 4-byte length prefix + 2 * 8 byte elements.
        assert_eq!(bytes.len(), LENGTH_BYTES + 16);
        assert_eq!(&bytes[0..4], &16_u32.to_be_bytes());
    }

    #[test]
    fn test_field_order_concatenation() {
        let mut s = SszStream::new();
        s.append(&1_u64).append(&2_u64);
        assert_eq!(
            s.drain(),
            vec![0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 2]
        );
    }
}
