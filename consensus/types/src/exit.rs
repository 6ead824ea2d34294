use bls::Signature;
use ssz::{Decodable, DecodeError, Encodable, SszStream};
use tree_hash::TreeHash;

/// A validator's signed request to exit, carried in a block body (spec.md §3
/// "Block"), validated against `DOMAIN_EXIT` (§4.1) before the per-block
/// transition calls `BeaconState::exit_validator`.
#[derive(Debug, PartialEq, Clone)]
pub struct Exit {
    pub slot: u64,
    pub validator_index: u64,
    pub signature: Signature,
}

impl Encodable for Exit {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append(&self.slot);
        s.append(&self.validator_index);
        s.append(&self.signature);
    }
}

impl Decodable for Exit {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (slot, index) = u64::ssz_decode(bytes, index)?;
        let (validator_index, index) = u64::ssz_decode(bytes, index)?;
        let (signature, index) = Signature::ssz_decode(bytes, index)?;
        Ok((
            Self {
                slot,
                validator_index,
                signature,
            },
            index,
        ))
    }
}

impl TreeHash for Exit {
    fn tree_hash_root(&self) -> Vec<u8> {
        let mut stream = SszStream::new();
        stream.append(self);
        stream.drain().tree_hash_root()
    }
}
