use ethereum_types::H256;
use ssz::{Decodable, DecodeError, Encodable, SszStream};
use tree_hash::TreeHash;

/// A shard committee's commitment to a shard block root, folded into
/// `BeaconState::latest_crosslinks`, per spec.md §3 "Recent" and §4.7
/// "Crosslinks".
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct CrosslinkRecord {
    pub slot: u64,
    pub shard_block_root: H256,
}

impl Encodable for CrosslinkRecord {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append(&self.slot);
        s.append(&self.shard_block_root);
    }
}

impl Decodable for CrosslinkRecord {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (slot, index) = u64::ssz_decode(bytes, index)?;
        let (shard_block_root, index) = H256::ssz_decode(bytes, index)?;
        Ok((
            Self {
                slot,
                shard_block_root,
            },
            index,
        ))
    }
}

impl TreeHash for CrosslinkRecord {
    fn tree_hash_root(&self) -> Vec<u8> {
        let mut stream = SszStream::new();
        stream.append(self);
        stream.drain().tree_hash_root()
    }
}
