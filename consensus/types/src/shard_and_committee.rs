use ssz::{Decodable, DecodeError, Encodable, SszStream};
use tree_hash::TreeHash;

/// One committee assigned to a (slot, shard) pair by the committee engine,
/// per spec.md §4.3 "Committee Engine": "each element a sequence of
/// `(shard_id, committee_indices)`". Named after the teacher's own
/// `ShardAndCommittee` (sampled `beacon_chain/types/src/shard_and_committee.rs`).
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct ShardAndCommittee {
    pub shard_id: u64,
    pub committee: Vec<usize>,
}

impl Encodable for ShardAndCommittee {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append(&self.shard_id);
        s.append(&self.committee.iter().map(|&i| i as u64).collect::<Vec<u64>>());
    }
}

impl Decodable for ShardAndCommittee {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (shard_id, index) = u64::ssz_decode(bytes, index)?;
        let (committee, index) = Vec::<u64>::ssz_decode(bytes, index)?;
        Ok((
            Self {
                shard_id,
                committee: committee.into_iter().map(|i| i as usize).collect(),
            },
            index,
        ))
    }
}

impl TreeHash for ShardAndCommittee {
    fn tree_hash_root(&self) -> Vec<u8> {
        let mut stream = SszStream::new();
        stream.append(self);
        stream.drain().tree_hash_root()
    }
}
