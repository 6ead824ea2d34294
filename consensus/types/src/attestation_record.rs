use bls::AggregateSignature;
use ethereum_types::H256;
use ssz::{Decodable, DecodeError, Encodable, SszStream};
use tree_hash::TreeHash;

use crate::Bitfield;

/// A committee's vote for a shard block, per spec.md §3 "Attestation record":
/// "Slot, shard id, oblique parent hashes, shard block hash, attester bitfield
/// (one bit per committee seat), justified slot and corresponding block hash,
/// aggregate signature."
#[derive(Debug, PartialEq, Clone)]
pub struct AttestationRecord {
    pub slot: u64,
    pub shard_id: u64,
    /// Block hashes this attestation votes for beyond the cycle-length prefix
    /// of `recent_block_hashes`, per §4.6 "get_signed_parent_hashes".
    pub oblique_parent_hashes: Vec<H256>,
    pub shard_block_hash: H256,
    pub attester_bitfield: Bitfield,
    pub justified_slot: u64,
    pub justified_block_hash: H256,
    pub aggregate_signature: AggregateSignature,
}

impl Encodable for AttestationRecord {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append(&self.slot);
        s.append(&self.shard_id);
        s.append(&self.oblique_parent_hashes);
        s.append(&self.shard_block_hash);
        s.append(&self.attester_bitfield);
        s.append(&self.justified_slot);
        s.append(&self.justified_block_hash);
        s.append(&self.aggregate_signature);
    }
}

impl Decodable for AttestationRecord {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (slot, index) = u64::ssz_decode(bytes, index)?;
        let (shard_id, index) = u64::ssz_decode(bytes, index)?;
        let (oblique_parent_hashes, index) = Vec::<H256>::ssz_decode(bytes, index)?;
        let (shard_block_hash, index) = H256::ssz_decode(bytes, index)?;
        let (attester_bitfield, index) = Bitfield::ssz_decode(bytes, index)?;
        let (justified_slot, index) = u64::ssz_decode(bytes, index)?;
        let (justified_block_hash, index) = H256::ssz_decode(bytes, index)?;
        let (aggregate_signature, index) = AggregateSignature::ssz_decode(bytes, index)?;
        Ok((
            Self {
                slot,
                shard_id,
                oblique_parent_hashes,
                shard_block_hash,
                attester_bitfield,
                justified_slot,
                justified_block_hash,
                aggregate_signature,
            },
            index,
        ))
    }
}

impl TreeHash for AttestationRecord {
    fn tree_hash_root(&self) -> Vec<u8> {
        let mut stream = SszStream::new();
        stream.append(self);
        stream.drain().tree_hash_root()
    }
}
