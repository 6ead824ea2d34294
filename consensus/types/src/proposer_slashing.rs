use bls::Signature;
use ethereum_types::H256;
use ssz::{Decodable, DecodeError, Encodable, SszStream};
use tree_hash::TreeHash;

/// The slot/shard/block-hash triple a proposer signs when proposing, per
/// spec.md §3 "Block". Two conflicting `ProposalSignedData` values signed by
/// the same proposer at the same slot constitute a slashable offense.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct ProposalSignedData {
    pub slot: u64,
    pub shard_id: u64,
    pub block_hash: H256,
}

impl Encodable for ProposalSignedData {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append(&self.slot);
        s.append(&self.shard_id);
        s.append(&self.block_hash);
    }
}

impl Decodable for ProposalSignedData {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (slot, index) = u64::ssz_decode(bytes, index)?;
        let (shard_id, index) = u64::ssz_decode(bytes, index)?;
        let (block_hash, index) = H256::ssz_decode(bytes, index)?;
        Ok((
            Self {
                slot,
                shard_id,
                block_hash,
            },
            index,
        ))
    }
}

impl TreeHash for ProposalSignedData {
    fn tree_hash_root(&self) -> Vec<u8> {
        let mut stream = SszStream::new();
        stream.append(self);
        stream.drain().tree_hash_root()
    }
}

/// A proposer-slashing: two conflicting signed proposals from the same
/// validator, carried in a block body per spec.md §3 "Block"
/// ("proposer-slashings"). spec.md does not detail double-proposal
/// verification semantics for the per-block transition (§4.6 enumerates only
/// the attestation/RANDAO/parent-signature path); this type exists so
/// `BeaconBlockBody` can carry and bound-check the field per §6's
/// `MAX_PROPOSER_SLASHINGS`.
#[derive(Debug, PartialEq, Clone)]
pub struct ProposerSlashing {
    pub proposer_index: u64,
    pub proposal_data_1: ProposalSignedData,
    pub proposal_signature_1: Signature,
    pub proposal_data_2: ProposalSignedData,
    pub proposal_signature_2: Signature,
}

impl Encodable for ProposerSlashing {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append(&self.proposer_index);
        s.append(&self.proposal_data_1);
        s.append(&self.proposal_signature_1);
        s.append(&self.proposal_data_2);
        s.append(&self.proposal_signature_2);
    }
}

impl Decodable for ProposerSlashing {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (proposer_index, index) = u64::ssz_decode(bytes, index)?;
        let (proposal_data_1, index) = ProposalSignedData::ssz_decode(bytes, index)?;
        let (proposal_signature_1, index) = Signature::ssz_decode(bytes, index)?;
        let (proposal_data_2, index) = ProposalSignedData::ssz_decode(bytes, index)?;
        let (proposal_signature_2, index) = Signature::ssz_decode(bytes, index)?;
        Ok((
            Self {
                proposer_index,
                proposal_data_1,
                proposal_signature_1,
                proposal_data_2,
                proposal_signature_2,
            },
            index,
        ))
    }
}

impl TreeHash for ProposerSlashing {
    fn tree_hash_root(&self) -> Vec<u8> {
        let mut stream = SszStream::new();
        stream.append(self);
        stream.drain().tree_hash_root()
    }
}
