use bls::AggregateSignature;
use ssz::{Decodable, DecodeError, Encodable, SszStream};
use tree_hash::TreeHash;

use crate::AttestationRecord;

/// One side of a Casper-FFG double/surround vote: the attesters (by index)
/// and the attestation they signed, per spec.md §3 "Block" ("Casper-slashings").
#[derive(Debug, PartialEq, Clone)]
pub struct SlashableVoteData {
    pub validator_indices: Vec<u64>,
    pub data: AttestationRecord,
    pub aggregate_signature: AggregateSignature,
}

impl Encodable for SlashableVoteData {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append(&self.validator_indices);
        s.append(&self.data);
        s.append(&self.aggregate_signature);
    }
}

impl Decodable for SlashableVoteData {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (validator_indices, index) = Vec::<u64>::ssz_decode(bytes, index)?;
        let (data, index) = AttestationRecord::ssz_decode(bytes, index)?;
        let (aggregate_signature, index) = AggregateSignature::ssz_decode(bytes, index)?;
        Ok((
            Self {
                validator_indices,
                data,
                aggregate_signature,
            },
            index,
        ))
    }
}

impl TreeHash for SlashableVoteData {
    fn tree_hash_root(&self) -> Vec<u8> {
        let mut stream = SszStream::new();
        stream.append(self);
        stream.drain().tree_hash_root()
    }
}

/// A Casper-slashing: two conflicting `SlashableVoteData` from an overlapping
/// set of validators. As with `ProposerSlashing`, spec.md §4.6 does not
/// detail double/surround-vote verification for the per-block transition;
/// this type carries the field so `BeaconBlockBody` is structurally complete
/// and bound-checkable against §6's `MAX_CASPER_SLASHINGS`.
#[derive(Debug, PartialEq, Clone)]
pub struct CasperSlashing {
    pub votes_1: SlashableVoteData,
    pub votes_2: SlashableVoteData,
}

impl Encodable for CasperSlashing {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append(&self.votes_1);
        s.append(&self.votes_2);
    }
}

impl Decodable for CasperSlashing {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (votes_1, index) = SlashableVoteData::ssz_decode(bytes, index)?;
        let (votes_2, index) = SlashableVoteData::ssz_decode(bytes, index)?;
        Ok((Self { votes_1, votes_2 }, index))
    }
}

impl TreeHash for CasperSlashing {
    fn tree_hash_root(&self) -> Vec<u8> {
        let mut stream = SszStream::new();
        stream.append(self);
        stream.drain().tree_hash_root()
    }
}
