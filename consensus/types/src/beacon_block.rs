use bls::Signature;
use ethereum_types::H256;
use ssz::{Decodable, DecodeError, Encodable, SszStream};
use tree_hash::TreeHash;

use crate::{
    AttestationRecord, CasperSlashing, CustodyChallenge, CustodyReseed, CustodyResponse, Deposit,
    Exit, ProposerSlashing,
};

/// A block body, per spec.md §3 "Block": "a body carrying proposer-slashings,
/// Casper-slashings, attestations, custody reseeds/challenges/responses,
/// deposits, and exits."
#[derive(Debug, PartialEq, Clone, Default)]
pub struct BeaconBlockBody {
    pub proposer_slashings: Vec<ProposerSlashing>,
    pub casper_slashings: Vec<CasperSlashing>,
    pub attestations: Vec<AttestationRecord>,
    pub custody_reseeds: Vec<CustodyReseed>,
    pub custody_challenges: Vec<CustodyChallenge>,
    pub custody_responses: Vec<CustodyResponse>,
    pub deposits: Vec<Deposit>,
    pub exits: Vec<Exit>,
}

impl Encodable for BeaconBlockBody {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append(&self.proposer_slashings);
        s.append(&self.casper_slashings);
        s.append(&self.attestations);
        s.append(&self.custody_reseeds);
        s.append(&self.custody_challenges);
        s.append(&self.custody_responses);
        s.append(&self.deposits);
        s.append(&self.exits);
    }
}

impl Decodable for BeaconBlockBody {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (proposer_slashings, index) = Vec::<ProposerSlashing>::ssz_decode(bytes, index)?;
        let (casper_slashings, index) = Vec::<CasperSlashing>::ssz_decode(bytes, index)?;
        let (attestations, index) = Vec::<AttestationRecord>::ssz_decode(bytes, index)?;
        let (custody_reseeds, index) = Vec::<CustodyReseed>::ssz_decode(bytes, index)?;
        let (custody_challenges, index) = Vec::<CustodyChallenge>::ssz_decode(bytes, index)?;
        let (custody_responses, index) = Vec::<CustodyResponse>::ssz_decode(bytes, index)?;
        let (deposits, index) = Vec::<Deposit>::ssz_decode(bytes, index)?;
        let (exits, index) = Vec::<Exit>::ssz_decode(bytes, index)?;
        Ok((
            Self {
                proposer_slashings,
                casper_slashings,
                attestations,
                custody_reseeds,
                custody_challenges,
                custody_responses,
                deposits,
                exits,
            },
            index,
        ))
    }
}

impl TreeHash for BeaconBlockBody {
    fn tree_hash_root(&self) -> Vec<u8> {
        let mut stream = SszStream::new();
        stream.append(self);
        stream.drain().tree_hash_root()
    }
}

/// A signed beacon block, per spec.md §3 "Block": "Slot, parent root, state
/// root, RANDAO reveal, candidate PoW-receipt root, aggregate signature, and
/// a body".
#[derive(Debug, PartialEq, Clone)]
pub struct BeaconBlock {
    pub slot: u64,
    pub parent_root: H256,
    pub state_root: H256,
    pub randao_reveal: H256,
    pub candidate_pow_receipt_root: H256,
    pub signature: Signature,
    pub body: BeaconBlockBody,
}

impl BeaconBlock {
    /// The zero'd block genesis state roots against, per spec.md §4.4
    /// "Genesis Builder" and `original_source`'s `on_startup.get_genesis_block`.
    pub fn genesis(state_root: H256, genesis_slot: u64) -> Self {
        Self {
            slot: genesis_slot,
            parent_root: H256::zero(),
            state_root,
            randao_reveal: H256::zero(),
            candidate_pow_receipt_root: H256::zero(),
            signature: Signature::empty(),
            body: BeaconBlockBody::default(),
        }
    }
}

impl Encodable for BeaconBlock {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append(&self.slot);
        s.append(&self.parent_root);
        s.append(&self.state_root);
        s.append(&self.randao_reveal);
        s.append(&self.candidate_pow_receipt_root);
        s.append(&self.signature);
        s.append(&self.body);
    }
}

impl Decodable for BeaconBlock {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (slot, index) = u64::ssz_decode(bytes, index)?;
        let (parent_root, index) = H256::ssz_decode(bytes, index)?;
        let (state_root, index) = H256::ssz_decode(bytes, index)?;
        let (randao_reveal, index) = H256::ssz_decode(bytes, index)?;
        let (candidate_pow_receipt_root, index) = H256::ssz_decode(bytes, index)?;
        let (signature, index) = Signature::ssz_decode(bytes, index)?;
        let (body, index) = BeaconBlockBody::ssz_decode(bytes, index)?;
        Ok((
            Self {
                slot,
                parent_root,
                state_root,
                randao_reveal,
                candidate_pow_receipt_root,
                signature,
                body,
            },
            index,
        ))
    }
}

impl TreeHash for BeaconBlock {
    fn tree_hash_root(&self) -> Vec<u8> {
        let mut stream = SszStream::new();
        stream.append(self);
        stream.drain().tree_hash_root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis_block_has_zero_parent() {
        let block = BeaconBlock::genesis(H256::from_low_u64_be(7), 0);
        assert_eq!(block.parent_root, H256::zero());
        assert_eq!(block.signature.as_bytes(), Signature::empty().as_bytes());
        assert!(block.body.attestations.is_empty());
    }

    #[test]
    fn test_ssz_round_trip() {
        let block = BeaconBlock::genesis(H256::from_low_u64_be(1), 0);
        let mut s = SszStream::new();
        s.append(&block);
        let bytes = s.drain();

        let (decoded, index) = BeaconBlock::ssz_decode(&bytes, 0).unwrap();
        assert_eq!(index, bytes.len());
        assert_eq!(decoded, block);
    }
}
