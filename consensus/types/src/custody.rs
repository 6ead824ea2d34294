use bls::Signature;
use ethereum_types::H256;
use ssz::{Decodable, DecodeError, Encodable, SszStream};
use tree_hash::TreeHash;

/// Custody-game records carried opaquely in a block body per spec.md §3
/// "Block": "custody reseeds/challenges/responses". The custody game
/// (shard-data availability challenges) belongs to the execution-layer
/// ("shard VM") subsystem spec.md §1 excludes; these types exist only so a
/// `BeaconBlockBody` can be constructed, (de)serialized and hashed, per §6's
/// `MAX_CASPER_VOTES`-adjacent body bounds. No processing logic is attached.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct CustodyReseed {
    pub validator_index: u64,
    pub shard_id: u64,
    pub subkey_commitment: H256,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct CustodyChallenge {
    pub responder_index: u64,
    pub shard_id: u64,
    pub challenger_index: u64,
}

#[derive(Debug, PartialEq, Clone)]
pub struct CustodyResponse {
    pub challenge_index: u64,
    pub responder_index: u64,
    pub signature: Signature,
}

impl Encodable for CustodyReseed {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append(&self.validator_index);
        s.append(&self.shard_id);
        s.append(&self.subkey_commitment);
    }
}

impl Decodable for CustodyReseed {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (validator_index, index) = u64::ssz_decode(bytes, index)?;
        let (shard_id, index) = u64::ssz_decode(bytes, index)?;
        let (subkey_commitment, index) = H256::ssz_decode(bytes, index)?;
        Ok((
            Self {
                validator_index,
                shard_id,
                subkey_commitment,
            },
            index,
        ))
    }
}

impl TreeHash for CustodyReseed {
    fn tree_hash_root(&self) -> Vec<u8> {
        let mut stream = SszStream::new();
        stream.append(self);
        stream.drain().tree_hash_root()
    }
}

impl Encodable for CustodyChallenge {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append(&self.responder_index);
        s.append(&self.shard_id);
        s.append(&self.challenger_index);
    }
}

impl Decodable for CustodyChallenge {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (responder_index, index) = u64::ssz_decode(bytes, index)?;
        let (shard_id, index) = u64::ssz_decode(bytes, index)?;
        let (challenger_index, index) = u64::ssz_decode(bytes, index)?;
        Ok((
            Self {
                responder_index,
                shard_id,
                challenger_index,
            },
            index,
        ))
    }
}

impl TreeHash for CustodyChallenge {
    fn tree_hash_root(&self) -> Vec<u8> {
        let mut stream = SszStream::new();
        stream.append(self);
        stream.drain().tree_hash_root()
    }
}

impl Encodable for CustodyResponse {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append(&self.challenge_index);
        s.append(&self.responder_index);
        s.append(&self.signature);
    }
}

impl Decodable for CustodyResponse {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (challenge_index, index) = u64::ssz_decode(bytes, index)?;
        let (responder_index, index) = u64::ssz_decode(bytes, index)?;
        let (signature, index) = Signature::ssz_decode(bytes, index)?;
        Ok((
            Self {
                challenge_index,
                responder_index,
                signature,
            },
            index,
        ))
    }
}

impl TreeHash for CustodyResponse {
    fn tree_hash_root(&self) -> Vec<u8> {
        let mut stream = SszStream::new();
        stream.append(self);
        stream.drain().tree_hash_root()
    }
}
