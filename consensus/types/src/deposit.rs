use bls::{PublicKey, Signature};
use ethereum_types::H256;
use ssz::{Decodable, DecodeError, Encodable, SszStream};
use tree_hash::TreeHash;

/// The portion of a deposit signed by the depositor's proof-of-possession,
/// per spec.md §4.5 "Deposit processing": "Verify the proof-of-possession:
/// sign the deposit input's root with the domain tag DEPOSIT".
#[derive(Debug, PartialEq, Clone)]
pub struct DepositInput {
    pub pubkey: PublicKey,
    pub withdrawal_credentials: H256,
    pub randao_commitment: H256,
    pub proof_of_possession: Signature,
}

impl Encodable for DepositInput {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append(&self.pubkey);
        s.append(&self.withdrawal_credentials);
        s.append(&self.randao_commitment);
        s.append(&self.proof_of_possession);
    }
}

impl Decodable for DepositInput {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (pubkey, index) = PublicKey::ssz_decode(bytes, index)?;
        let (withdrawal_credentials, index) = H256::ssz_decode(bytes, index)?;
        let (randao_commitment, index) = H256::ssz_decode(bytes, index)?;
        let (proof_of_possession, index) = Signature::ssz_decode(bytes, index)?;
        Ok((
            Self {
                pubkey,
                withdrawal_credentials,
                randao_commitment,
                proof_of_possession,
            },
            index,
        ))
    }
}

impl TreeHash for DepositInput {
    fn tree_hash_root(&self) -> Vec<u8> {
        let mut stream = SszStream::new();
        stream.append(self);
        stream.drain().tree_hash_root()
    }
}

impl DepositInput {
    /// The root signed by `proof_of_possession`: the pubkey, withdrawal
    /// credentials and RANDAO commitment, deliberately excluding the
    /// signature field itself (a signature cannot authenticate a root that
    /// depends on its own bytes). Per spec.md §4.5 "Deposit processing":
    /// "sign the deposit input's root".
    pub fn signing_root(&self) -> Vec<u8> {
        let mut stream = SszStream::new();
        stream.append(&self.pubkey);
        stream.append(&self.withdrawal_credentials);
        stream.append(&self.randao_commitment);
        stream.drain().tree_hash_root()
    }
}

/// Grounded in `original_source` `eth/beacon/types/deposit_data.py`: "Not in
/// spec, this is for fields in Deposit" — `amount` (gwei) and the deposit
/// contract's `timestamp` alongside the signed `deposit_input`.
#[derive(Debug, PartialEq, Clone)]
pub struct DepositData {
    pub deposit_input: DepositInput,
    pub amount: u64,
    pub timestamp: u64,
}

impl Encodable for DepositData {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append(&self.deposit_input);
        s.append(&self.amount);
        s.append(&self.timestamp);
    }
}

impl Decodable for DepositData {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (deposit_input, index) = DepositInput::ssz_decode(bytes, index)?;
        let (amount, index) = u64::ssz_decode(bytes, index)?;
        let (timestamp, index) = u64::ssz_decode(bytes, index)?;
        Ok((
            Self {
                deposit_input,
                amount,
                timestamp,
            },
            index,
        ))
    }
}

impl TreeHash for DepositData {
    fn tree_hash_root(&self) -> Vec<u8> {
        let mut stream = SszStream::new();
        stream.append(self);
        stream.drain().tree_hash_root()
    }
}

/// A deposit in a block body, per spec.md §3 "Block": carries a Merkle
/// `branch` against the deposit contract's tree (§6 `DEPOSIT_CONTRACT_TREE_DEPTH`).
/// Branch verification is not specified by spec.md's source material (see
/// `merkle_proof`'s module doc); this type stores the branch so a caller can
/// wire up verification without this crate depending on a half-specified
/// algorithm.
#[derive(Debug, PartialEq, Clone)]
pub struct Deposit {
    pub branch: Vec<H256>,
    pub index: u64,
    pub deposit_data: DepositData,
}

impl Encodable for Deposit {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append(&self.branch);
        s.append(&self.index);
        s.append(&self.deposit_data);
    }
}

impl Decodable for Deposit {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (branch, index) = Vec::<H256>::ssz_decode(bytes, index)?;
        let (deposit_index, index) = u64::ssz_decode(bytes, index)?;
        let (deposit_data, index) = DepositData::ssz_decode(bytes, index)?;
        Ok((
            Self {
                branch,
                index: deposit_index,
                deposit_data,
            },
            index,
        ))
    }
}

impl TreeHash for Deposit {
    fn tree_hash_root(&self) -> Vec<u8> {
        let mut stream = SszStream::new();
        stream.append(self);
        stream.drain().tree_hash_root()
    }
}
