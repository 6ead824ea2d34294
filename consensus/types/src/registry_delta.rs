use bls::PublicKey;
use ethereum_types::H256;
use ssz::{Decodable, DecodeError, Encodable, SszStream};
use tree_hash::TreeHash;

/// The flag distinguishing activation from exit in a registry-delta chain
/// link, per `original_source` `eth/beacon/enums.py`'s
/// `ValidatorRegistryDeltaFlag` (referenced by `validator_status_helpers.py`).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RegistryDeltaFlag {
    Activation,
    Exit,
}

impl Encodable for RegistryDeltaFlag {
    fn ssz_append(&self, s: &mut SszStream) {
        let tag: u8 = match self {
            RegistryDeltaFlag::Activation => 0,
            RegistryDeltaFlag::Exit => 1,
        };
        s.append(&tag);
    }
}

impl Decodable for RegistryDeltaFlag {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (tag, index) = u8::ssz_decode(bytes, index)?;
        let flag = match tag {
            0 => RegistryDeltaFlag::Activation,
            1 => RegistryDeltaFlag::Exit,
            _ => return Err(DecodeError::InvalidLength),
        };
        Ok((flag, index))
    }
}

/// One link in the registry-delta hash accumulator, per spec.md §3 (I6): "a
/// hash accumulator over ordered (prev_tip, index, pubkey, slot, flag)
/// activations/exits." Grounded directly in `validator_status_helpers.py`'s
/// `ValidatorRegistryDeltaBlock`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ValidatorRegistryDeltaBlock {
    pub latest_registry_delta_root: H256,
    pub validator_index: u64,
    pub pubkey: PublicKey,
    pub slot: u64,
    pub flag: RegistryDeltaFlag,
}

impl ValidatorRegistryDeltaBlock {
    /// The new registry-delta chain tip: this link's own root, which commits
    /// to everything before it by including `latest_registry_delta_root`.
    pub fn root(&self) -> H256 {
        H256::from_slice(&self.tree_hash_root())
    }
}

impl Encodable for ValidatorRegistryDeltaBlock {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append(&self.latest_registry_delta_root);
        s.append(&self.validator_index);
        s.append(&self.pubkey);
        s.append(&self.slot);
        s.append(&self.flag);
    }
}

impl Decodable for ValidatorRegistryDeltaBlock {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (latest_registry_delta_root, index) = H256::ssz_decode(bytes, index)?;
        let (validator_index, index) = u64::ssz_decode(bytes, index)?;
        let (pubkey, index) = PublicKey::ssz_decode(bytes, index)?;
        let (slot, index) = u64::ssz_decode(bytes, index)?;
        let (flag, index) = RegistryDeltaFlag::ssz_decode(bytes, index)?;
        Ok((
            Self {
                latest_registry_delta_root,
                validator_index,
                pubkey,
                slot,
                flag,
            },
            index,
        ))
    }
}

impl TreeHash for ValidatorRegistryDeltaBlock {
    fn tree_hash_root(&self) -> Vec<u8> {
        let mut stream = SszStream::new();
        stream.append(self);
        stream.drain().tree_hash_root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bls::Keypair;

    #[test]
    fn test_root_depends_on_prev_tip() {
        let pubkey = Keypair::random().pk;
        let a = ValidatorRegistryDeltaBlock {
            latest_registry_delta_root: H256::zero(),
            validator_index: 0,
            pubkey: pubkey.clone(),
            slot: 0,
            flag: RegistryDeltaFlag::Activation,
        };
        let b = ValidatorRegistryDeltaBlock {
            latest_registry_delta_root: a.root(),
            ..a.clone()
        };
        assert_ne!(a.root(), b.root());
    }
}
