use bls::PublicKey;
use ethereum_types::H256;
use ssz::{Decodable, DecodeError, Encodable, SszStream};
use tree_hash::TreeHash;

bitflags::bitflags! {
    /// Status-flag bitfield, per spec.md §3 "Validator record": "status-flag
    /// bitfield (INITIAL, INITIATED_EXIT, WITHDRAWABLE)".
    #[derive(Default)]
    pub struct StatusFlags: u64 {
        const INITIAL = 0;
        const INITIATED_EXIT = 1;
        const WITHDRAWABLE = 2;
    }
}

impl Encodable for StatusFlags {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append(&self.bits());
    }
}

impl Decodable for StatusFlags {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (bits, index) = u64::ssz_decode(bytes, index)?;
        let flags = StatusFlags::from_bits(bits).ok_or(DecodeError::InvalidLength)?;
        Ok((flags, index))
    }
}

impl TreeHash for StatusFlags {
    fn tree_hash_root(&self) -> Vec<u8> {
        self.bits().tree_hash_root()
    }
}

/// A validator's registry entry, per spec.md §3 "Validator record". Fields
/// and field order are grounded directly in the original implementation's
/// `ValidatorRecord` (`original_source` `eth/beacon/types/validator_records.py`).
#[derive(Debug, PartialEq, Clone)]
pub struct ValidatorRecord {
    pub pubkey: PublicKey,
    pub withdrawal_credentials: H256,
    pub randao_commitment: H256,
    pub randao_layers: u64,
    pub activation_slot: u64,
    pub exit_slot: u64,
    pub withdrawal_slot: u64,
    pub penalized_slot: u64,
    pub exit_count: u64,
    pub status_flags: StatusFlags,
}

impl ValidatorRecord {
    /// Constructs a freshly-deposited validator: every lifecycle slot is the
    /// far-future sentinel, per spec.md §4.5 "Deposit processing" ("append a
    /// pending validator (all lifecycle slots = far-future)").
    pub fn pending(
        pubkey: PublicKey,
        withdrawal_credentials: H256,
        randao_commitment: H256,
        far_future_slot: u64,
    ) -> Self {
        Self {
            pubkey,
            withdrawal_credentials,
            randao_commitment,
            randao_layers: 0,
            activation_slot: far_future_slot,
            exit_slot: far_future_slot,
            withdrawal_slot: far_future_slot,
            penalized_slot: far_future_slot,
            exit_count: 0,
            status_flags: StatusFlags::default(),
        }
    }

    /// True iff the validator is active at `slot`, per spec.md §3: "A
    /// validator is *active at slot s* iff `activation_slot ≤ s <
    /// exit_slot`."
    pub fn is_active_at(&self, slot: u64) -> bool {
        self.activation_slot <= slot && slot < self.exit_slot
    }
}

impl Encodable for ValidatorRecord {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append(&self.pubkey);
        s.append(&self.withdrawal_credentials);
        s.append(&self.randao_commitment);
        s.append(&self.randao_layers);
        s.append(&self.activation_slot);
        s.append(&self.exit_slot);
        s.append(&self.withdrawal_slot);
        s.append(&self.penalized_slot);
        s.append(&self.exit_count);
        s.append(&self.status_flags);
    }
}

impl Decodable for ValidatorRecord {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (pubkey, index) = PublicKey::ssz_decode(bytes, index)?;
        let (withdrawal_credentials, index) = H256::ssz_decode(bytes, index)?;
        let (randao_commitment, index) = H256::ssz_decode(bytes, index)?;
        let (randao_layers, index) = u64::ssz_decode(bytes, index)?;
        let (activation_slot, index) = u64::ssz_decode(bytes, index)?;
        let (exit_slot, index) = u64::ssz_decode(bytes, index)?;
        let (withdrawal_slot, index) = u64::ssz_decode(bytes, index)?;
        let (penalized_slot, index) = u64::ssz_decode(bytes, index)?;
        let (exit_count, index) = u64::ssz_decode(bytes, index)?;
        let (status_flags, index) = StatusFlags::ssz_decode(bytes, index)?;
        Ok((
            Self {
                pubkey,
                withdrawal_credentials,
                randao_commitment,
                randao_layers,
                activation_slot,
                exit_slot,
                withdrawal_slot,
                penalized_slot,
                exit_count,
                status_flags,
            },
            index,
        ))
    }
}

impl TreeHash for ValidatorRecord {
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

    const FAR_FUTURE_SLOT: u64 = 1 << 63;

    #[test]
    fn test_is_active_at() {
        let mut v = ValidatorRecord::pending(
            Keypair::random().pk,
            H256::zero(),
            H256::zero(),
            FAR_FUTURE_SLOT,
        );
        v.activation_slot = 10;
        v.exit_slot = 20;
        assert!(!v.is_active_at(9));
        assert!(v.is_active_at(10));
        assert!(v.is_active_at(19));
        assert!(!v.is_active_at(20));
    }

    #[test]
    fn test_pending_has_far_future_slots() {
        let v = ValidatorRecord::pending(
            Keypair::random().pk,
            H256::zero(),
            H256::zero(),
            FAR_FUTURE_SLOT,
        );
        assert_eq!(v.activation_slot, FAR_FUTURE_SLOT);
        assert_eq!(v.exit_slot, FAR_FUTURE_SLOT);
        assert_eq!(v.withdrawal_slot, FAR_FUTURE_SLOT);
        assert_eq!(v.penalized_slot, FAR_FUTURE_SLOT);
    }
}
