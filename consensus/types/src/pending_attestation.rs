use ssz::{Decodable, DecodeError, Encodable, SszStream};
use tree_hash::TreeHash;

use crate::AttestationRecord;

/// An attestation sitting in `BeaconState::pending_attestations`, per spec.md
/// §4.6 step 6 ("pending_attestations = prior ‖ block.attestations") and §4.7
/// "Prune pending attestations" / "Rewards and penalties" (the includer bonus
/// needs the slot the attestation was included at to resolve the including
/// proposer).
#[derive(Debug, PartialEq, Clone)]
pub struct PendingAttestation {
    pub data: AttestationRecord,
    /// The slot of the block that included this attestation in its body.
    pub slot_included: u64,
}

impl Encodable for PendingAttestation {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append(&self.data);
        s.append(&self.slot_included);
    }
}

impl Decodable for PendingAttestation {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (data, index) = AttestationRecord::ssz_decode(bytes, index)?;
        let (slot_included, index) = u64::ssz_decode(bytes, index)?;
        Ok((Self { data, slot_included }, index))
    }
}

impl TreeHash for PendingAttestation {
    fn tree_hash_root(&self) -> Vec<u8> {
        let mut stream = SszStream::new();
        stream.append(self);
        stream.drain().tree_hash_root()
    }
}
