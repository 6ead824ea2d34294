use std::fmt;

use safe_arith::ArithError;

/// Errors that can occur while mutating or reading a `BeaconState`, grouped the
/// way spec.md §7 groups its taxonomy: structural, referential, cryptographic,
/// consensus and invariant-violation errors all end up here so callers can
/// match on *kind* rather than parse strings.
#[derive(Debug, PartialEq, Clone)]
pub enum BeaconStateError {
    /// A validator or balance index was out of range for the registry.
    UnknownValidator(usize),
    /// A shard id had no committee assigned to it at the requested slot.
    NoCommitteeForShard { slot: u64, shard: u64 },
    /// `slot` fell outside the range addressable by a ring buffer of the given
    /// length (used for `latest_block_roots`, `latest_randao_mixes`).
    SlotOutOfRange,
    /// An arithmetic operation on a balance, slot or index overflowed or
    /// divided by zero.
    ArithError(ArithError),
    /// A deposit's proof-of-possession did not verify against its claimed
    /// public key, per spec.md §4.5 "Deposit processing".
    InvalidProofOfPossession,
    /// A structural invariant from spec.md §3 (I1)-(I6) failed after a
    /// transition completed. This is not locally recoverable: spec.md §7
    /// classifies it as fatal, a sign of an implementation bug rather than of
    /// adversarial input.
    InvariantViolation(&'static str),
}

impl From<ArithError> for BeaconStateError {
    fn from(e: ArithError) -> Self {
        BeaconStateError::ArithError(e)
    }
}

impl fmt::Display for BeaconStateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BeaconStateError::UnknownValidator(i) => write!(f, "unknown validator index {}", i),
            BeaconStateError::NoCommitteeForShard { slot, shard } => {
                write!(f, "no committee for shard {} at slot {}", shard, slot)
            }
            BeaconStateError::SlotOutOfRange => write!(f, "slot out of ring-buffer range"),
            BeaconStateError::ArithError(e) => write!(f, "arithmetic error: {}", e),
            BeaconStateError::InvalidProofOfPossession => {
                write!(f, "deposit proof-of-possession did not verify")
            }
            BeaconStateError::InvariantViolation(which) => {
                write!(f, "invariant violation: {}", which)
            }
        }
    }
}

impl std::error::Error for BeaconStateError {}
