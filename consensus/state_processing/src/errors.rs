use std::fmt;

use safe_arith::ArithError;
use types::BeaconStateError;

/// Errors from the per-block transition (spec.md §4.6), grouped the way
/// spec.md §7 groups its taxonomy: a caller matches on *kind*
/// (referential/cryptographic/consensus) to decide whether to also mark the
/// producing peer malicious.
#[derive(Debug, PartialEq, Clone)]
pub enum BlockProcessingError {
    /// Referential: step 1, "look up the parent block; fail ... if absent."
    UnknownParentBlock,
    /// Cryptographic: step 3, the parent block's proposer signature did not verify.
    InvalidParentProposerSignature,
    /// Cryptographic: step 4, `H^{randao_layers}(reveal) != commitment`.
    InvalidRandaoReveal,
    /// Consensus: an attestation targeted a (slot, shard) with no assigned committee.
    NoCommitteeForAttestation { slot: u64, shard: u64 },
    /// Consensus: "bitfield longer than committee."
    BitfieldWrongLength { expected: usize, found: usize },
    /// Consensus: "attestation justifying an unknown hash."
    AttestationJustifiesUnknownHash,
    /// Cryptographic: an attestation's aggregate signature did not verify.
    InvalidAttestationSignature,
    /// A state mutation invoked from block processing failed.
    BeaconState(BeaconStateError),
}

impl From<BeaconStateError> for BlockProcessingError {
    fn from(e: BeaconStateError) -> Self {
        BlockProcessingError::BeaconState(e)
    }
}

impl fmt::Display for BlockProcessingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BlockProcessingError::UnknownParentBlock => write!(f, "unknown parent block"),
            BlockProcessingError::InvalidParentProposerSignature => {
                write!(f, "parent block's proposer signature did not verify")
            }
            BlockProcessingError::InvalidRandaoReveal => write!(f, "randao reveal did not match commitment"),
            BlockProcessingError::NoCommitteeForAttestation { slot, shard } => write!(
                f,
                "no committee assigned to shard {} at slot {}",
                shard, slot
            ),
            BlockProcessingError::BitfieldWrongLength { expected, found } => write!(
                f,
                "attestation bitfield length {} did not match committee size {}",
                found, expected
            ),
            BlockProcessingError::AttestationJustifiesUnknownHash => {
                write!(f, "attestation justifies a hash this state never recorded")
            }
            BlockProcessingError::InvalidAttestationSignature => {
                write!(f, "attestation aggregate signature did not verify")
            }
            BlockProcessingError::BeaconState(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for BlockProcessingError {}

/// Errors from the per-cycle transition (spec.md §4.7). Currently these only
/// arise from state mutations that themselves failed; the accounting passes
/// (justification, crosslinks, rewards, advance, dynasty) are infallible
/// given a structurally valid state.
#[derive(Debug, PartialEq, Clone)]
pub enum EpochProcessingError {
    BeaconState(BeaconStateError),
    Arith(ArithError),
}

impl From<BeaconStateError> for EpochProcessingError {
    fn from(e: BeaconStateError) -> Self {
        EpochProcessingError::BeaconState(e)
    }
}

impl From<ArithError> for EpochProcessingError {
    fn from(e: ArithError) -> Self {
        EpochProcessingError::Arith(e)
    }
}

impl fmt::Display for EpochProcessingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EpochProcessingError::BeaconState(e) => write!(f, "{}", e),
            EpochProcessingError::Arith(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for EpochProcessingError {}

/// The top-level `state_transition` function's error, per spec.md §2
/// "Control flow": "State roots are recomputed and compared against the
/// block's claimed roots; mismatch is fatal" and §7 "Invariant violation ...
/// FATAL; abort the process rather than corrupt state."
#[derive(Debug, PartialEq, Clone)]
pub enum StateTransitionError {
    Block(BlockProcessingError),
    Epoch(EpochProcessingError),
    /// Consensus: the recomputed state root did not match `block.state_root`.
    StateRootMismatch,
    /// Fatal: one of (I1)-(I6) failed after a transition that otherwise completed.
    InvariantViolation(BeaconStateError),
}

impl fmt::Display for StateTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StateTransitionError::Block(e) => write!(f, "{}", e),
            StateTransitionError::Epoch(e) => write!(f, "{}", e),
            StateTransitionError::StateRootMismatch => {
                write!(f, "recomputed state root did not match the block's claimed root")
            }
            StateTransitionError::InvariantViolation(e) => write!(f, "fatal: {}", e),
        }
    }
}

impl std::error::Error for StateTransitionError {}
