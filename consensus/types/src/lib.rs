//! The data model for the beacon chain state machine described by spec.md
//! §3: every type the crystallized/active state, block and transition
//! functions operate on. Module layout mirrors the teacher's own
//! `beacon_chain/types` crate: one file per top-level record, re-exported
//! flat from the crate root.

mod attestation_record;
mod beacon_block;
mod beacon_state;
mod bitfield;
mod casper_slashing;
mod chain_spec;
mod committee;
mod crosslink_record;
mod custody;
mod deposit;
mod errors;
mod exit;
mod fork_data;
mod pending_attestation;
mod proposer_slashing;
mod registry_delta;
mod shard_and_committee;
mod validator_lifecycle;
mod validator_record;

pub mod test_utils;

pub use attestation_record::AttestationRecord;
pub use beacon_block::{BeaconBlock, BeaconBlockBody};
pub use beacon_state::{BeaconState, CandidatePoWReceiptRootRecord};
pub use bitfield::Bitfield;
pub use casper_slashing::{CasperSlashing, SlashableVoteData};
pub use chain_spec::{ChainSpec, DomainKind};
pub use committee::get_shuffling;
pub use crosslink_record::CrosslinkRecord;
pub use custody::{CustodyChallenge, CustodyReseed, CustodyResponse};
pub use deposit::{Deposit, DepositData, DepositInput};
pub use errors::BeaconStateError;
pub use exit::Exit;
pub use fork_data::ForkData;
pub use pending_attestation::PendingAttestation;
pub use proposer_slashing::{ProposalSignedData, ProposerSlashing};
pub use registry_delta::{RegistryDeltaFlag, ValidatorRegistryDeltaBlock};
pub use shard_and_committee::ShardAndCommittee;
pub use validator_record::{StatusFlags, ValidatorRecord};

pub use ethereum_types::{Address, H256};

/// A Gwei-denominated balance, per spec.md GLOSSARY: "all balances are
/// integral Gwei (10⁻⁹ ETH)."
pub type Gwei = u64;

/// An index into `BeaconState::validator_registry`/`validator_balances`.
pub type ValidatorIndex = usize;

/// A shard identifier, per spec.md §6 (`SHARD_COUNT`).
pub type ShardId = u64;

/// A SHA-256/Keccak-style 32-byte hash, used throughout as block/state/merkle
/// roots. Re-exported under this name because spec.md's own prose calls it
/// "Hash256" rather than `H256`.
pub type Hash256 = H256;
