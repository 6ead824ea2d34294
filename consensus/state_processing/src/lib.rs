//! The beacon-chain state transition function, per spec.md §4.6-§4.7: one
//! pure `(state, block) -> state'` step composed of a per-block transition
//! followed by zero or more per-cycle transitions.
//!
//! Grounded throughout in the teacher's `state_processing` crate (same name,
//! same split into a per-block module, a per-epoch module, and a thin
//! top-level driver); the committee/shuffling/vote-cache/proposer pieces are
//! this spec's own, broken out into their own modules the way the teacher
//! keeps `common.rs`/`verify_attestation.rs` separate from the per-slot
//! driver.

pub mod chain_db;
pub mod committee;
pub mod errors;
pub mod genesis;
pub mod per_block_processing;
pub mod per_cycle_processing;
pub mod proposer;
pub mod vote_cache;

pub use chain_db::ChainDBReader;
pub use errors::{BlockProcessingError, EpochProcessingError, StateTransitionError};
pub use vote_cache::VoteCache;

use tree_hash::TreeHash;
use types::{BeaconBlock, BeaconState, ChainSpec};

/// The top-level state transition, per spec.md §2 "Control flow": run the
/// per-block transition, then run the per-cycle transition while the block's
/// slot has crossed another cycle boundary, then recompute and compare the
/// state root, then re-check every structural invariant.
pub fn state_transition<D: ChainDBReader>(
    state: BeaconState,
    block: &BeaconBlock,
    chain_db: &D,
    vote_cache: &mut VoteCache,
    spec: &ChainSpec,
) -> Result<BeaconState, StateTransitionError> {
    let state = per_block_processing::process_block(state, block, chain_db, vote_cache, spec)
        .map_err(StateTransitionError::Block)?;

    let state = per_cycle_processing::per_cycle_transition(state, block, vote_cache, spec)
        .map_err(StateTransitionError::Epoch)?;

    let computed_root = state.tree_hash_root();
    if computed_root.as_slice() != block.state_root.as_bytes() {
        return Err(StateTransitionError::StateRootMismatch);
    }

    state
        .check_invariants(spec)
        .map_err(StateTransitionError::InvariantViolation)?;

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::test_utils::BeaconStateBuilder;
    use types::H256;

    struct NullChainDB {
        genesis_block: BeaconBlock,
    }

    impl ChainDBReader for NullChainDB {
        fn get_block_by_hash(&self, hash: H256) -> Option<BeaconBlock> {
            if hash == self.genesis_block.parent_root || hash == H256::zero() {
                Some(self.genesis_block.clone())
            } else {
                None
            }
        }

        fn get_canonical_head(&self) -> BeaconBlock {
            self.genesis_block.clone()
        }

        fn get_canonical_block_hash_by_slot(&self, _slot: u64) -> Option<H256> {
            None
        }

        fn get_state_by_root(&self, _root: H256) -> Option<BeaconState> {
            None
        }
    }

    #[test]
    fn test_unknown_parent_is_rejected() {
        let spec = ChainSpec::foundation();
        let state = BeaconStateBuilder::new(&spec).build_genesis(&spec);
        let genesis_block = BeaconBlock::genesis(H256::zero(), spec.genesis_slot);
        let chain_db = NullChainDB { genesis_block: genesis_block.clone() };
        let mut vote_cache = VoteCache::new(8);

        let mut block = genesis_block;
        block.slot = 1;
        block.parent_root = H256::from_low_u64_be(0xdead);

        let result = state_transition(state, &block, &chain_db, &mut vote_cache, &spec);
        assert_eq!(
            result,
            Err(StateTransitionError::Block(BlockProcessingError::UnknownParentBlock))
        );
    }

    #[test]
    fn test_state_root_mismatch_is_rejected() {
        let spec = ChainSpec::foundation();
        let state = BeaconStateBuilder::new(&spec).build_genesis(&spec);
        let genesis_block = BeaconBlock::genesis(H256::zero(), spec.genesis_slot);
        let chain_db = NullChainDB { genesis_block: genesis_block.clone() };
        let mut vote_cache = VoteCache::new(8);

        let mut block = genesis_block;
        block.slot = spec.genesis_slot;
        block.parent_root = H256::zero();
        block.state_root = H256::from_low_u64_be(0xbad);

        let result = state_transition(state, &block, &chain_db, &mut vote_cache, &spec);
        assert_eq!(result, Err(StateTransitionError::StateRootMismatch));
    }
}
