use types::{BeaconBlock, BeaconState, H256};

/// The chain database's read surface, per spec.md §6 "Chain database
/// contract" and §1 "Out of scope": "the core reads blocks and state roots
/// through a narrow interface." Persisting new blocks/states back is owned by
/// the surrounding node, not by this crate, so `persist_block`/`persist_state`
/// have no counterpart here.
pub trait ChainDBReader {
    fn get_block_by_hash(&self, hash: H256) -> Option<BeaconBlock>;
    fn get_canonical_head(&self) -> BeaconBlock;
    fn get_canonical_block_hash_by_slot(&self, slot: u64) -> Option<H256>;
    fn get_state_by_root(&self, root: H256) -> Option<BeaconState>;
}
