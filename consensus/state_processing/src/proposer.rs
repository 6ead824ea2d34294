use bls::{AggregateSignature, SecretKey, Signature};
use tree_hash::TreeHash;
use types::{AttestationRecord, BeaconBlock, BeaconState, Bitfield, ChainSpec, DomainKind, H256};

use crate::committee::{attestation_indices, signed_parent_hashes};
use crate::per_block_processing::{attestation_signing_root, block_signing_root};

/// Fills in `state_root` and signs a candidate block, per spec.md §6
/// "Proposer output": "a signed `BeaconBlock` whose `state_root` is the root
/// of the state produced by applying the block to its parent."
pub fn sign_block(
    mut block: BeaconBlock,
    state: &BeaconState,
    spec: &ChainSpec,
    secret_key: &SecretKey,
) -> BeaconBlock {
    block.state_root = H256::from_slice(&state.tree_hash_root());

    let domain = spec.get_domain(&state.fork_data, block.slot, DomainKind::Proposal);
    let root = block_signing_root(&block);
    block.signature = Signature::new(&root, domain, secret_key);

    block
}

/// Builds the proposer's own one-bit attestation to the shard block it is
/// proposing, per spec.md §6 "Proposer output": "optionally, one attestation
/// of its own, from the seat it occupies in the committee assigned to its own
/// slot." Returns `None` if the proposer holds no seat in that committee
/// (e.g. it was chosen as proposer for a slot with an empty committee).
pub fn attest_proposed_block(
    state: &BeaconState,
    shard_id: u64,
    shard_block_hash: H256,
    secret_key: &SecretKey,
    spec: &ChainSpec,
) -> Option<AttestationRecord> {
    let proposer_pubkey = bls::PublicKey::from_secret_key(secret_key);
    let committee = attestation_indices(state, state.slot, shard_id, spec)?;
    let seat = committee
        .iter()
        .position(|&i| state.validator_registry[i].pubkey == proposer_pubkey)?;

    let mut bitfield = Bitfield::with_capacity(committee.len());
    bitfield.set(seat, true);

    let justified_slot = state.justified_slot;
    let justified_block_hash = state.get_block_root(justified_slot).unwrap_or_else(H256::zero);
    let parent_hashes = signed_parent_hashes(state, state.slot, &[], spec);

    let message = attestation_signing_root(
        state.slot,
        &parent_hashes,
        shard_id,
        shard_block_hash,
        justified_slot,
    );
    let domain = spec.get_domain(&state.fork_data, state.slot, DomainKind::Attestation);
    let mut aggregate_signature = AggregateSignature::new();
    aggregate_signature.add(&Signature::new(&message, domain, secret_key));

    Some(AttestationRecord {
        slot: state.slot,
        shard_id,
        oblique_parent_hashes: vec![],
        shard_block_hash,
        attester_bitfield: bitfield,
        justified_slot,
        justified_block_hash,
        aggregate_signature,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::test_utils::BeaconStateBuilder;

    #[test]
    fn test_sign_block_fills_state_root() {
        let spec = ChainSpec::foundation();
        let state = BeaconStateBuilder::new(&spec).build_genesis(&spec);
        let secret_key = SecretKey::random();
        let block = BeaconBlock::genesis(H256::zero(), spec.genesis_slot);

        let signed = sign_block(block, &state, &spec, &secret_key);
        assert_eq!(signed.state_root, H256::from_slice(&state.tree_hash_root()));
    }
}
