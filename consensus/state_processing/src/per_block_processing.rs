use tree_hash::TreeHash;
use types::{AttestationRecord, BeaconBlock, BeaconState, ChainSpec, DomainKind, H256};

use bls::AggregatePublicKey;
use ssz::SszStream;

use crate::chain_db::ChainDBReader;
use crate::committee::{attestation_indices, beacon_proposer_index, signed_parent_hashes};
use crate::errors::BlockProcessingError;
use crate::vote_cache::VoteCache;

/// The message a proposer signs over a block, excluding the signature field
/// itself — a signature cannot authenticate a root that depends on its own
/// bytes, per spec.md §4.2's canonical-serialization rule applied to §4.1
/// "Sign".
pub fn block_signing_root(block: &BeaconBlock) -> Vec<u8> {
    let mut s = SszStream::new();
    s.append(&block.slot);
    s.append(&block.parent_root);
    s.append(&block.state_root);
    s.append(&block.randao_reveal);
    s.append(&block.candidate_pow_receipt_root);
    s.append(&block.body);
    s.drain().tree_hash_root()
}

/// The message an attester signs, per spec.md §6 "Proposer output": "a
/// message derived from (slot, signed-parent-hashes, shard id, shard block
/// hash, justified slot)."
pub fn attestation_signing_root(
    slot: u64,
    parent_hashes: &[H256],
    shard_id: u64,
    shard_block_hash: H256,
    justified_slot: u64,
) -> Vec<u8> {
    let mut s = SszStream::new();
    s.append(&slot);
    s.append(&parent_hashes.to_vec());
    s.append(&shard_id);
    s.append(&shard_block_hash);
    s.append(&justified_slot);
    s.drain().tree_hash_root()
}

/// Step 3: "If the parent is not the genesis block, validate the parent
/// block's proposer signature against the committee at the parent's slot."
pub fn validate_parent_block_proposer(
    state: &BeaconState,
    parent: &BeaconBlock,
    spec: &ChainSpec,
) -> Result<(), BlockProcessingError> {
    if parent.slot == spec.genesis_slot {
        return Ok(());
    }

    let proposer_index = beacon_proposer_index(state, parent.slot, spec).ok_or(
        BlockProcessingError::NoCommitteeForAttestation {
            slot: parent.slot,
            shard: 0,
        },
    )?;
    let proposer = &state.validator_registry[proposer_index];

    let domain = spec.get_domain(&state.fork_data, parent.slot, DomainKind::Proposal);
    let root = block_signing_root(parent);

    if parent.signature.verify(&root, domain, &proposer.pubkey) {
        Ok(())
    } else {
        Err(BlockProcessingError::InvalidParentProposerSignature)
    }
}

/// Step 4: "Validate the RANDAO reveal (currently a stub; an implementation
/// must check `H^{randao_layers}(reveal) == commitment`)."
pub fn validate_randao_reveal(
    proposer_index: usize,
    state: &BeaconState,
    randao_reveal: H256,
) -> Result<(), BlockProcessingError> {
    let validator = &state.validator_registry[proposer_index];

    let mut layered = randao_reveal.as_bytes().to_vec();
    for _ in 0..validator.randao_layers {
        layered = eth2_hashing::hash(&layered);
    }

    if layered.as_slice() == validator.randao_commitment.as_bytes() {
        Ok(())
    } else {
        Err(BlockProcessingError::InvalidRandaoReveal)
    }
}

/// Validates one attestation, per spec.md §4.6 step 5 and §7's
/// cryptographic/consensus taxonomy: committee membership, bitfield length,
/// justified-hash agreement, then the aggregate signature. Returns the
/// committee it resolved against, for the vote-cache fold.
pub fn validate_attestation<'a>(
    state: &'a BeaconState,
    attestation: &AttestationRecord,
    spec: &ChainSpec,
) -> Result<&'a [usize], BlockProcessingError> {
    let committee = attestation_indices(state, attestation.slot, attestation.shard_id, spec).ok_or(
        BlockProcessingError::NoCommitteeForAttestation {
            slot: attestation.slot,
            shard: attestation.shard_id,
        },
    )?;

    if attestation.attester_bitfield.len() != committee.len() {
        return Err(BlockProcessingError::BitfieldWrongLength {
            expected: committee.len(),
            found: attestation.attester_bitfield.len(),
        });
    }

    match state.get_block_root(attestation.justified_slot) {
        Some(root) if root == attestation.justified_block_hash => {}
        _ => return Err(BlockProcessingError::AttestationJustifiesUnknownHash),
    }

    let parent_hashes = signed_parent_hashes(
        state,
        attestation.slot,
        &attestation.oblique_parent_hashes,
        spec,
    );
    let message = attestation_signing_root(
        attestation.slot,
        &parent_hashes,
        attestation.shard_id,
        attestation.shard_block_hash,
        attestation.justified_slot,
    );

    let mut aggregate_pubkey = AggregatePublicKey::new();
    for (committee_index, &validator_index) in committee.iter().enumerate() {
        if attestation.attester_bitfield.get(committee_index) {
            aggregate_pubkey.add(&state.validator_registry[validator_index].pubkey);
        }
    }

    let domain = spec.get_domain(&state.fork_data, attestation.slot, DomainKind::Attestation);
    if !attestation
        .aggregate_signature
        .verify(&message, domain, &aggregate_pubkey)
    {
        return Err(BlockProcessingError::InvalidAttestationSignature);
    }

    Ok(committee)
}

/// The per-block transition, per spec.md §4.6: look up the parent, advance
/// the block-roots ring, validate the parent's proposer signature and the
/// proposing block's RANDAO reveal, validate and fold every attestation into
/// the vote cache, and append the block's attestations to
/// `pending_attestations`.
pub fn process_block<D: ChainDBReader>(
    mut state: BeaconState,
    block: &BeaconBlock,
    chain_db: &D,
    vote_cache: &mut VoteCache,
    spec: &ChainSpec,
) -> Result<BeaconState, BlockProcessingError> {
    let parent = chain_db
        .get_block_by_hash(block.parent_root)
        .ok_or(BlockProcessingError::UnknownParentBlock)?;

    state.slot = block.slot;

    // Step 2: "shifting the ring buffer forward ... writing block.parent_hash
    // into the slot position." With `slot mod length` addressing this is a
    // single write; slots skipped between parent and block keep whatever
    // root they already held.
    let index = state.block_root_index(block.slot);
    state.latest_block_roots[index] = block.parent_root;

    validate_parent_block_proposer(&state, &parent, spec)?;

    let proposer_index = beacon_proposer_index(&state, block.slot, spec).ok_or(
        BlockProcessingError::NoCommitteeForAttestation {
            slot: block.slot,
            shard: 0,
        },
    )?;
    validate_randao_reveal(proposer_index, &state, block.randao_reveal)?;

    let block_hash = H256::from_slice(&block.tree_hash_root());

    for attestation in &block.body.attestations {
        let committee = validate_attestation(&state, attestation, spec)?.to_vec();
        let parent_hashes = signed_parent_hashes(
            &state,
            attestation.slot,
            &attestation.oblique_parent_hashes,
            spec,
        );
        vote_cache.record_attestation(block_hash, &parent_hashes, attestation, &committee, &state);
    }

    state.pending_attestations.extend(block.body.attestations.iter().cloned().map(|data| {
        types::PendingAttestation {
            data,
            slot_included: block.slot,
        }
    }));

    log::debug!(
        "processed block at slot {} with {} attestations",
        block.slot,
        block.body.attestations.len()
    );

    Ok(state)
}
