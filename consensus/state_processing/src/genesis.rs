use tree_hash::TreeHash;
use types::{BeaconBlock, BeaconState, BeaconStateError, ChainSpec, Deposit, H256};

/// Builds the genesis state and its matching genesis block, per spec.md
/// §4.4 "Genesis Builder": apply every initial deposit, activate validators
/// funded at `MAX_DEPOSIT`, derive the first shuffling from a zero seed, and
/// wrap the resulting state root in a genesis `BeaconBlock`.
///
/// `BeaconState::genesis` (in `types`) does steps 1-3; this just adds step 4,
/// wrapping the result in the block the chain database seeds its canonical
/// head with.
pub fn genesis(
    genesis_time: u64,
    initial_validator_deposits: &[Deposit],
    processed_pow_receipt_root: H256,
    spec: &ChainSpec,
) -> Result<(BeaconState, BeaconBlock), BeaconStateError> {
    let state = BeaconState::genesis(
        genesis_time,
        initial_validator_deposits,
        processed_pow_receipt_root,
        spec,
    )?;

    let state_root = H256::from_slice(&state.tree_hash_root());
    let block = BeaconBlock::genesis(state_root, spec.genesis_slot);

    Ok((state, block))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bls::{Keypair, Signature};
    use types::{DepositData, DepositInput, DomainKind, ForkData};

    fn make_deposit(keypair: &Keypair, spec: &ChainSpec) -> Deposit {
        let input = DepositInput {
            pubkey: keypair.pk.clone(),
            withdrawal_credentials: H256::zero(),
            randao_commitment: H256::zero(),
            proof_of_possession: Signature::empty(),
        };
        let root = input.signing_root();
        let domain = spec.get_domain(&ForkData::default(), spec.genesis_slot, DomainKind::Deposit);
        let proof_of_possession = Signature::new(&root, domain, &keypair.sk);

        Deposit {
            branch: vec![],
            index: 0,
            deposit_data: DepositData {
                deposit_input: DepositInput {
                    proof_of_possession,
                    ..input
                },
                amount: spec.max_deposit_gwei(),
                timestamp: 0,
            },
        }
    }

    #[test]
    fn test_genesis_block_references_genesis_state_root() {
        let spec = ChainSpec::foundation();
        let keypair = Keypair::random();
        let deposit = make_deposit(&keypair, &spec);

        let (state, block) = genesis(0, &[deposit], H256::zero(), &spec).unwrap();

        assert_eq!(block.slot, spec.genesis_slot);
        assert_eq!(block.parent_root, H256::zero());
        assert_eq!(block.state_root, H256::from_slice(&state.tree_hash_root()));
    }
}
