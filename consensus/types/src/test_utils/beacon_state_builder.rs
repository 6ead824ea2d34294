use bls::{Keypair, Signature};
use tree_hash::TreeHash;

use crate::test_utils::generate_deterministic_keypairs;
use crate::{BeaconState, ChainSpec, Deposit, DepositData, DepositInput, DomainKind, ForkData, H256};

/// Builds a `BeaconState` for use in tests, mirroring the teacher's own
/// `BeaconStateBuilder`: construct with a validator count, call
/// `build_genesis`, optionally mutate the returned state further. Grounded in
/// the teacher's sampled `eth2/types/src/beacon_state/builder.rs`
/// `with_random_validators`/`genesis`, generalized from random keypairs to
/// deterministic ones (so fixtures are reproducible) and from that crate's
/// `Eth1Data` to this spec's `processed_pow_receipt_root`.
pub struct BeaconStateBuilder {
    pub keypairs: Vec<Keypair>,
    pub genesis_time: u64,
}

impl BeaconStateBuilder {
    /// A builder for a 64-validator genesis state, each validator funded at
    /// exactly `MAX_DEPOSIT` gwei so every one activates at genesis.
    pub fn new(spec: &ChainSpec) -> Self {
        Self::with_validator_count(64, spec)
    }

    pub fn with_validator_count(validator_count: usize, _spec: &ChainSpec) -> Self {
        Self {
            keypairs: generate_deterministic_keypairs(validator_count),
            genesis_time: 0,
        }
    }

    /// Builds one fully-funded, correctly proof-of-possession-signed deposit
    /// per keypair, ready for `BeaconState::apply_deposit`'s verification.
    fn deposits(&self, spec: &ChainSpec) -> Vec<Deposit> {
        let fork_data = ForkData {
            pre_fork_version: spec.genesis_fork_version,
            post_fork_version: spec.genesis_fork_version,
            fork_slot: spec.genesis_slot,
        };
        let domain = spec.get_domain(&fork_data, spec.genesis_slot, DomainKind::Deposit);

        self.keypairs
            .iter()
            .map(|keypair| {
                let mut input = DepositInput {
                    pubkey: keypair.pk.clone(),
                    withdrawal_credentials: H256::zero(),
                    randao_commitment: H256::zero(),
                    proof_of_possession: Signature::empty(),
                };
                let root = input.signing_root();
                input.proof_of_possession = Signature::new(&root, domain, &keypair.sk);

                Deposit {
                    branch: vec![],
                    index: 0,
                    deposit_data: DepositData {
                        deposit_input: input,
                        amount: spec.max_deposit_gwei(),
                        timestamp: self.genesis_time,
                    },
                }
            })
            .collect()
    }

    /// Runs `BeaconState::genesis` over the builder's deterministic deposits.
    pub fn build_genesis(&self, spec: &ChainSpec) -> BeaconState {
        let deposits = self.deposits(spec);
        BeaconState::genesis(self.genesis_time, &deposits, H256::zero(), spec)
            .expect("deterministic genesis deposits are well-formed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_genesis_activates_every_validator() {
        let spec = ChainSpec::foundation();
        let builder = BeaconStateBuilder::new(&spec);
        let state = builder.build_genesis(&spec);

        assert_eq!(state.validator_registry.len(), 64);
        for validator in &state.validator_registry {
            assert_eq!(validator.activation_slot, spec.genesis_slot);
        }
    }
}
