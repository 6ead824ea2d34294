//! Test-only fixtures: deterministic keypair generation, a minimal
//! `TestRandom` trait, and `BeaconStateBuilder`. Grounded in the teacher's
//! sampled `eth2/types/src/test_utils/generate_deterministic_keypairs.rs` and
//! `eth2/types/src/beacon_state/builder.rs`, generalized from that crate's
//! "epoch" wording back to this spec's "cycle/dynasty" wording.

mod beacon_state_builder;
mod keypairs;
mod test_random;

pub use beacon_state_builder::BeaconStateBuilder;
pub use keypairs::{generate_deterministic_keypair, generate_deterministic_keypairs};
pub use test_random::TestRandom;
