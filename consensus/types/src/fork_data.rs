use ssz::{Decodable, DecodeError, Encodable, SszStream};
use tree_hash::TreeHash;

/// Fork metadata carried in `BeaconState`, per spec.md §3 "Misc": "fork-data
/// (pre/post version + fork slot)". `get_domain` (§4.1 "Domain separation")
/// selects `pre_fork_version` or `post_fork_version` by comparing a slot to
/// `fork_slot`.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct ForkData {
    pub pre_fork_version: u64,
    pub post_fork_version: u64,
    pub fork_slot: u64,
}

impl ForkData {
    /// Returns the fork version in effect at `slot`.
    pub fn version_at_slot(&self, slot: u64) -> u64 {
        if slot < self.fork_slot {
            self.pre_fork_version
        } else {
            self.post_fork_version
        }
    }
}

impl Encodable for ForkData {
    fn ssz_append(&self, s: &mut SszStream) {
        s.append(&self.pre_fork_version);
        s.append(&self.post_fork_version);
        s.append(&self.fork_slot);
    }
}

impl Decodable for ForkData {
    fn ssz_decode(bytes: &[u8], index: usize) -> Result<(Self, usize), DecodeError> {
        let (pre_fork_version, index) = u64::ssz_decode(bytes, index)?;
        let (post_fork_version, index) = u64::ssz_decode(bytes, index)?;
        let (fork_slot, index) = u64::ssz_decode(bytes, index)?;
        Ok((
            Self {
                pre_fork_version,
                post_fork_version,
                fork_slot,
            },
            index,
        ))
    }
}

impl TreeHash for ForkData {
    fn tree_hash_root(&self) -> Vec<u8> {
        let mut stream = SszStream::new();
        stream.append(self);
        stream.drain().tree_hash_root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_at_slot() {
        let fork = ForkData {
            pre_fork_version: 0,
            post_fork_version: 1,
            fork_slot: 100,
        };
        assert_eq!(fork.version_at_slot(0), 0);
        assert_eq!(fork.version_at_slot(99), 0);
        assert_eq!(fork.version_at_slot(100), 1);
        assert_eq!(fork.version_at_slot(200), 1);
    }
}
