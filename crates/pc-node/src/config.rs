use pc_pow::{PowError, ProofOfWork, ProofSeed, DEFAULT_DIFFICULTY};
use uuid::Uuid;

/// Sender recorded on mining reward transactions.
pub const REWARD_SENDER: &str = "0";

/// Full configuration for a [`crate::Node`].
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Leading zero hex digits a proof digest must have.  Defaults to `4`.
    pub difficulty: u32,

    /// Where proof searches start.
    pub proof_seed: ProofSeed,

    /// When `Some(amount)`, every mined block first receives a reward
    /// transaction from [`REWARD_SENDER`] to this node's identifier.
    pub mining_reward: Option<u64>,

    /// Identifier of this node; the recipient of mining rewards.
    pub node_id: Uuid,

    /// When `true` the binary embedding this node should suppress log output.
    /// The library itself does not initialise a tracing subscriber; this flag
    /// is a signal to the host binary.
    pub quiet: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            proof_seed: ProofSeed::default(),
            mining_reward: None,
            node_id: Uuid::new_v4(),
            quiet: false,
        }
    }
}

impl NodeConfig {
    /// Default config with a specific difficulty.
    pub fn with_difficulty(difficulty: u32) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Build the proof-of-work engine described by this config.
    pub fn proof_of_work(&self) -> Result<ProofOfWork, PowError> {
        Ok(ProofOfWork::new(self.difficulty)?.with_seed(self.proof_seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = NodeConfig::default();
        assert_eq!(config.difficulty, DEFAULT_DIFFICULTY);
        assert_eq!(config.proof_seed, ProofSeed::Fixed(0));
        assert!(config.mining_reward.is_none());
        assert_ne!(config.node_id, NodeConfig::default().node_id);
    }

    #[test]
    fn oversized_difficulty_is_rejected() {
        assert!(NodeConfig::with_difficulty(65).proof_of_work().is_err());
        assert_eq!(NodeConfig::with_difficulty(3).proof_of_work().unwrap().difficulty(), 3);
    }
}
