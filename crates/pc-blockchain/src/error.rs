use thiserror::Error;

/// The first rule a candidate chain broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainViolation {
    #[error("chain has no blocks")]
    Empty,

    #[error("genesis block has index {0}, expected 1")]
    BadGenesisIndex(u64),

    #[error("genesis block differs from the fixed genesis block")]
    ForeignGenesis,

    #[error("block {index} follows block {previous}")]
    NonContiguousIndex { previous: u64, index: u64 },

    #[error("block {0} does not link to the hash of its predecessor")]
    BrokenLink(u64),

    #[error("block {0} carries an invalid proof")]
    InvalidProof(u64),

    #[error("block {index} could not be hashed: {reason}")]
    Unhashable { index: u64, reason: String },
}

#[derive(Debug, Error)]
pub enum BlockchainError {
    #[error("invalid block: {0}")]
    Validation(String),

    #[error("proof {proof} is not valid after proof {previous_proof}")]
    Consensus { previous_proof: u64, proof: u64 },

    #[error("invalid chain: {0}")]
    InvalidChain(#[from] ChainViolation),

    #[error("chain is empty")]
    EmptyChain,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("proof-of-work error: {0}")]
    Pow(#[from] pc_pow::PowError),
}
