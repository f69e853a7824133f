use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("blockchain error: {0}")]
    Blockchain(#[from] pc_blockchain::BlockchainError),

    #[error("proof-of-work error: {0}")]
    Pow(#[from] pc_pow::PowError),

    #[error("mining was cancelled")]
    MiningCancelled,

    #[error("mining worker failed: {0}")]
    Worker(String),
}
