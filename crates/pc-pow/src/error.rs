use thiserror::Error;

use crate::CancelReason;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PowError {
    #[error("difficulty {difficulty} exceeds the maximum of {max} hex digits")]
    InvalidDifficulty { difficulty: u32, max: u32 },

    #[error("proof search cancelled: {0:?}")]
    Cancelled(CancelReason),

    #[error("no valid proof exists after previous proof {previous_proof}")]
    Exhausted { previous_proof: u64 },
}
