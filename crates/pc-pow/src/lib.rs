pub mod cancel;
pub mod error;
pub mod proof;

pub use cancel::{CancelReason, CancelToken};
pub use error::PowError;
pub use proof::{leading_zero_nibbles, proof_digest, ProofOfWork, ProofSeed};

/// Number of leading zero hex digits required when no difficulty is configured.
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// A SHA-256 digest has 64 hex digits; asking for more can never succeed.
pub const MAX_DIFFICULTY: u32 = 64;
