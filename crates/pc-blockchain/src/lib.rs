pub mod block;
pub mod canonical;
pub mod error;
pub mod ledger;
pub mod validator;

pub use block::Block;
pub use error::{BlockchainError, ChainViolation};
pub use ledger::Ledger;
pub use validator::{ChainChoice, ChainValidator};

/// `previous_hash` of the genesis block.  Deliberately not a real digest.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Proof stored in the genesis block; later proofs are chained from it.
pub const GENESIS_PROOF: u64 = 100;
