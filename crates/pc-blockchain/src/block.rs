use pc_transaction::Transaction;
use serde::{Deserialize, Serialize};

use crate::{canonical, BlockchainError, GENESIS_PREVIOUS_HASH, GENESIS_PROOF};

/// A single sealed block of the ledger.
///
/// Blocks are immutable once built: every field is private and only
/// readable through accessors.  The block hash covers all fields through
/// the canonical encoding in [`crate::canonical`], so any change to the
/// transactions, proof, timestamp or link yields a different hash.
///
/// Deserialised blocks go through [`Block::create`], so a peer cannot hand
/// over a block that local construction would refuse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireBlock")]
pub struct Block {
    /// Position in the chain, starting at 1 for genesis.
    index: u64,

    /// Unix timestamp in milliseconds when the block was sealed.
    timestamp: i64,

    /// Transactions in the order they were submitted.
    transactions: Vec<Transaction>,

    /// Proof-of-work value chained from the previous block's proof.
    proof: u64,

    /// Hex SHA-256 of the previous block, or the genesis sentinel.
    previous_hash: String,
}

/// Unchecked wire shape of a [`Block`].
#[derive(Deserialize)]
struct WireBlock {
    index: u64,
    timestamp: i64,
    transactions: Vec<Transaction>,
    proof: u64,
    previous_hash: String,
}

impl TryFrom<WireBlock> for Block {
    type Error = BlockchainError;

    fn try_from(wire: WireBlock) -> Result<Self, Self::Error> {
        Block::create(
            wire.index,
            wire.timestamp,
            wire.transactions,
            wire.proof,
            wire.previous_hash,
        )
    }
}

impl Block {
    /// Build a block, rejecting a zero index or an empty previous hash.
    pub fn create(
        index: u64,
        timestamp: i64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: impl Into<String>,
    ) -> Result<Self, BlockchainError> {
        let previous_hash = previous_hash.into();
        if index == 0 {
            return Err(BlockchainError::Validation(
                "block index must be positive".into(),
            ));
        }
        if previous_hash.is_empty() {
            return Err(BlockchainError::Validation(
                "previous hash must not be empty".into(),
            ));
        }

        Ok(Self {
            index,
            timestamp,
            transactions,
            proof,
            previous_hash,
        })
    }

    /// The genesis block.  Every field is fixed so that independent nodes
    /// agree on its hash.
    pub fn genesis() -> Self {
        Self {
            index: 1,
            timestamp: 0,
            transactions: Vec::new(),
            proof: GENESIS_PROOF,
            previous_hash: GENESIS_PREVIOUS_HASH.to_string(),
        }
    }

    pub fn hash(&self) -> Result<[u8; 32], BlockchainError> {
        Ok(canonical::digest(self)?)
    }

    /// Hex-encoded block hash; this is what the next block links to.
    pub fn hash_hex(&self) -> Result<String, BlockchainError> {
        Ok(hex::encode(self.hash()?))
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn proof(&self) -> u64 {
        self.proof
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 1
    }
}
