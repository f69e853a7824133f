use chrono::Utc;
use pc_pow::ProofOfWork;
use pc_transaction::{Transaction, TransactionPool};
use tracing::info;

use crate::{block::Block, error::BlockchainError, validator::ChainValidator};

/// The append-only chain of [`Block`]s together with its pending pool.
///
/// Invariants maintained by this type:
/// - Always contains at least the genesis block.
/// - Every block's `previous_hash` is the hex hash of the preceding block.
/// - Every block's proof is valid after the preceding block's proof.
/// - Block indices are contiguous starting from 1.
///
/// `Ledger` is not synchronised.  Hosts that share it across threads must
/// put it behind one lock so that submissions, appends and replacements
/// never interleave.
#[derive(Debug, Clone)]
pub struct Ledger {
    blocks: Vec<Block>,
    pool: TransactionPool,
    pow: ProofOfWork,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(ProofOfWork::default())
    }
}

/// Index, timestamp and link of the block that would follow the tip.
struct Successor {
    index: u64,
    timestamp: i64,
    previous_hash: String,
}

impl Ledger {
    /// Initialise a new chain with only the genesis block.
    pub fn new(pow: ProofOfWork) -> Self {
        Self {
            blocks: vec![Self::genesis()],
            pool: TransactionPool::new(),
            pow,
        }
    }

    pub fn genesis() -> Block {
        Block::genesis()
    }

    /// Number of blocks in the chain (including genesis).
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The most recent block.
    pub fn last_block(&self) -> Result<&Block, BlockchainError> {
        self.blocks.last().ok_or(BlockchainError::EmptyChain)
    }

    /// Queue a transaction and return the index of the block expected to
    /// contain it.
    pub fn submit_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: u64,
    ) -> u64 {
        self.push_transaction(Transaction::new(sender, recipient, amount))
    }

    pub fn push_transaction(&mut self, tx: Transaction) -> u64 {
        self.pool.push(tx);
        self.blocks.len() as u64 + 1
    }

    /// Append a block holding `transactions`, sealed with `proof`.
    pub fn append(
        &mut self,
        proof: u64,
        transactions: Vec<Transaction>,
    ) -> Result<&Block, BlockchainError> {
        let next = self.successor(proof)?;
        let block = Block::create(
            next.index,
            next.timestamp,
            transactions,
            proof,
            next.previous_hash,
        )?;
        self.push_block(block)
    }

    /// Seal every pending transaction into a new block.
    ///
    /// The proof is checked before the pool is touched, so a rejected proof
    /// leaves all pending transactions in place.
    pub fn append_pending(&mut self, proof: u64) -> Result<&Block, BlockchainError> {
        let next = self.successor(proof)?;
        let transactions = self.pool.drain();
        let block = Block::create(
            next.index,
            next.timestamp,
            transactions,
            proof,
            next.previous_hash,
        )?;
        self.push_block(block)
    }

    fn successor(&self, proof: u64) -> Result<Successor, BlockchainError> {
        let last = self.last_block()?;
        if !self.pow.is_valid(last.proof(), proof) {
            return Err(BlockchainError::Consensus {
                previous_proof: last.proof(),
                proof,
            });
        }

        Ok(Successor {
            index: last.index() + 1,
            // Wall clocks can step backwards; never seal a block older than its parent.
            timestamp: Utc::now().timestamp_millis().max(last.timestamp()),
            previous_hash: last.hash_hex()?,
        })
    }

    fn push_block(&mut self, block: Block) -> Result<&Block, BlockchainError> {
        info!(
            index = block.index(),
            proof = block.proof(),
            transactions = block.transactions().len(),
            "appended block"
        );
        self.blocks.push(block);
        self.last_block()
    }

    /// Return a block by its (1-based) index.
    pub fn get_block(&self, index: u64) -> Option<&Block> {
        let pos = usize::try_from(index.checked_sub(1)?).ok()?;
        self.blocks.get(pos)
    }

    /// All blocks in the chain.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Transactions waiting for the next block.
    pub fn pending(&self) -> &[Transaction] {
        self.pool.pending()
    }

    pub fn pow(&self) -> &ProofOfWork {
        &self.pow
    }

    pub fn validator(&self) -> ChainValidator {
        ChainValidator::new(self.pow.clone())
    }

    /// Validate the local chain with the same rules applied to peer chains.
    pub fn is_valid(&self) -> bool {
        self.validator().is_valid_chain(&self.blocks)
    }

    /// Swap in an already-validated chain in a single assignment.
    ///
    /// Pending transactions are kept; the caller decides what to do with
    /// them.
    pub fn replace_blocks(&mut self, blocks: Vec<Block>) -> Result<(), BlockchainError> {
        if blocks.is_empty() {
            return Err(BlockchainError::EmptyChain);
        }
        info!(old_length = self.blocks.len(), new_length = blocks.len(), "replacing chain");
        self.blocks = blocks;
        Ok(())
    }
}
